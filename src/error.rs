//! Error types for the pdftab2csv library.
//!
//! Every failure in this crate is fatal: the pipeline is a straight
//! acquisition → reshape → sink line with no per-item recovery, so a single
//! error type returned from the top-level `extract*` functions is enough.
//! The one deliberate exception is the reshape stage, which never fails —
//! shape mismatches between its derived columns silently truncate the output
//! (see [`crate::pipeline::reshape`]); only a WARN trace marks the event.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdftab2csv library.
#[derive(Debug, Error)]
pub enum ExtractError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the resolved path.
    #[error("PDF file not found: '{path}'\nReports are looked up as pdf/<name>.pdf relative to the working directory.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// pdfium could not open or parse the document.
    #[error("PDF '{path}' could not be parsed: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// Selected page numbers exceed the actual page count.
    #[error("Page {page} is out of range (document has {total} pages)")]
    PageOutOfRange { page: usize, total: usize },

    /// Text extraction failed for a specific page.
    #[error("Text extraction failed for page {page}: {detail}")]
    TextExtractionFailed { page: usize, detail: String },

    /// No table region yielded any text on the selected pages.
    #[error("No table detected: the configured regions contain no text on the selected pages")]
    NoTableFound,

    /// Page rasterisation failed (contour rendering only).
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    // ── Geometry errors ───────────────────────────────────────────────────
    /// A table-area or column-separator string could not be parsed.
    #[error("Invalid table geometry '{input}': {detail}")]
    InvalidGeometry { input: String, detail: String },

    // ── Sink errors ───────────────────────────────────────────────────────
    /// An argument to the sink failed validation before any I/O was done.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Could not create the output directory or write the output file.
    #[error("Failed to write output '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV serialisation failed mid-write.
    #[error("CSV write failed for '{path}': {detail}")]
    CsvWriteFailed { path: PathBuf, detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\
Set PDFIUM_LIB_PATH=/path/to/libpdfium to use an existing copy."
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_argument_display() {
        let e = ExtractError::InvalidArgument("output directory must not be empty".into());
        assert!(e.to_string().contains("output directory"));
    }

    #[test]
    fn page_out_of_range_display() {
        let e = ExtractError::PageOutOfRange { page: 7, total: 2 };
        let msg = e.to_string();
        assert!(msg.contains("Page 7"), "got: {msg}");
        assert!(msg.contains("2 pages"), "got: {msg}");
    }

    #[test]
    fn output_write_failed_keeps_source() {
        use std::error::Error as _;
        let e = ExtractError::OutputWriteFailed {
            path: PathBuf::from("./data/out.csv"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(e.source().is_some());
        assert!(e.to_string().contains("out.csv"));
    }

    #[test]
    fn geometry_display() {
        let e = ExtractError::InvalidGeometry {
            input: "65, 674, 390".into(),
            detail: "expected 4 comma-separated numbers, got 3".into(),
        };
        assert!(e.to_string().contains("got 3"));
    }
}
