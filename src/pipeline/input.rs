//! Input resolution: map a report name to a local PDF file.
//!
//! Reports are filed by convention as `pdf/<name>.pdf` relative to the
//! working directory, so the operator passes bare names like `2024_10_02`.
//! An argument that already carries a path separator or a `.pdf` extension
//! is treated as an explicit path and used as-is. We validate the PDF magic
//! bytes (`%PDF`) before handing the file to pdfium so callers get a
//! meaningful error rather than an opaque engine failure.

use crate::config::ExtractionConfig;
use crate::error::ExtractError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Whether the input names a file directly instead of a filed report.
pub fn is_explicit_path(input: &str) -> bool {
    input.contains(std::path::MAIN_SEPARATOR)
        || input.contains('/')
        || Path::new(input)
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// Resolve a report name (or explicit path) to a validated local PDF path.
pub fn resolve_input(input: &str, config: &ExtractionConfig) -> Result<PathBuf, ExtractError> {
    let path = if is_explicit_path(input) {
        PathBuf::from(input)
    } else {
        Path::new(&config.pdf_dir).join(format!("{input}.pdf"))
    };

    if !path.exists() {
        return Err(ExtractError::FileNotFound { path });
    }

    // Check read permission by attempting to open, then verify magic bytes.
    match std::fs::File::open(&path) {
        Ok(mut f) => {
            use std::io::Read;
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
                return Err(ExtractError::NotAPdf { path, magic });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(ExtractError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(ExtractError::FileNotFound { path });
        }
    }

    debug!("Resolved report PDF: {}", path.display());
    Ok(path)
}

/// The report identifier used for date labels and the output file name.
///
/// For explicit paths this is the file stem; for filed reports it is the
/// name as given.
pub fn report_name(input: &str) -> String {
    if is_explicit_path(input) {
        Path::new(input)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| input.to_string())
    } else {
        input.to_string()
    }
}
