//! # pdftab2csv
//!
//! Extract one fixed-layout table from recurring PDF financial reports and
//! persist it as a normalised long-format CSV.
//!
//! ## Why this crate?
//!
//! Generic PDF table extractors guess at geometry and get this report class
//! wrong: the table has no ruling lines, headers share rows with values, and
//! every visual line spills onto a second text row. This crate skips the
//! guessing — the operator supplies the exact bounding box and column
//! separators once, and extraction becomes a deterministic snap of positioned
//! characters onto that grid, followed by a reshape with fixed semantics.
//!
//! ## Pipeline Overview
//!
//! ```text
//! report name
//!  │
//!  ├─ 1. Input    resolve pdf/<name>.pdf, validate %PDF magic
//!  ├─ 2. Acquire  pdfium char extraction → RawGrid per (page, region)
//!  ├─ 3. Reshape  headers × values × date labels → long-format records
//!  └─ 4. Sink     validated CSV write to <data_path>/<name>.csv
//! ```
//!
//! The pipeline is synchronous and single-threaded; one invocation processes
//! one file. A side-band diagnostic ([`render_contour`]) draws the configured
//! geometry over a page render for manual verification.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdftab2csv::{extract_to_csv, ExtractionConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Defaults encode the report template's geometry.
//!     let config = ExtractionConfig::default();
//!     let (path, stats) = extract_to_csv("2024_10_02", &config)?;
//!     println!("{} records → {}", stats.records, path.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2csv` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdftab2csv = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod output;
pub mod pipeline;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractionConfig, ExtractionConfigBuilder, PageSelection, TableRegion};
pub use error::ExtractError;
pub use extract::{extract, extract_to_csv, render_contour};
pub use output::{
    ExtractionOutput, ExtractionStats, ParsingReport, ProcessedTable, TableRecord,
};
pub use pipeline::acquire::RawGrid;
