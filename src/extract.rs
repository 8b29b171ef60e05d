//! Top-level extraction entry points.
//!
//! The pipeline is strictly sequential and synchronous: one invocation
//! acquires the grid, reshapes it, and (for [`extract_to_csv`]) writes the
//! CSV, in that order, with every failure propagating to the caller. There
//! is nothing to retry and nothing to run concurrently — the whole job is
//! one table in one local file.

use crate::config::ExtractionConfig;
use crate::error::ExtractError;
use crate::output::{ExtractionOutput, ExtractionStats};
use crate::pipeline::{acquire, contour, input, reshape, sink};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

/// Extract and reshape the report's table without writing anything.
///
/// `input_str` is a filed report name (resolved as `pdf/<name>.pdf`) or an
/// explicit path to a PDF. Only the first detected table is consumed; extra
/// detections are logged and ignored.
///
/// # Errors
/// Fatal on a missing/unreadable/corrupt input, an out-of-range page
/// selection, or when no region contains text. A structurally malformed grid
/// is NOT an error: the reshape degrades to a truncated or empty table.
pub fn extract(
    input_str: impl AsRef<str>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, ExtractError> {
    let total_start = Instant::now();
    let input_str = input_str.as_ref();
    info!("Starting extraction: {}", input_str);

    // ── Step 1: Resolve input ────────────────────────────────────────────
    let pdf_path = input::resolve_input(input_str, config)?;
    let report_name = input::report_name(input_str);

    // ── Step 2: Acquire raw grids ────────────────────────────────────────
    let acquire_start = Instant::now();
    let acquisition = acquire::acquire_tables(&pdf_path, config)?;
    let acquire_duration_ms = acquire_start.elapsed().as_millis() as u64;

    let pages_scanned = acquisition.pages_scanned;
    let tables_detected = acquisition.tables.len();
    if tables_detected > 1 {
        warn!(
            "{} tables detected; only the first (page {}) is processed",
            tables_detected, acquisition.tables[0].page
        );
    }
    let first = acquisition
        .tables
        .into_iter()
        .next()
        .ok_or(ExtractError::NoTableFound)?;

    // ── Step 3: Reshape ──────────────────────────────────────────────────
    let headers = reshape::extract_headers(&first.grid, config.header_column);
    let values = reshape::extract_values(&first.grid);
    let table = reshape::reshape(
        &first.grid,
        &report_name,
        config.header_column,
        config.date_prefix_len,
        &config.category_labels,
    );

    let stats = ExtractionStats {
        pages_scanned,
        tables_detected,
        grid_rows: first.grid.row_count(),
        headers: headers.len(),
        values: values.len(),
        records: table.len(),
        acquire_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Extraction complete: {} records from {} grid rows in {}ms",
        stats.records, stats.grid_rows, stats.total_duration_ms
    );

    Ok(ExtractionOutput {
        table,
        report: first.report,
        stats,
    })
}

/// Run the full pipeline and persist the result as
/// `<data_path>/<name>.csv`.
///
/// Returns the written path and the run statistics. The sink validates its
/// arguments before any I/O, so an empty extraction fails here with an
/// invalid-argument error rather than producing an empty file.
pub fn extract_to_csv(
    input_str: impl AsRef<str>,
    config: &ExtractionConfig,
) -> Result<(PathBuf, ExtractionStats), ExtractError> {
    let input_str = input_str.as_ref();
    let output = extract(input_str, config)?;

    let report_name = input::report_name(input_str);
    let path = sink::write_csv(&config.data_path, &report_name, &output.table)?;

    Ok((path, output.stats))
}

/// Write the diagnostic contour PNG for the first selected page.
///
/// `output_path` defaults to `<data_path>/<name>_contour.png` when `None`.
/// This never runs as part of the normal pipeline.
pub fn render_contour(
    input_str: impl AsRef<str>,
    config: &ExtractionConfig,
    output_path: Option<PathBuf>,
) -> Result<PathBuf, ExtractError> {
    let input_str = input_str.as_ref();
    let pdf_path = input::resolve_input(input_str, config)?;
    let report_name = input::report_name(input_str);

    let out = output_path.unwrap_or_else(|| {
        PathBuf::from(&config.data_path).join(format!("{report_name}_contour.png"))
    });

    contour::render_contour(&pdf_path, config, &out)
}
