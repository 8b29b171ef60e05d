//! Output types: the processed table, the parsing-quality report, and run stats.

use serde::{Deserialize, Serialize};

/// Header of the first output column: repeated segment labels.
pub const SEGMENT_COLUMN: &str = "Segmentos";
/// Header of the second output column: one extracted value per record.
pub const VALUE_COLUMN: &str = "Valor";
/// Header of the third output column: date-prefixed category labels.
pub const DATE_CATEGORY_COLUMN: &str = "Data e categoria";

/// One row of the normalised long-format table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRecord {
    /// Segment label (repeated per block of values).
    #[serde(rename = "Segmentos")]
    pub segment: String,
    /// Extracted value, kept as the raw string from the grid.
    #[serde(rename = "Valor")]
    pub value: String,
    /// Date prefix + category label, cycling through the label set.
    #[serde(rename = "Data e categoria")]
    pub date_category: String,
}

/// The normalised long-format table produced by the reshape stage.
///
/// Consumed once by the sink; records are never mutated after assembly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedTable {
    pub records: Vec<TableRecord>,
}

impl ProcessedTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Parsing-quality report for one detected table.
///
/// Diagnostic only — nothing downstream consumes it. Mirrors what the
/// underlying extraction reports: how densely the configured grid was filled
/// tells the operator whether the geometry still matches the document
/// template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsingReport {
    /// 1-indexed page the table was found on.
    pub page: usize,
    /// Grid rows detected inside the region.
    pub rows: usize,
    /// Grid columns (separator count + 1).
    pub columns: usize,
    /// Cells containing any text.
    pub filled_cells: usize,
    /// Percentage of empty cells in the grid, 0–100.
    pub whitespace: f32,
}

/// Timing and count statistics for one extraction run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Pages scanned for table regions.
    pub pages_scanned: usize,
    /// Tables detected across all pages and regions (only the first is used).
    pub tables_detected: usize,
    /// Rows in the consumed raw grid.
    pub grid_rows: usize,
    /// Segment headers extracted from the header column.
    pub headers: usize,
    /// Non-empty values collected from content rows.
    pub values: usize,
    /// Records in the final processed table.
    pub records: usize,
    /// Wall-clock time spent in acquisition, milliseconds.
    pub acquire_duration_ms: u64,
    /// Total wall-clock time, milliseconds.
    pub total_duration_ms: u64,
}

/// Everything [`crate::extract`] returns: the table plus diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionOutput {
    /// The normalised long-format table.
    pub table: ProcessedTable,
    /// Parsing-quality report of the consumed (first) detected table.
    pub report: ParsingReport,
    /// Run statistics.
    pub stats: ExtractionStats,
}
