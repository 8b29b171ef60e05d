//! Reshape: raw positional grid → normalised long-format table.
//!
//! This is the one stage with real invariants. The source grid interleaves
//! content rows (a header fragment in a fixed column plus scattered values)
//! with secondary rows carrying nothing usable, so:
//!
//! 1. headers come from the header column of EVERY row (trimmed, non-empty),
//! 2. values come from the even-indexed content rows only, scanning all
//!    columns left to right (the header cell itself is non-empty and is
//!    therefore also a value),
//! 3. each header is repeated `values / headers` times, block-grouped,
//! 4. the date-category labels are tiled whole `values / labels` times,
//! 5. the three columns are zipped positionally.
//!
//! Both divisions floor; remainders are dropped. When the derived columns
//! disagree in length the shortest wins and the output truncates SILENTLY —
//! this mirrors the upstream report semantics and is deliberate. A WARN
//! trace marks the event so the operator can tell a skewed run from a clean
//! one, but no error is raised.

use crate::output::{ProcessedTable, TableRecord};
use crate::pipeline::acquire::RawGrid;
use tracing::{debug, warn};

/// Reshape one raw grid into the long-format table.
///
/// `file_name` supplies the date prefix (its first `date_prefix_len`
/// characters, e.g. `"2024_10_02"` → `"2024_10_"`). An input with no usable
/// headers or values produces an empty table rather than an error; the sink
/// rejects empty tables, so the failure still surfaces.
pub fn reshape(
    grid: &RawGrid,
    file_name: &str,
    header_column: usize,
    date_prefix_len: usize,
    category_labels: &[String],
) -> ProcessedTable {
    let headers = extract_headers(grid, header_column);
    let values = extract_values(grid);
    let date_labels = build_date_labels(file_name, date_prefix_len, category_labels);

    debug!(
        "Reshaping grid: {} rows, {} headers, {} values",
        grid.row_count(),
        headers.len(),
        values.len()
    );

    if headers.is_empty() || values.is_empty() || date_labels.is_empty() {
        warn!(
            "Nothing to reshape (headers={}, values={}): returning an empty table",
            headers.len(),
            values.len()
        );
        return ProcessedTable::default();
    }

    let values_per_header = values.len() / headers.len();
    let label_repeats = values.len() / date_labels.len();

    // Block-grouped: all repeats of headers[0] before any of headers[1].
    let segments: Vec<&String> = headers
        .iter()
        .flat_map(|h| std::iter::repeat(h).take(values_per_header))
        .collect();

    // Tiled: the whole label sequence end-to-end, never interleaved.
    let labels_column: Vec<&String> = date_labels
        .iter()
        .cycle()
        .take(date_labels.len() * label_repeats)
        .collect();

    if segments.len() != values.len() || labels_column.len() != values.len() {
        warn!(
            "Column lengths disagree (segments={}, values={}, labels={}): output truncates to the shortest",
            segments.len(),
            values.len(),
            labels_column.len()
        );
    }

    // Positional zip; the shortest column determines the final length.
    let records = segments
        .into_iter()
        .zip(values)
        .zip(labels_column)
        .map(|((segment, value), date_category)| TableRecord {
            segment: segment.clone(),
            value,
            date_category: date_category.clone(),
        })
        .collect();

    ProcessedTable { records }
}

/// Trimmed, non-empty cells of the header column, every row, order preserved.
pub fn extract_headers(grid: &RawGrid, header_column: usize) -> Vec<String> {
    grid.rows
        .iter()
        .filter_map(|row| row.get(header_column))
        .map(|cell| cell.trim())
        .filter(|cell| !cell.is_empty())
        .map(str::to_string)
        .collect()
}

/// Non-empty cells of every content row (even indices), all columns, in
/// row-major order. Values are kept verbatim; typing them is out of scope.
pub fn extract_values(grid: &RawGrid) -> Vec<String> {
    grid.rows
        .iter()
        .step_by(2)
        .flat_map(|row| row.iter())
        .filter(|cell| !cell.is_empty())
        .cloned()
        .collect()
}

/// Date-category labels: the file name's prefix concatenated with each
/// category label, in label order.
///
/// The prefix cut is char-boundary safe; a file name shorter than the
/// configured prefix length is used whole.
pub fn build_date_labels(
    file_name: &str,
    date_prefix_len: usize,
    category_labels: &[String],
) -> Vec<String> {
    let prefix: String = file_name.chars().take(date_prefix_len).collect();
    category_labels
        .iter()
        .map(|label| format!("{prefix}{label}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> Vec<String> {
        ["(A)", "(B)", "(C)", "(D)", "(E)"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn cell_row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    /// The reference scenario: 2 headers, 10 values, labels tiled twice.
    fn reference_grid() -> RawGrid {
        RawGrid {
            rows: vec![
                // Content row 0: header + 4 values = 5 non-empty cells.
                cell_row(&["", "Ativo Circulante", "1,2", "3,4", "5,6", "7,8", ""]),
                // Secondary row: no usable data.
                cell_row(&["", "", "", "", "", "", ""]),
                // Content row 2: header + 4 values.
                cell_row(&["", "Passivo Circulante", "9,0", "1,1", "2,2", "3,3", ""]),
                cell_row(&["", "", "", "", "", "", ""]),
            ],
        }
    }

    #[test]
    fn reference_scenario_shapes() {
        let table = reshape(&reference_grid(), "2024_10_02", 1, 8, &labels());

        assert_eq!(table.len(), 10);

        // Segment column: 5× first header, then 5× second — block-grouped.
        for r in &table.records[..5] {
            assert_eq!(r.segment, "Ativo Circulante");
        }
        for r in &table.records[5..] {
            assert_eq!(r.segment, "Passivo Circulante");
        }

        // Date-category column: the 5 labels tiled twice, prefix "2024_10_".
        let expected = [
            "2024_10_(A)",
            "2024_10_(B)",
            "2024_10_(C)",
            "2024_10_(D)",
            "2024_10_(E)",
        ];
        for (i, r) in table.records.iter().enumerate() {
            assert_eq!(r.date_category, expected[i % 5]);
        }

        // Values in row-major order, header cells included.
        assert_eq!(table.records[0].value, "Ativo Circulante");
        assert_eq!(table.records[1].value, "1,2");
        assert_eq!(table.records[5].value, "Passivo Circulante");
        assert_eq!(table.records[6].value, "9,0");
    }

    #[test]
    fn output_length_is_min_of_derived_columns() {
        let grid = RawGrid {
            rows: vec![
                cell_row(&["", "H1", "a", "b", "c"]),
                cell_row(&["", "H2", "", "", ""]),
                cell_row(&["", "H3", "d", "e", "f"]),
            ],
        };
        // Headers come from every row: H1, H2, H3. Values from even rows:
        // H1,a,b,c,H3,d,e,f = 8. values_per_header = 8/3 = 2 → 6 segments;
        // label_repeats = 8/5 = 1 → 5 labels. min(6, 8, 5) = 5.
        let table = reshape(&grid, "2024_10_02", 1, 8, &labels());
        assert_eq!(table.len(), 5);
    }

    #[test]
    fn headers_come_from_every_row_not_just_content_rows() {
        let grid = RawGrid {
            rows: vec![
                cell_row(&["", "Primeiro", "x"]),
                cell_row(&["", "Segundo", ""]),
            ],
        };
        assert_eq!(extract_headers(&grid, 1), vec!["Primeiro", "Segundo"]);
    }

    #[test]
    fn headers_are_trimmed_and_duplicates_kept() {
        let grid = RawGrid {
            rows: vec![
                cell_row(&["", "  Ativo ", ""]),
                cell_row(&["", "Ativo", ""]),
                cell_row(&["", "   ", ""]),
            ],
        };
        assert_eq!(extract_headers(&grid, 1), vec!["Ativo", "Ativo"]);
    }

    #[test]
    fn values_skip_odd_rows_and_empty_cells() {
        let grid = RawGrid {
            rows: vec![
                cell_row(&["a", "", "b"]),
                cell_row(&["IGNORED", "IGNORED", "IGNORED"]),
                cell_row(&["", "c", ""]),
            ],
        };
        assert_eq!(extract_values(&grid), vec!["a", "b", "c"]);
    }

    #[test]
    fn values_preserve_row_major_order() {
        let grid = RawGrid {
            rows: vec![cell_row(&["1", "2", "3"]), cell_row(&["", "", ""])],
        };
        assert_eq!(extract_values(&grid), vec!["1", "2", "3"]);
    }

    #[test]
    fn date_labels_use_char_prefix() {
        let got = build_date_labels("2024_10_02", 8, &labels());
        assert_eq!(got[0], "2024_10_(A)");
        assert_eq!(got[4], "2024_10_(E)");
        assert_eq!(got.len(), 5);
    }

    #[test]
    fn date_prefix_is_char_boundary_safe() {
        // Multi-byte characters must not split; chars(), not bytes.
        let got = build_date_labels("relatório_2024", 9, &labels());
        assert_eq!(got[0], "relatório(A)");
    }

    #[test]
    fn short_file_name_used_whole() {
        let got = build_date_labels("2024", 8, &labels());
        assert_eq!(got[0], "2024(A)");
    }

    #[test]
    fn empty_grid_yields_empty_table() {
        let table = reshape(&RawGrid::default(), "2024_10_02", 1, 8, &labels());
        assert!(table.is_empty());
    }

    #[test]
    fn no_headers_yields_empty_table_not_panic() {
        let grid = RawGrid {
            rows: vec![cell_row(&["v1", "", "v2"])],
        };
        let table = reshape(&grid, "2024_10_02", 1, 8, &labels());
        assert!(table.is_empty());
    }

    #[test]
    fn labels_cycle_regardless_of_header_content() {
        // One header, 10 values → 10 segments, labels tiled twice.
        let grid = RawGrid {
            rows: vec![cell_row(&[
                "v1", "Único", "v2", "v3", "v4", "v5", "v6", "v7", "v8", "v9",
            ])],
        };
        let table = reshape(&grid, "2024_10_02", 1, 8, &labels());
        assert_eq!(table.len(), 10);
        assert_eq!(table.records[0].date_category, "2024_10_(A)");
        assert_eq!(table.records[5].date_category, "2024_10_(A)");
        assert_eq!(table.records[9].date_category, "2024_10_(E)");
        assert!(table.records.iter().all(|r| r.segment == "Único"));
    }
}
