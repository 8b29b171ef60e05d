//! Sink: persist a [`ProcessedTable`] as a CSV file.
//!
//! Arguments are validated BEFORE any filesystem work: an empty directory, an
//! empty file name, or an empty table fails with an invalid-argument error
//! and leaves the filesystem untouched — the output directory is not even
//! created. I/O failures wrap the underlying `std::io::Error` as the source;
//! no rollback is attempted beyond what the filesystem itself guarantees.

use crate::error::ExtractError;
use crate::output::{ProcessedTable, DATE_CATEGORY_COLUMN, SEGMENT_COLUMN, VALUE_COLUMN};
use std::path::PathBuf;
use tracing::info;

/// Write the table to `<data_path>/<file_name>.csv` and return the path.
///
/// The file is UTF-8, comma-delimited, with the header row
/// `Segmentos,Valor,Data e categoria` and one data row per record — no index
/// column. Missing directories (and parents) are created.
pub fn write_csv(
    data_path: &str,
    file_name: &str,
    table: &ProcessedTable,
) -> Result<PathBuf, ExtractError> {
    let data_path = data_path.trim();
    let file_name = file_name.trim();

    if data_path.is_empty() {
        return Err(ExtractError::InvalidArgument(
            "output directory must not be empty".into(),
        ));
    }
    if file_name.is_empty() {
        return Err(ExtractError::InvalidArgument(
            "output file name must not be empty".into(),
        ));
    }
    if table.is_empty() {
        return Err(ExtractError::InvalidArgument(
            "processed table has no records, refusing to write an empty CSV".into(),
        ));
    }

    let dir = PathBuf::from(data_path);
    std::fs::create_dir_all(&dir).map_err(|e| ExtractError::OutputWriteFailed {
        path: dir.clone(),
        source: e,
    })?;

    let path = dir.join(format!("{file_name}.csv"));
    let mut writer =
        csv::Writer::from_path(&path).map_err(|e| csv_error(path.clone(), e))?;

    writer
        .write_record([SEGMENT_COLUMN, VALUE_COLUMN, DATE_CATEGORY_COLUMN])
        .map_err(|e| csv_error(path.clone(), e))?;

    for record in &table.records {
        writer
            .write_record([&record.segment, &record.value, &record.date_category])
            .map_err(|e| csv_error(path.clone(), e))?;
    }

    writer
        .flush()
        .map_err(|e| ExtractError::OutputWriteFailed {
            path: path.clone(),
            source: e,
        })?;

    info!("Wrote {} records to {}", table.len(), path.display());
    Ok(path)
}

/// Unwrap csv's error: plain I/O failures keep their source, the rest
/// (serialisation, UTF-8) become a CSV-write error with the detail string.
fn csv_error(path: PathBuf, e: csv::Error) -> ExtractError {
    if e.is_io_error() {
        match e.into_kind() {
            csv::ErrorKind::Io(io) => ExtractError::OutputWriteFailed { path, source: io },
            other => ExtractError::CsvWriteFailed {
                path,
                detail: format!("{other:?}"),
            },
        }
    } else {
        ExtractError::CsvWriteFailed {
            path,
            detail: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::TableRecord;

    fn record(segment: &str, value: &str, date_category: &str) -> TableRecord {
        TableRecord {
            segment: segment.into(),
            value: value.into(),
            date_category: date_category.into(),
        }
    }

    fn sample_table() -> ProcessedTable {
        ProcessedTable {
            records: vec![
                record("Ativo Circulante", "1.234,5", "2024_10_(A)"),
                record("Ativo Circulante", "678,9", "2024_10_(B)"),
                record("Passivo Circulante", "42", "2024_10_(C)"),
            ],
        }
    }

    #[test]
    fn rejects_empty_data_path() {
        let err = write_csv("", "out", &sample_table()).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidArgument(_)));
    }

    #[test]
    fn rejects_whitespace_data_path() {
        let err = write_csv("   ", "out", &sample_table()).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidArgument(_)));
    }

    #[test]
    fn rejects_empty_file_name() {
        let err = write_csv("./data", "  ", &sample_table()).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidArgument(_)));
    }

    #[test]
    fn rejects_empty_table_before_any_io() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("never_created");
        let err = write_csv(
            out.to_str().unwrap(),
            "2024_10_02",
            &ProcessedTable::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ExtractError::InvalidArgument(_)));
        // Validation fires before directory creation.
        assert!(!out.exists());
    }

    #[test]
    fn writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("deeper");
        let path = write_csv(out.to_str().unwrap(), "2024_10_02", &sample_table()).unwrap();

        assert!(path.ends_with("2024_10_02.csv"));
        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("Segmentos,Valor,Data e categoria"));
        assert_eq!(lines.next(), Some("Ativo Circulante,\"1.234,5\",2024_10_(A)"));
    }

    #[test]
    fn round_trip_preserves_values_and_order() {
        let dir = tempfile::tempdir().unwrap();
        let table = sample_table();
        let path = write_csv(dir.path().to_str().unwrap(), "rt", &table).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            vec!["Segmentos", "Valor", "Data e categoria"]
        );

        let rows: Vec<csv::StringRecord> =
            reader.records().collect::<Result<_, _>>().unwrap();
        assert_eq!(rows.len(), table.len());
        for (row, rec) in rows.iter().zip(&table.records) {
            assert_eq!(&row[0], rec.segment.as_str());
            assert_eq!(&row[1], rec.value.as_str());
            assert_eq!(&row[2], rec.date_category.as_str());
        }
    }
}
