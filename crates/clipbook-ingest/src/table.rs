//! Format-neutral tables and format dispatch by file extension.

use std::path::Path;

use crate::csv::{encode_csv, parse_csv};
use crate::error::{IngestError, Result};
use crate::xlsx::{encode_xlsx, parse_xlsx};

/// Spreadsheet encodings understood by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Xlsx,
}

impl SourceFormat {
    /// Pick the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("xlsx") => Ok(Self::Xlsx),
            _ => Err(IngestError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// A header row plus data rows, each padded to the header width.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Build a table from raw records: the first non-blank record is the
    /// header, blank records are skipped, and every row is padded or
    /// truncated to the header width.
    pub fn from_records(records: impl IntoIterator<Item = Vec<String>>) -> Self {
        let mut records = records
            .into_iter()
            .filter(|record| record.iter().any(|cell| !cell.trim().is_empty()));
        let Some(header_record) = records.next() else {
            return Self::default();
        };
        let headers: Vec<String> = header_record
            .iter()
            .enumerate()
            .map(|(idx, raw)| {
                let header = normalize_header(raw);
                if header.is_empty() {
                    format!("Column {}", idx + 1)
                } else {
                    header
                }
            })
            .collect();

        let mut truncated = 0usize;
        let rows = records
            .map(|mut record| {
                if record.len() > headers.len() {
                    if record[headers.len()..].iter().any(|c| !c.trim().is_empty()) {
                        truncated += 1;
                    }
                    record.truncate(headers.len());
                }
                record.resize(headers.len(), String::new());
                record
            })
            .collect();
        if truncated > 0 {
            tracing::warn!(rows = truncated, "dropped cells beyond the header width");
        }
        Self { headers, rows }
    }
}

fn normalize_header(raw: &str) -> String {
    raw.trim()
        .trim_matches('\u{feff}')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Read a table from disk, dispatching on the extension.
pub fn read_table(path: &Path) -> Result<RawTable> {
    let format = SourceFormat::from_path(path)?;
    let bytes = std::fs::read(path).map_err(|e| IngestError::read(path, e))?;
    match format {
        SourceFormat::Csv => parse_csv(&bytes).map_err(|e| IngestError::Csv {
            path: path.to_path_buf(),
            message: e.to_string(),
        }),
        SourceFormat::Xlsx => parse_xlsx(&bytes).map_err(|e| IngestError::Xlsx {
            path: path.to_path_buf(),
            message: e.to_string(),
        }),
    }
}

/// Encode a table in `format`. `path` is only used for error context.
pub fn encode_table(table: &RawTable, format: SourceFormat, path: &Path) -> Result<Vec<u8>> {
    match format {
        SourceFormat::Csv => encode_csv(table).map_err(|e| IngestError::Csv {
            path: path.to_path_buf(),
            message: e.to_string(),
        }),
        SourceFormat::Xlsx => encode_xlsx(table).map_err(|e| IngestError::Xlsx {
            path: path.to_path_buf(),
            message: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(SourceFormat::from_path(Path::new("a.CSV")).unwrap(), SourceFormat::Csv);
        assert_eq!(SourceFormat::from_path(Path::new("a.xlsx")).unwrap(), SourceFormat::Xlsx);
        assert!(SourceFormat::from_path(Path::new("a.xls")).is_err());
    }

    #[test]
    fn records_pad_short_rows_and_skip_blank_ones() {
        let table = RawTable::from_records(vec![
            record(&["", ""]),
            record(&["\u{feff}URL ", "", "Text"]),
            record(&["https://x.com/1"]),
            record(&[" ", ""]),
            record(&["https://x.com/2", "a", "b", "extra"]),
        ]);
        assert_eq!(table.headers, vec!["URL", "Column 2", "Text"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0], record(&["https://x.com/1", "", ""]));
        assert_eq!(table.rows[1], record(&["https://x.com/2", "a", "b"]));
    }

    #[test]
    fn no_records_gives_empty_table() {
        assert_eq!(RawTable::from_records(Vec::new()), RawTable::default());
    }
}
