//! Row loading: table -> normalized, ordered [`RowSet`].

use std::cmp::Ordering;
use std::collections::HashSet;
use std::path::Path;

use serde::Serialize;
use sha2::{Digest, Sha256};

use clipbook_model::{
    BULLETED_COLUMN, PASSED_COLUMN, Row, RowSet, RowStatus, StatusColumns, TOPIC_COLUMN,
    UNSORTED_TOPIC, normalize_topic,
};

use crate::dates::{parse_date, parse_flag};
use crate::error::Result;
use crate::io::write_atomic;
use crate::schema::{ColumnMapping, ColumnOverrides, LogicalField, normalize_header, resolve_columns};
use crate::table::{RawTable, SourceFormat, encode_table, read_table};

/// Options for [`load_rows`].
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit header names that take precedence over alias matching.
    pub overrides: ColumnOverrides,
}

/// What normalization did to the source rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Data rows in the source, before any removal.
    pub total_rows: usize,
    pub removed_missing_url: usize,
    pub removed_duplicates: usize,
    /// Kept rows with no parseable date.
    pub undated_rows: usize,
    /// Kept rows whose stored status was bulleted without a topic.
    pub recovered_unsorted: usize,
}

impl LoadReport {
    pub fn kept_rows(&self) -> usize {
        self.total_rows - self.removed_missing_url - self.removed_duplicates
    }
}

/// Result of loading a source.
#[derive(Debug, Clone)]
pub struct LoadedRows {
    pub rows: RowSet,
    pub mapping: ColumnMapping,
    pub report: LoadReport,
}

/// Read and normalize the source at `path`.
pub fn load_rows(path: &Path, options: &LoadOptions) -> Result<LoadedRows> {
    let table = read_table(path)?;
    let loaded = build_row_set(table, options)?;
    tracing::info!(
        path = %path.display(),
        total = loaded.report.total_rows,
        kept = loaded.rows.len(),
        missing_url = loaded.report.removed_missing_url,
        duplicates = loaded.report.removed_duplicates,
        "loaded rows"
    );
    Ok(loaded)
}

/// Normalize a raw table into a [`RowSet`].
///
/// Rows with a blank URL are dropped, then exact duplicates (every cell
/// equal) keep only their first occurrence, then the survivors are stably
/// sorted by best-available date with undated rows last. Missing status
/// columns are appended; existing ones seed each row's status.
pub fn build_row_set(table: RawTable, options: &LoadOptions) -> Result<LoadedRows> {
    let mapping = resolve_columns(&table.headers, &options.overrides)?;
    let RawTable {
        headers: mut columns,
        rows: mut records,
    } = table;
    let status_columns = ensure_status_columns(&mut columns, &mut records);

    let mut report = LoadReport {
        total_rows: records.len(),
        ..LoadReport::default()
    };
    let mut seen = HashSet::new();
    let mut rows = Vec::with_capacity(records.len());
    for cells in records {
        let url = cells[mapping.url()].trim();
        if url.is_empty() {
            report.removed_missing_url += 1;
            continue;
        }
        if !seen.insert(fingerprint(&cells)) {
            report.removed_duplicates += 1;
            continue;
        }
        let row = build_row(cells, &mapping, status_columns, &mut report);
        rows.push(row);
    }
    rows.sort_by(|a, b| match (a.date, b.date) {
        (Some(left), Some(right)) => left.cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    if report.recovered_unsorted > 0 {
        tracing::warn!(
            rows = report.recovered_unsorted,
            topic = UNSORTED_TOPIC,
            "bulleted rows without a topic were filed under a placeholder"
        );
    }
    let rows = RowSet::new(columns, status_columns, rows)?;
    Ok(LoadedRows {
        rows,
        mapping,
        report,
    })
}

fn ensure_status_columns(columns: &mut Vec<String>, records: &mut [Vec<String>]) -> StatusColumns {
    let mut locate = |name: &str| {
        let wanted = normalize_header(name);
        if let Some(index) = columns.iter().position(|c| normalize_header(c) == wanted) {
            return index;
        }
        columns.push(name.to_string());
        for record in records.iter_mut() {
            record.push(String::new());
        }
        columns.len() - 1
    };
    StatusColumns {
        passed: locate(PASSED_COLUMN),
        bulleted: locate(BULLETED_COLUMN),
        topic: locate(TOPIC_COLUMN),
    }
}

fn fingerprint(cells: &[String]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for cell in cells {
        hasher.update(cell.as_bytes());
        hasher.update([0x1f]);
    }
    hasher.finalize().into()
}

fn build_row(
    cells: Vec<String>,
    mapping: &ColumnMapping,
    status_columns: StatusColumns,
    report: &mut LoadReport,
) -> Row {
    let cell = |field: LogicalField| mapping.index(field).map(|index| cells[index].as_str());

    let date = cell(LogicalField::CorrectedDate)
        .and_then(parse_date)
        .or_else(|| cell(LogicalField::Date).and_then(parse_date));
    if date.is_none() {
        report.undated_rows += 1;
    }

    let passed = parse_flag(&cells[status_columns.passed]);
    let bulleted = parse_flag(&cells[status_columns.bulleted]);
    let status = if bulleted {
        let topic = normalize_topic(&cells[status_columns.topic]).unwrap_or_else(|| {
            report.recovered_unsorted += 1;
            UNSORTED_TOPIC.to_string()
        });
        RowStatus::Bulleted(topic)
    } else if passed {
        RowStatus::Passed
    } else {
        RowStatus::Unreviewed
    };

    Row {
        url: cells[mapping.url()].trim().to_string(),
        text: cell(LogicalField::Text).unwrap_or_default().to_string(),
        date,
        flags: cell(LogicalField::Flags)
            .map(str::trim)
            .filter(|flags| !flags.is_empty())
            .map(str::to_string),
        is_quote: cell(LogicalField::Quote).is_some_and(parse_flag),
        status,
        cells,
    }
}

/// Encode the current rows, status columns included, in `format`.
pub fn encode_rows(rows: &RowSet, format: SourceFormat, path: &Path) -> Result<Vec<u8>> {
    let table = RawTable {
        headers: rows.columns().to_vec(),
        rows: rows.records().collect(),
    };
    encode_table(&table, format, path)
}

/// Rewrite the whole file at `path` from `rows`, format chosen by extension.
pub fn persist_rows(path: &Path, rows: &RowSet) -> Result<()> {
    let format = SourceFormat::from_path(path)?;
    let bytes = encode_rows(rows, format, path)?;
    write_atomic(path, &bytes)?;
    tracing::debug!(path = %path.display(), rows = rows.len(), "persisted rows");
    Ok(())
}
