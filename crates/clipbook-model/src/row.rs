//! Row store: reviewable rows and their review status.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Header of the status column marking a row as passed.
pub const PASSED_COLUMN: &str = "Reviewed Passed";

/// Header of the status column marking a row as bulleted.
pub const BULLETED_COLUMN: &str = "Reviewed Bulleted";

/// Header of the status column holding the assigned topic.
pub const TOPIC_COLUMN: &str = "Topic";

/// Review status of a single row.
///
/// `Passed` and `Bulleted` are only reachable from `Unreviewed`, and an
/// unreviewed row never carries a topic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "status", content = "topic", rename_all = "snake_case")]
pub enum RowStatus {
    #[default]
    Unreviewed,
    Passed,
    Bulleted(String),
}

impl RowStatus {
    #[inline]
    pub fn is_reviewed(&self) -> bool {
        !matches!(self, Self::Unreviewed)
    }

    /// Assigned topic, or `""` for unreviewed and passed rows.
    pub fn topic(&self) -> &str {
        match self {
            Self::Bulleted(topic) => topic,
            Self::Unreviewed | Self::Passed => "",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Unreviewed => "unreviewed",
            Self::Passed => "passed",
            Self::Bulleted(_) => "bulleted",
        }
    }
}

/// One reviewable source item.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Post URL. Never empty for rows inside a [`RowSet`].
    pub url: String,
    pub text: String,
    /// Best-available date, `None` when no date column parsed.
    pub date: Option<NaiveDateTime>,
    /// Moderation flag annotations, passed through for display.
    pub flags: Option<String>,
    pub is_quote: bool,
    pub status: RowStatus,
    /// Every original cell, aligned with [`RowSet::columns`].
    pub cells: Vec<String>,
}

impl Row {
    #[inline]
    pub fn reviewed(&self) -> bool {
        self.status.is_reviewed()
    }

    #[inline]
    pub fn topic(&self) -> &str {
        self.status.topic()
    }
}

/// Positions of the three status columns inside [`RowSet::columns`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusColumns {
    pub passed: usize,
    pub bulleted: usize,
    pub topic: usize,
}

/// Ordered, fixed-length set of rows.
///
/// The order is decided at load time; rows are never added or removed
/// afterwards, only their status changes.
#[derive(Debug, Clone, PartialEq)]
pub struct RowSet {
    columns: Vec<String>,
    status_columns: StatusColumns,
    rows: Vec<Row>,
}

impl RowSet {
    /// Build a row set, checking that every row has one cell per column.
    pub fn new(columns: Vec<String>, status_columns: StatusColumns, rows: Vec<Row>) -> Result<Self> {
        let len = columns.len();
        for index in [
            status_columns.passed,
            status_columns.bulleted,
            status_columns.topic,
        ] {
            if index >= len {
                return Err(ModelError::StatusColumnOutOfRange { index, len });
            }
        }
        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.cells.len() != len)
        {
            return Err(ModelError::CellCountMismatch {
                index,
                expected: len,
                found: row.cells.len(),
            });
        }
        Ok(Self {
            columns,
            status_columns,
            rows,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn status_columns(&self) -> StatusColumns {
        self.status_columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Whether the row at `index` is reviewed. Out-of-range reads as `false`.
    pub fn is_reviewed(&self, index: usize) -> bool {
        self.rows.get(index).is_some_and(Row::reviewed)
    }

    /// Replace the status of one row, returning the previous status.
    pub fn set_status(&mut self, index: usize, status: RowStatus) -> Result<RowStatus> {
        let len = self.rows.len();
        let row = self
            .rows
            .get_mut(index)
            .ok_or(ModelError::RowOutOfRange { index, len })?;
        Ok(std::mem::replace(&mut row.status, status))
    }

    /// Return every row to `Unreviewed`.
    pub fn clear_statuses(&mut self) {
        for row in &mut self.rows {
            row.status = RowStatus::Unreviewed;
        }
    }

    /// Output cells for one row: the original cells with the status
    /// columns overwritten from the current status.
    pub fn record(&self, index: usize) -> Option<Vec<String>> {
        let row = self.rows.get(index)?;
        let mut cells = row.cells.clone();
        let (passed, bulleted) = match &row.status {
            RowStatus::Unreviewed => (false, false),
            RowStatus::Passed => (true, false),
            RowStatus::Bulleted(_) => (false, true),
        };
        cells[self.status_columns.passed] = bool_cell(passed).to_string();
        cells[self.status_columns.bulleted] = bool_cell(bulleted).to_string();
        cells[self.status_columns.topic] = row.topic().to_string();
        Some(cells)
    }

    /// All output records in row order.
    pub fn records(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        (0..self.rows.len()).filter_map(|index| self.record(index))
    }
}

fn bool_cell(value: bool) -> &'static str {
    if value { "TRUE" } else { "FALSE" }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(url: &str, cells: usize) -> Row {
        Row {
            url: url.to_string(),
            text: String::new(),
            date: None,
            flags: None,
            is_quote: false,
            status: RowStatus::Unreviewed,
            cells: vec![String::new(); cells],
        }
    }

    fn status_columns() -> StatusColumns {
        StatusColumns {
            passed: 1,
            bulleted: 2,
            topic: 3,
        }
    }

    #[test]
    fn rejects_ragged_rows() {
        let columns = vec!["URL".into(), PASSED_COLUMN.into(), BULLETED_COLUMN.into(), TOPIC_COLUMN.into()];
        let err = RowSet::new(columns, status_columns(), vec![row("a", 4), row("b", 3)]).unwrap_err();
        assert_eq!(
            err,
            ModelError::CellCountMismatch {
                index: 1,
                expected: 4,
                found: 3
            }
        );
    }

    #[test]
    fn record_overwrites_status_cells() {
        let columns = vec!["URL".into(), PASSED_COLUMN.into(), BULLETED_COLUMN.into(), TOPIC_COLUMN.into()];
        let mut set = RowSet::new(columns, status_columns(), vec![row("a", 4)]).unwrap();
        set.set_status(0, RowStatus::Bulleted("ECONOMY".into())).unwrap();
        assert_eq!(
            set.record(0).unwrap()[1..],
            ["FALSE".to_string(), "TRUE".to_string(), "ECONOMY".to_string()]
        );
    }

    #[test]
    fn set_status_out_of_range() {
        let columns = vec!["URL".into(), PASSED_COLUMN.into(), BULLETED_COLUMN.into(), TOPIC_COLUMN.into()];
        let mut set = RowSet::new(columns, status_columns(), vec![]).unwrap();
        assert!(matches!(
            set.set_status(0, RowStatus::Passed),
            Err(ModelError::RowOutOfRange { index: 0, len: 0 })
        ));
    }
}
