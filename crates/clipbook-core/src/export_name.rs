//! Export file names that carry review metadata.
//!
//! Format: `{STATUS}_{handle}_{firstDate}_{lastDate}_{timestamp}.xlsx` with
//! dates as `YYYYMMDD` and the timestamp as `YYYYMMDDTHHMMSS`. Every field
//! is fixed width except the handle, so names parse from the right and
//! compare correctly as strings.

use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

use clipbook_model::RowSet;

const DATE_FORMAT: &str = "%Y%m%d";
const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%S";
const MISSING_DATE: &str = "00000000";
const EXTENSION: &str = ".xlsx";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExportStatus {
    #[serde(rename = "REVIEWED")]
    Reviewed,
    #[serde(rename = "UNREVIEWED")]
    Unreviewed,
}

impl ExportStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reviewed => "REVIEWED",
            Self::Unreviewed => "UNREVIEWED",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "REVIEWED" => Some(Self::Reviewed),
            "UNREVIEWED" => Some(Self::Unreviewed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportName {
    pub status: ExportStatus,
    pub handle: String,
    pub first_date: String,
    pub last_date: String,
    pub timestamp: String,
}

/// Keep `[A-Za-z0-9_-]`; every other run of characters becomes one `_`.
pub fn sanitize_component(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut replaced = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' {
            out.push(ch);
            replaced = false;
        } else if !replaced {
            out.push('_');
            replaced = true;
        }
    }
    let trimmed = out.trim_matches('_');
    if trimmed.is_empty() {
        "unknown".to_string()
    } else {
        trimmed.to_string()
    }
}

fn format_date(date: Option<NaiveDateTime>) -> String {
    date.map_or_else(
        || MISSING_DATE.to_string(),
        |d| d.format(DATE_FORMAT).to_string(),
    )
}

/// Derive the export name for the current state of `rows`.
///
/// `REVIEWED` requires a non-empty row set with every row reviewed. The
/// first date is the earliest row date; the last date is the latest
/// reviewed row date, or the latest row date when nothing is reviewed.
pub fn derive_export_name(rows: &RowSet, handle: &str, generated_at: NaiveDateTime) -> ExportName {
    let status = if !rows.is_empty() && rows.iter().all(|row| row.reviewed()) {
        ExportStatus::Reviewed
    } else {
        ExportStatus::Unreviewed
    };
    let first = rows.iter().filter_map(|row| row.date).min();
    let last_reviewed = rows
        .iter()
        .filter(|row| row.reviewed())
        .filter_map(|row| row.date)
        .max();
    let last = last_reviewed.or_else(|| rows.iter().filter_map(|row| row.date).max());

    ExportName {
        status,
        handle: sanitize_component(handle),
        first_date: format_date(first),
        last_date: format_date(last),
        timestamp: generated_at.format(TIMESTAMP_FORMAT).to_string(),
    }
}

fn is_date_field(raw: &str) -> bool {
    raw.len() == 8 && raw.bytes().all(|b| b.is_ascii_digit())
}

fn is_timestamp_field(raw: &str) -> bool {
    raw.len() == 15
        && raw.bytes().enumerate().all(|(idx, b)| {
            if idx == 8 {
                b == b'T'
            } else {
                b.is_ascii_digit()
            }
        })
}

impl ExportName {
    pub fn file_name(&self) -> String {
        self.to_string()
    }

    /// Parse a file name produced by [`file_name`](Self::file_name).
    /// Any other name yields `None`.
    pub fn parse(name: &str) -> Option<Self> {
        let split = name.len().checked_sub(EXTENSION.len())?;
        let (stem, extension) = (name.get(..split)?, name.get(split..)?);
        if !extension.eq_ignore_ascii_case(EXTENSION) {
            return None;
        }
        let parts: Vec<&str> = stem.split('_').collect();
        if parts.len() < 5 {
            return None;
        }
        let n = parts.len();
        let status = ExportStatus::parse(parts[0])?;
        let (first_date, last_date, timestamp) = (parts[n - 3], parts[n - 2], parts[n - 1]);
        if !is_date_field(first_date) || !is_date_field(last_date) || !is_timestamp_field(timestamp)
        {
            return None;
        }
        let handle = parts[1..n - 3].join("_");
        if handle.is_empty() {
            return None;
        }
        Some(Self {
            status,
            handle,
            first_date: first_date.to_string(),
            last_date: last_date.to_string(),
            timestamp: timestamp.to_string(),
        })
    }

    /// Same handle and first date: successive exports of one review.
    pub fn same_series(&self, other: &Self) -> bool {
        self.handle == other.handle && self.first_date == other.first_date
    }

    /// Generated later. The last date only breaks a timestamp tie: an
    /// undo can lower it between two saves of the same review.
    pub fn is_newer_than(&self, other: &Self) -> bool {
        (self.timestamp.as_str(), self.last_date.as_str())
            > (other.timestamp.as_str(), other.last_date.as_str())
    }
}

impl fmt::Display for ExportName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}_{}_{}_{}{EXTENSION}",
            self.status.as_str(),
            self.handle,
            self.first_date,
            self.last_date,
            self.timestamp
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(handle: &str, first: &str, last: &str, timestamp: &str) -> ExportName {
        ExportName {
            status: ExportStatus::Unreviewed,
            handle: handle.to_string(),
            first_date: first.to_string(),
            last_date: last.to_string(),
            timestamp: timestamp.to_string(),
        }
    }

    #[test]
    fn sanitizes_components() {
        assert_eq!(sanitize_component("@Randy Feenstra!"), "Randy_Feenstra");
        assert_eq!(sanitize_component("ok_name-1"), "ok_name-1");
        assert_eq!(sanitize_component("@@@"), "unknown");
    }

    #[test]
    fn parses_names_with_underscored_handles() {
        let original = name("team_news", "20240301", "20240305", "20240306T101500");
        let parsed = ExportName::parse(&original.file_name()).unwrap();
        assert_eq!(parsed, original);
        assert_eq!(
            original.file_name(),
            "UNREVIEWED_team_news_20240301_20240305_20240306T101500.xlsx"
        );
    }

    #[test]
    fn rejects_foreign_names() {
        assert_eq!(ExportName::parse("notes.xlsx"), None);
        assert_eq!(ExportName::parse("REVIEWED_h_20240301_20240305_20240306T101500.csv"), None);
        assert_eq!(ExportName::parse("DONE_h_20240301_20240305_20240306T101500.xlsx"), None);
        assert_eq!(ExportName::parse("REVIEWED_20240301_20240305_20240306T101500.xlsx"), None);
        assert_eq!(ExportName::parse("REVIEWED_h_2024031_20240305_20240306T101500.xlsx"), None);
    }

    #[test]
    fn newer_compares_timestamp_then_last_date() {
        let base = name("h", "20240301", "20240305", "20240306T101500");
        let later_date = name("h", "20240301", "20240306", "20240301T000000");
        let later_stamp = name("h", "20240301", "20240304", "20240306T101501");
        let same_stamp_later_date = name("h", "20240301", "20240306", "20240306T101500");
        assert!(!later_date.is_newer_than(&base));
        assert!(base.is_newer_than(&later_date));
        assert!(later_stamp.is_newer_than(&base));
        assert!(same_stamp_later_date.is_newer_than(&base));
        assert!(!base.is_newer_than(&base));
        assert!(base.same_series(&later_date));
        assert!(!base.same_series(&name("h", "20240302", "20240305", "20240306T101500")));
    }
}
