//! Shared fixtures for clipbook-core integration tests.

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};

use clipbook_core::{CheckpointPolicy, CitationStyle, ReviewSession, TopicVocabulary};
use clipbook_model::{
    BULLETED_COLUMN, PASSED_COLUMN, Row, RowSet, RowStatus, StatusColumns, TOPIC_COLUMN,
};

pub fn day(n: u32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(2024, 3, n).and_then(|d| d.and_hms_opt(12, 0, 0))
}

pub fn row(url: &str, text: &str, date: Option<NaiveDateTime>) -> Row {
    Row {
        url: url.to_string(),
        text: text.to_string(),
        date,
        flags: None,
        is_quote: false,
        status: RowStatus::Unreviewed,
        cells: vec![url.to_string(), text.to_string(), String::new(), String::new(), String::new()],
    }
}

pub fn row_set(rows: Vec<Row>) -> RowSet {
    let columns = vec![
        "URL".to_string(),
        "Text".to_string(),
        PASSED_COLUMN.to_string(),
        BULLETED_COLUMN.to_string(),
        TOPIC_COLUMN.to_string(),
    ];
    RowSet::new(
        columns,
        StatusColumns {
            passed: 2,
            bulleted: 3,
            topic: 4,
        },
        rows,
    )
    .expect("valid row set")
}

/// `count` distinct rows dated on consecutive days of March 2024.
pub fn numbered_rows(count: usize) -> RowSet {
    row_set(
        (0..count)
            .map(|n| {
                row(
                    &format!("https://x.com/post/{n}"),
                    &format!("post number {n}"),
                    day(1 + (n % 28) as u32),
                )
            })
            .collect(),
    )
}

/// Like [`numbered_rows`], with row `n` already carrying `statuses[n]`,
/// as if recovered from an earlier review.
pub fn prereviewed_rows(statuses: &[RowStatus]) -> RowSet {
    let mut rows = numbered_rows(statuses.len());
    for (index, status) in statuses.iter().enumerate() {
        rows.set_status(index, status.clone()).expect("row in range");
    }
    rows
}

pub fn session(rows: RowSet) -> ReviewSession {
    ReviewSession::new(
        rows,
        TopicVocabulary::new(["Economy"]),
        CitationStyle::default(),
        CheckpointPolicy::default(),
    )
}

pub fn session_with_interval(rows: RowSet, interval: usize) -> ReviewSession {
    ReviewSession::new(
        rows,
        TopicVocabulary::default(),
        CitationStyle::default(),
        CheckpointPolicy::new(interval),
    )
}
