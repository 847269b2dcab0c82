//! Tests for clipbook-model types.

use clipbook_model::{
    BULLETED_COLUMN, PASSED_COLUMN, Row, RowSet, RowStatus, SessionCounters, StatusColumns,
    TOPIC_COLUMN,
};

fn row_set(statuses: Vec<RowStatus>) -> RowSet {
    let columns = vec![
        "URL".to_string(),
        PASSED_COLUMN.to_string(),
        BULLETED_COLUMN.to_string(),
        TOPIC_COLUMN.to_string(),
    ];
    let rows = statuses
        .into_iter()
        .enumerate()
        .map(|(idx, status)| Row {
            url: format!("https://x.com/post/{idx}"),
            text: format!("post {idx}"),
            date: None,
            flags: None,
            is_quote: false,
            status,
            cells: vec![format!("https://x.com/post/{idx}"), String::new(), String::new(), String::new()],
        })
        .collect();
    RowSet::new(
        columns,
        StatusColumns {
            passed: 1,
            bulleted: 2,
            topic: 3,
        },
        rows,
    )
    .expect("valid row set")
}

#[test]
fn counters_are_derived_from_statuses() {
    let rows = row_set(vec![
        RowStatus::Passed,
        RowStatus::Bulleted("ECONOMY".to_string()),
        RowStatus::Unreviewed,
        RowStatus::Bulleted("HEALTH".to_string()),
    ]);
    let counters = SessionCounters::from_rows(&rows);
    assert_eq!(counters.pass_count, 1);
    assert_eq!(counters.bullet_count, 2);
    assert_eq!(counters.total_reviewed, 3);
}

#[test]
fn unreviewed_rows_never_carry_a_topic() {
    let mut rows = row_set(vec![RowStatus::Bulleted("ECONOMY".to_string())]);
    rows.set_status(0, RowStatus::Unreviewed).unwrap();
    let row = rows.get(0).unwrap();
    assert!(!row.reviewed());
    assert_eq!(row.topic(), "");
}

#[test]
fn clear_statuses_resets_every_row() {
    let mut rows = row_set(vec![
        RowStatus::Passed,
        RowStatus::Bulleted("ECONOMY".to_string()),
    ]);
    rows.clear_statuses();
    assert!(rows.iter().all(|row| row.status == RowStatus::Unreviewed));
    assert_eq!(SessionCounters::from_rows(&rows), SessionCounters::default());
}

#[test]
fn status_serializes_with_topic() {
    let json = serde_json::to_string(&RowStatus::Bulleted("ECONOMY".to_string())).unwrap();
    assert_eq!(json, r#"{"status":"bulleted","topic":"ECONOMY"}"#);
    let passed = serde_json::to_string(&RowStatus::Passed).unwrap();
    assert_eq!(passed, r#"{"status":"passed"}"#);
}
