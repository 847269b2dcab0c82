//! End-to-end review runs against files in a temp directory.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use tempfile::TempDir;

use clipbook_cli::{ClipbookConfig, FileSink, PromptExit, StatusReport, open_review, run_prompt};
use clipbook_core::Reviewer;
use clipbook_ingest::{LoadOptions, load_rows};
use clipbook_model::RowStatus;

const SOURCE: &str = "\
URL,Text,Date
https://x.com/a,First post,2024-03-05
https://x.com/b,Second post,2024-03-06
https://x.com/c,Third post,2024-03-07
";

fn fixed_clock() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 4, 1)
        .and_then(|d| d.and_hms_opt(9, 30, 0))
        .unwrap()
}

/// One second later on every call.
fn ticking_clock() -> NaiveDateTime {
    static TICKS: AtomicU32 = AtomicU32::new(0);
    fixed_clock() + TimeDelta::seconds(i64::from(TICKS.fetch_add(1, Ordering::SeqCst)))
}

fn source_file(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("posts.csv");
    fs::write(&path, SOURCE).unwrap();
    path
}

fn reviewer(source: &Path, config: &ClipbookConfig) -> Reviewer<FileSink> {
    open_review(source, config)
        .unwrap()
        .reviewer
        .with_clock(fixed_clock)
}

fn run(reviewer: &mut Reviewer<FileSink>, input: &str) -> (PromptExit, String) {
    let mut out = Vec::new();
    let exit = run_prompt(reviewer, Cursor::new(input.as_bytes()), &mut out).unwrap();
    (exit, String::from_utf8(out).unwrap())
}

fn statuses(source: &Path) -> Vec<RowStatus> {
    load_rows(source, &LoadOptions::default())
        .unwrap()
        .rows
        .iter()
        .map(|row| row.status.clone())
        .collect()
}

#[test]
fn quit_saves_rows_and_document() {
    let dir = tempfile::tempdir().unwrap();
    let source = source_file(&dir);
    let mut reviewer = reviewer(&source, &ClipbookConfig::default());

    let (exit, output) = run(&mut reviewer, "p\nb economy\nq\n");

    assert_eq!(exit, PromptExit::Clean);
    assert!(output.contains("[1/3] 3/5/24  https://x.com/a"), "{output}");
    assert!(output.contains("[3/3] 3/7/24  https://x.com/c"), "{output}");
    assert!(output.contains("Saved at 09:30:00."), "{output}");
    assert_eq!(
        statuses(&source),
        vec![
            RowStatus::Passed,
            RowStatus::Bulleted("ECONOMY".to_string()),
            RowStatus::Unreviewed,
        ]
    );
    assert!(dir.path().join("posts.docx").is_file());
}

#[test]
fn untouched_session_leaves_source_alone() {
    let dir = tempfile::tempdir().unwrap();
    let source = source_file(&dir);
    let mut reviewer = reviewer(&source, &ClipbookConfig::default());

    let (exit, _) = run(&mut reviewer, "q\n");

    assert_eq!(exit, PromptExit::Clean);
    assert_eq!(fs::read_to_string(&source).unwrap(), SOURCE);
    assert!(!dir.path().join("posts.docx").exists());
}

#[test]
fn end_of_input_behaves_like_quit() {
    let dir = tempfile::tempdir().unwrap();
    let source = source_file(&dir);
    let mut reviewer = reviewer(&source, &ClipbookConfig::default());

    let (exit, _) = run(&mut reviewer, "p\n");

    assert_eq!(exit, PromptExit::Clean);
    assert_eq!(statuses(&source)[0], RowStatus::Passed);
}

#[test]
fn bullet_by_number_uses_sorted_vocabulary() {
    let dir = tempfile::tempdir().unwrap();
    let source = source_file(&dir);
    let mut config = ClipbookConfig::default();
    config.review.starter_topics = vec!["Health".to_string(), "Economy".to_string()];
    let mut reviewer = reviewer(&source, &config);

    let (_, output) = run(&mut reviewer, "t\nb #2\nb #9\nq\n");

    assert!(output.contains("#1   ECONOMY (0)"), "{output}");
    assert!(output.contains("#2   HEALTH (0)"), "{output}");
    assert!(output.contains("no topic #9"), "{output}");
    assert_eq!(statuses(&source)[0], RowStatus::Bulleted("HEALTH".to_string()));
}

#[test]
fn rejected_actions_are_reported_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let source = source_file(&dir);
    let mut reviewer = reviewer(&source, &ClipbookConfig::default());

    let (exit, output) = run(&mut reviewer, "u\nb  \nfly\np\np\np\np\nq\n");

    assert_eq!(exit, PromptExit::Clean);
    assert!(output.contains("nothing to undo"), "{output}");
    assert!(output.contains("bullet needs a topic"), "{output}");
    assert!(output.contains("unknown command 'fly'"), "{output}");
    assert!(output.contains("All 3 rows reviewed"), "{output}");
    assert!(output.contains("no unreviewed rows remain"), "{output}");
}

#[test]
fn reset_requires_confirmation() {
    let dir = tempfile::tempdir().unwrap();
    let source = source_file(&dir);
    let mut reviewer = reviewer(&source, &ClipbookConfig::default());

    let (_, output) = run(&mut reviewer, "b tax\nreset\nno\nq\n");
    assert!(output.contains("Reset cancelled."), "{output}");
    assert_eq!(statuses(&source)[0], RowStatus::Bulleted("TAX".to_string()));

    let mut reviewer = self::reviewer(&source, &ClipbookConfig::default());
    let (_, output) = run(&mut reviewer, "reset\nyes\nq\n");
    assert!(output.contains("Reset. Saved at"), "{output}");
    assert!(statuses(&source).iter().all(|s| *s == RowStatus::Unreviewed));
}

#[test]
fn interval_checkpoint_publishes_derived_export() {
    let dir = tempfile::tempdir().unwrap();
    let source = source_file(&dir);
    let shared = dir.path().join("shared");
    let mut config = ClipbookConfig::default();
    config.review.save_interval = 1;
    config.publish.directory = Some(shared.clone());
    let mut reviewer = reviewer(&source, &config);

    let (exit, _) = run(&mut reviewer, "p\nq\n");

    assert_eq!(exit, PromptExit::Clean);
    let names: Vec<String> = fs::read_dir(&shared)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec!["UNREVIEWED_handle_20240305_20240305_20240401T093000.xlsx".to_string()]
    );
}

#[test]
fn save_after_undo_replaces_the_published_export() {
    let dir = tempfile::tempdir().unwrap();
    let source = source_file(&dir);
    let shared = dir.path().join("shared");
    let mut config = ClipbookConfig::default();
    config.publish.directory = Some(shared.clone());
    let mut reviewer = open_review(&source, &config)
        .unwrap()
        .reviewer
        .with_clock(ticking_clock);

    let (exit, output) = run(&mut reviewer, "b economy\np\ns\nu\ns\nq\n");

    assert_eq!(exit, PromptExit::Clean);
    assert!(!output.contains("Save failed"), "{output}");
    let names: Vec<String> = fs::read_dir(&shared)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names.len(), 1, "{names:?}");
    assert!(
        names[0].starts_with("UNREVIEWED_handle_20240305_20240305_"),
        "{names:?}"
    );
    assert_eq!(
        statuses(&source),
        vec![
            RowStatus::Bulleted("ECONOMY".to_string()),
            RowStatus::Unreviewed,
            RowStatus::Unreviewed,
        ]
    );
}

#[test]
fn failed_final_save_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let source = source_file(&dir);
    let blocked = dir.path().join("blocked.docx");
    fs::create_dir(&blocked).unwrap();
    let mut config = ClipbookConfig::default();
    config.review.document = Some(blocked);
    let mut reviewer = reviewer(&source, &config);

    let (exit, output) = run(&mut reviewer, "p\nq\n");

    assert!(matches!(exit, PromptExit::SaveFailed(ref message) if message.contains("document")));
    assert!(output.contains("Save failed"), "{output}");
    assert_eq!(reviewer.session().counters().pass_count, 1);
}

#[test]
fn export_copy_lands_next_to_source() {
    let dir = tempfile::tempdir().unwrap();
    let source = source_file(&dir);
    let mut reviewer = reviewer(&source, &ClipbookConfig::default());
    reviewer.pass().unwrap();

    let location = reviewer.export_copy(Some("final")).unwrap();

    let copy = dir.path().join("final.xlsx");
    assert_eq!(location, copy.display().to_string());
    let reloaded = load_rows(&copy, &LoadOptions::default()).unwrap();
    assert_eq!(reloaded.rows.len(), 3);
    assert_eq!(reloaded.rows.get(0).map(|r| r.status.clone()), Some(RowStatus::Passed));
    assert_eq!(fs::read_to_string(&source).unwrap(), SOURCE);
}

#[test]
fn status_report_serializes_progress() {
    let dir = tempfile::tempdir().unwrap();
    let source = source_file(&dir);
    let opened = open_review(&source, &ClipbookConfig::default()).unwrap();
    let mut reviewer = opened.reviewer.with_clock(fixed_clock);
    reviewer.bullet("Economy").unwrap();

    let report = StatusReport::collect(
        &source,
        &reviewer,
        &opened.mapping,
        opened.report,
        fixed_clock(),
    );
    let json = serde_json::to_value(&report).unwrap();

    assert!(!report.is_complete());
    assert_eq!(json["rows"], 3);
    assert_eq!(json["remaining"], 2);
    assert_eq!(json["cursor"], 1);
    assert_eq!(json["counters"]["bullet_count"], 1);
    assert_eq!(json["topics"][0]["topic"], "ECONOMY");
    assert_eq!(json["topics"][0]["excerpts"], 1);
    assert_eq!(json["load"]["total_rows"], 3);
    assert_eq!(json["export_name"]["status"], "UNREVIEWED");
    assert_eq!(json["export_name"]["last_date"], "20240305");
}
