//! Directory publishing: supersession, dedup and pruning.

use std::fs;

use tempfile::tempdir;

use clipbook_report::{DirectoryPublisher, PublishOutcome, Publisher};

const OLD: &str = "UNREVIEWED_handle_20240301_20240305_20240306T100000.xlsx";
const NEW: &str = "UNREVIEWED_handle_20240301_20240307_20240308T100000.xlsx";
const NEWEST: &str = "REVIEWED_handle_20240301_20240309_20240310T100000.xlsx";
const OTHER_SERIES: &str = "UNREVIEWED_handle_20240201_20240205_20240206T100000.xlsx";

#[test]
fn newer_export_prunes_older_ones_in_the_same_series() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join(OLD), b"old").unwrap();
    fs::write(dir.path().join(OTHER_SERIES), b"other").unwrap();
    fs::write(dir.path().join("notes.xlsx"), b"notes").unwrap();

    let publisher = DirectoryPublisher::new(dir.path());
    let outcome = publisher.publish(b"new", NEW).expect("publish");

    match outcome {
        PublishOutcome::Written { path, pruned } => {
            assert_eq!(path, dir.path().join(NEW));
            assert_eq!(pruned, vec![dir.path().join(OLD)]);
        }
        other => panic!("expected write, got {other:?}"),
    }
    assert!(!dir.path().join(OLD).exists());
    assert!(dir.path().join(OTHER_SERIES).exists());
    assert!(dir.path().join("notes.xlsx").exists());
}

#[test]
fn stale_export_is_rejected() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join(NEWEST), b"newest").unwrap();

    let err = DirectoryPublisher::new(dir.path())
        .publish(b"older", NEW)
        .unwrap_err();
    assert!(err.is_superseded());
    assert!(!dir.path().join(NEW).exists());
}

#[test]
fn later_save_with_lower_last_date_replaces_the_earlier_one() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join(NEW), b"before undo").unwrap();
    let after_undo = "UNREVIEWED_handle_20240301_20240305_20240308T100500.xlsx";

    let outcome = DirectoryPublisher::new(dir.path())
        .publish(b"after undo", after_undo)
        .expect("publish");

    assert_eq!(
        outcome,
        PublishOutcome::Written {
            path: dir.path().join(after_undo),
            pruned: vec![dir.path().join(NEW)],
        }
    );
    assert!(!dir.path().join(NEW).exists());
}

#[test]
fn identical_content_is_not_rewritten() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join(OLD), b"same bytes").unwrap();

    let outcome = DirectoryPublisher::new(dir.path())
        .publish(b"same bytes", NEW)
        .expect("publish");
    assert_eq!(
        outcome,
        PublishOutcome::Unchanged {
            existing: dir.path().join(OLD)
        }
    );
    assert!(!dir.path().join(NEW).exists());
}

#[test]
fn pruning_can_be_disabled() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join(OLD), b"old").unwrap();

    DirectoryPublisher::new(dir.path())
        .with_prune(false)
        .publish(b"new", NEW)
        .expect("publish");
    assert!(dir.path().join(OLD).exists());
    assert!(dir.path().join(NEW).exists());
}

#[test]
fn unparseable_names_are_written_as_is() {
    let dir = tempdir().expect("tempdir");
    let publisher = DirectoryPublisher::new(dir.path().join("nested"));
    let outcome = publisher.publish(b"copy", "final.xlsx").expect("publish");
    assert!(matches!(outcome, PublishOutcome::Written { ref pruned, .. } if pruned.is_empty()));
    assert_eq!(fs::read(dir.path().join("nested").join("final.xlsx")).unwrap(), b"copy");
}
