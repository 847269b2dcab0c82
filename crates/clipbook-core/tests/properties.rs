//! Property tests for session invariants and the undo inverse law.

mod common;

use proptest::prelude::*;

use clipbook_core::{ActionRejected, ReviewSession, TopicContentIndex, render_document};
use clipbook_model::{RowStatus, SessionCounters};

use common::{prereviewed_rows, session};

#[derive(Debug, Clone)]
enum Op {
    Pass,
    Bullet(&'static str),
    Undo,
    Rebuild,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Pass),
        3 => prop::sample::select(vec!["economy", "Health", "taxes", "  economy "]).prop_map(Op::Bullet),
        2 => Just(Op::Undo),
        1 => Just(Op::Rebuild),
    ]
}

/// Starting statuses: mostly unreviewed, with earlier passes and bullets
/// scattered anywhere, including after the first unreviewed row.
fn starting_rows(max: usize) -> impl Strategy<Value = Vec<RowStatus>> {
    let status = prop_oneof![
        4 => Just(RowStatus::Unreviewed),
        1 => Just(RowStatus::Passed),
        2 => prop::sample::select(vec!["ECONOMY", "HEALTH", "TAXES"])
            .prop_map(|topic| RowStatus::Bulleted(topic.to_string())),
    ];
    prop::collection::vec(status, 1..max)
}

fn apply(session: &mut ReviewSession, op: &Op) -> Result<(), ActionRejected> {
    match op {
        Op::Pass => session.pass().map(drop),
        Op::Bullet(topic) => session.bullet(topic).map(drop),
        Op::Undo => session.undo().map(drop),
        Op::Rebuild => {
            session.rebuild_from_source();
            Ok(())
        }
    }
}

fn statuses(session: &ReviewSession) -> Vec<RowStatus> {
    session.rows().iter().map(|row| row.status.clone()).collect()
}

fn assert_invariants(session: &ReviewSession) {
    for row in session.rows().iter() {
        if !row.reviewed() {
            assert_eq!(row.topic(), "");
        }
    }
    let first_unreviewed = session
        .rows()
        .iter()
        .position(|row| !row.reviewed())
        .unwrap_or(session.rows().len());
    assert_eq!(session.cursor(), first_unreviewed);
    assert_eq!(session.counters(), SessionCounters::from_rows(session.rows()));
    assert_eq!(
        session.topic_index(),
        &TopicContentIndex::from_rows(session.rows())
    );
    assert_eq!(
        session.document(),
        &render_document(session.topic_index(), session.citation_style())
    );
}

proptest! {
    #[test]
    fn invariants_hold_after_every_action(
        start in starting_rows(12),
        ops in prop::collection::vec(op(), 0..40),
    ) {
        let mut session = session(prereviewed_rows(&start));
        assert_invariants(&session);
        for op in &ops {
            let _ = apply(&mut session, op);
            assert_invariants(&session);
        }
    }

    #[test]
    fn undo_restores_the_exact_prior_state(
        start in starting_rows(12),
        prefix in prop::collection::vec(op(), 0..30),
        action in op(),
    ) {
        let mut session = session(prereviewed_rows(&start));
        for op in &prefix {
            let _ = apply(&mut session, op);
        }
        let before_statuses = statuses(&session);
        let before_index = session.topic_index().clone();
        let before_counters = session.counters();
        let before_cursor = session.cursor();

        if matches!(action, Op::Undo | Op::Rebuild) || apply(&mut session, &action).is_err() {
            return Ok(());
        }
        session.undo().expect("an applied action can be undone");

        prop_assert_eq!(statuses(&session), before_statuses);
        prop_assert_eq!(session.topic_index(), &before_index);
        prop_assert_eq!(session.counters(), before_counters);
        prop_assert_eq!(session.cursor(), before_cursor);
    }

    #[test]
    fn rendering_is_idempotent(
        start in starting_rows(8),
        ops in prop::collection::vec(op(), 0..20),
    ) {
        let mut session = session(prereviewed_rows(&start));
        for op in &ops {
            let _ = apply(&mut session, op);
        }
        let style = session.citation_style();
        prop_assert_eq!(
            render_document(session.topic_index(), style),
            render_document(session.topic_index(), style)
        );
    }
}

#[test]
fn undo_on_empty_history_is_a_rejection() {
    let mut session = session(prereviewed_rows(&[RowStatus::Unreviewed]));
    assert_eq!(session.undo(), Err(ActionRejected::NothingToUndo));
    assert_invariants(&session);
}
