//! The review session state machine.

use chrono::NaiveDateTime;

use clipbook_model::{Row, RowSet, RowStatus, SessionCounters, normalize_topic};

use crate::checkpoint::CheckpointPolicy;
use crate::cursor::TraversalCursor;
use crate::document::{CitationStyle, DocumentModel, render_document};
use crate::error::ActionRejected;
use crate::excerpt::excerpt_for;
use crate::export_name::{ExportName, derive_export_name};
use crate::history::{ActionHistory, HistoryAction, HistoryEntry};
use crate::topics::{TopicContentIndex, TopicVocabulary};

/// Result of an applied pass or bullet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionOutcome {
    /// Row the action was applied to.
    pub row_index: usize,
    /// The checkpoint interval was reached by this action.
    pub checkpoint_due: bool,
}

/// One reviewer's pass over a [`RowSet`].
///
/// Every action updates row status, history, topic index, rendered
/// document and counters before returning, so the session is never
/// observed half-updated. Persistence is left to the caller.
#[derive(Debug, Clone)]
pub struct ReviewSession {
    rows: RowSet,
    cursor: TraversalCursor,
    index: TopicContentIndex,
    vocabulary: TopicVocabulary,
    history: ActionHistory,
    document: DocumentModel,
    counters: SessionCounters,
    policy: CheckpointPolicy,
    style: CitationStyle,
}

impl ReviewSession {
    /// Start a session. Content already recorded in the row statuses is
    /// replayed into the topic index.
    pub fn new(
        rows: RowSet,
        mut vocabulary: TopicVocabulary,
        style: CitationStyle,
        policy: CheckpointPolicy,
    ) -> Self {
        let index = TopicContentIndex::from_rows(&rows);
        vocabulary.rebuild(&index);
        let document = render_document(&index, &style);
        let counters = SessionCounters::from_rows(&rows);
        let cursor = TraversalCursor::start(&rows);
        tracing::debug!(
            rows = rows.len(),
            reviewed = counters.total_reviewed,
            cursor = cursor.position(),
            "review session started"
        );
        Self {
            rows,
            cursor,
            index,
            vocabulary,
            history: ActionHistory::default(),
            document,
            counters,
            policy,
            style,
        }
    }

    // === Accessors ===

    pub fn rows(&self) -> &RowSet {
        &self.rows
    }

    pub fn cursor(&self) -> usize {
        self.cursor.position()
    }

    /// The row awaiting a decision, if any.
    pub fn current(&self) -> Option<(usize, &Row)> {
        let position = self.cursor.position();
        self.rows.get(position).map(|row| (position, row))
    }

    pub fn is_complete(&self) -> bool {
        self.cursor.is_complete(&self.rows)
    }

    pub fn remaining(&self) -> usize {
        self.rows.len() - self.counters.total_reviewed
    }

    pub fn counters(&self) -> SessionCounters {
        self.counters
    }

    pub fn topic_index(&self) -> &TopicContentIndex {
        &self.index
    }

    pub fn vocabulary(&self) -> &TopicVocabulary {
        &self.vocabulary
    }

    pub fn history(&self) -> &ActionHistory {
        &self.history
    }

    pub fn document(&self) -> &DocumentModel {
        &self.document
    }

    pub fn policy(&self) -> &CheckpointPolicy {
        &self.policy
    }

    pub fn citation_style(&self) -> &CitationStyle {
        &self.style
    }

    pub fn export_name(&self, generated_at: NaiveDateTime) -> ExportName {
        derive_export_name(&self.rows, &self.style.handle, generated_at)
    }

    pub(crate) fn mark_checkpoint_attempted(&mut self) {
        self.policy.mark_attempted();
    }

    // === Actions ===

    /// Mark the current row reviewed without output.
    pub fn pass(&mut self) -> Result<ActionOutcome, ActionRejected> {
        let row_index = self.cursor.position();
        let previous = self
            .rows
            .set_status(row_index, RowStatus::Passed)
            .map_err(|_| ActionRejected::EndOfData)?;
        self.history.push(HistoryEntry {
            row_index,
            action: HistoryAction::Pass,
            previous,
        });
        Ok(self.finish_action(row_index, "pass"))
    }

    /// File the current row under `topic` (upper-cased) and add its
    /// excerpt to the document.
    pub fn bullet(&mut self, topic: &str) -> Result<ActionOutcome, ActionRejected> {
        let topic = normalize_topic(topic).ok_or(ActionRejected::EmptyTopic)?;
        let row_index = self.cursor.position();
        let previous = self
            .rows
            .set_status(row_index, RowStatus::Bulleted(topic.clone()))
            .map_err(|_| ActionRejected::EndOfData)?;
        if let Some(row) = self.rows.get(row_index) {
            self.index.insert(&topic, row_index, excerpt_for(row));
        }
        self.render();
        self.vocabulary.register(&topic);
        self.history.push(HistoryEntry {
            row_index,
            action: HistoryAction::Bullet { topic },
            previous,
        });
        Ok(self.finish_action(row_index, "bullet"))
    }

    fn finish_action(&mut self, row_index: usize, action: &'static str) -> ActionOutcome {
        self.cursor.advance(&self.rows);
        self.counters = SessionCounters::from_rows(&self.rows);
        let checkpoint_due = self.policy.record_action();
        tracing::debug!(
            action,
            row = row_index,
            cursor = self.cursor.position(),
            pending = self.policy.pending(),
            "action applied"
        );
        ActionOutcome {
            row_index,
            checkpoint_due,
        }
    }

    /// Revert the most recent pass or bullet. Never triggers a save.
    pub fn undo(&mut self) -> Result<HistoryEntry, ActionRejected> {
        let entry = self.history.pop().ok_or(ActionRejected::NothingToUndo)?;
        if let HistoryAction::Bullet { topic } = &entry.action {
            self.index.remove_row(topic, entry.row_index);
            self.render();
        }
        if let Err(error) = self.rows.set_status(entry.row_index, entry.previous.clone()) {
            tracing::warn!(%error, "undo target row is missing");
        }
        self.cursor.rewind_to(entry.row_index, &self.rows);
        self.counters = SessionCounters::from_rows(&self.rows);
        self.policy.revert_action();
        tracing::debug!(
            row = entry.row_index,
            cursor = self.cursor.position(),
            "action undone"
        );
        Ok(entry)
    }

    /// Clear every status, the history, the topic index and the vocabulary
    /// additions, and return to the first row. Row order is kept.
    pub fn reset_for_rereview(&mut self) {
        self.rows.clear_statuses();
        self.history.clear();
        self.index.clear();
        self.vocabulary.reset();
        self.cursor.rewind_to(0, &self.rows);
        self.counters = SessionCounters::from_rows(&self.rows);
        self.render();
        tracing::info!(rows = self.rows.len(), "session reset for re-review");
    }

    /// Re-derive the topic index, vocabulary and document from the row
    /// statuses alone.
    pub fn rebuild_from_source(&mut self) {
        self.index = TopicContentIndex::from_rows(&self.rows);
        self.vocabulary.rebuild(&self.index);
        self.render();
        tracing::info!(
            topics = self.index.topic_count(),
            excerpts = self.index.excerpt_count(),
            "document rebuilt from row statuses"
        );
    }

    fn render(&mut self) {
        self.document = render_document(&self.index, &self.style);
    }
}
