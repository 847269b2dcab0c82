//! Undo history.

use serde::Serialize;

use clipbook_model::RowStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum HistoryAction {
    Pass,
    Bullet { topic: String },
}

/// One reversible action with a snapshot of the status it replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub row_index: usize,
    #[serde(flatten)]
    pub action: HistoryAction,
    pub previous: RowStatus,
}

/// LIFO stack of applied actions. Unbounded; cleared on reset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionHistory {
    entries: Vec<HistoryEntry>,
}

impl ActionHistory {
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    pub fn pop(&mut self) -> Option<HistoryEntry> {
        self.entries.pop()
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
