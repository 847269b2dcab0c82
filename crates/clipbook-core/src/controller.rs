//! Session controller: a [`ReviewSession`] wired to a persistence sink.

use chrono::NaiveDateTime;
use serde::Serialize;

use clipbook_model::RowSet;

use crate::checkpoint::CheckpointTrigger;
use crate::document::DocumentModel;
use crate::error::{ActionRejected, PersistenceError};
use crate::export_name::ExportName;
use crate::history::HistoryEntry;
use crate::session::ReviewSession;

/// Everything a checkpoint may write.
#[derive(Debug, Clone, Copy)]
pub struct CheckpointRequest<'a> {
    pub trigger: CheckpointTrigger,
    pub rows: &'a RowSet,
    pub document: &'a DocumentModel,
    /// Export name derived for this checkpoint, for sinks that publish.
    pub export_name: &'a ExportName,
}

/// Where checkpoints and exported copies go.
pub trait CheckpointSink {
    /// Persist the rows and the rendered document.
    fn checkpoint(&mut self, request: &CheckpointRequest<'_>) -> Result<(), PersistenceError>;

    /// Write a reviewed copy of `rows` named `file_name`, returning a
    /// description of where it went.
    fn export_copy(&mut self, rows: &RowSet, file_name: &str) -> Result<String, PersistenceError>;
}

/// Result of the most recent checkpoint attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum CheckpointOutcome {
    Saved {
        at: NaiveDateTime,
        trigger: CheckpointTrigger,
    },
    Failed {
        at: NaiveDateTime,
        trigger: CheckpointTrigger,
        #[serde(serialize_with = "serialize_display")]
        error: PersistenceError,
    },
}

fn serialize_display<S: serde::Serializer>(
    error: &PersistenceError,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

impl CheckpointOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved { .. })
    }

    pub fn at(&self) -> NaiveDateTime {
        match self {
            Self::Saved { at, .. } | Self::Failed { at, .. } => *at,
        }
    }
}

/// Outcome of a pass or bullet seen through the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReport {
    pub row_index: usize,
    /// Present when the action crossed the checkpoint interval.
    pub checkpoint: Option<CheckpointOutcome>,
}

fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// Drives a [`ReviewSession`] and runs checkpoints through a sink.
///
/// Checkpoint failures never roll back the action that triggered them;
/// they are logged and kept as [`last_checkpoint`](Self::last_checkpoint).
pub struct Reviewer<S> {
    session: ReviewSession,
    sink: S,
    last_checkpoint: Option<CheckpointOutcome>,
    clock: fn() -> NaiveDateTime,
}

impl<S: CheckpointSink> Reviewer<S> {
    pub fn new(session: ReviewSession, sink: S) -> Self {
        Self {
            session,
            sink,
            last_checkpoint: None,
            clock: local_now,
        }
    }

    /// Replace the wall clock used for checkpoint times and export names.
    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    pub fn session(&self) -> &ReviewSession {
        &self.session
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn last_checkpoint(&self) -> Option<&CheckpointOutcome> {
        self.last_checkpoint.as_ref()
    }

    pub fn into_parts(self) -> (ReviewSession, S) {
        (self.session, self.sink)
    }

    pub fn pass(&mut self) -> Result<ActionReport, ActionRejected> {
        let outcome = self.session.pass()?;
        Ok(self.after_action(outcome.row_index, outcome.checkpoint_due))
    }

    pub fn bullet(&mut self, topic: &str) -> Result<ActionReport, ActionRejected> {
        let outcome = self.session.bullet(topic)?;
        Ok(self.after_action(outcome.row_index, outcome.checkpoint_due))
    }

    fn after_action(&mut self, row_index: usize, checkpoint_due: bool) -> ActionReport {
        let checkpoint = checkpoint_due.then(|| self.checkpoint(CheckpointTrigger::Interval));
        ActionReport {
            row_index,
            checkpoint,
        }
    }

    pub fn undo(&mut self) -> Result<HistoryEntry, ActionRejected> {
        self.session.undo()
    }

    /// Reset the session and save immediately.
    pub fn reset_for_rereview(&mut self) -> CheckpointOutcome {
        self.session.reset_for_rereview();
        self.checkpoint(CheckpointTrigger::Reset)
    }

    pub fn rebuild_from_source(&mut self) {
        self.session.rebuild_from_source();
    }

    /// Save regardless of the action counter.
    pub fn save_now(&mut self) -> CheckpointOutcome {
        self.checkpoint(CheckpointTrigger::Manual)
    }

    /// Write a copy of the rows under `name`, or under the derived export
    /// name when `name` is `None`. `.xlsx` is appended to names without an
    /// extension.
    pub fn export_copy(&mut self, name: Option<&str>) -> Result<String, PersistenceError> {
        let file_name = match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) if std::path::Path::new(name).extension().is_some() => name.to_string(),
            Some(name) => format!("{name}.xlsx"),
            None => self.session.export_name((self.clock)()).file_name(),
        };
        let location = self.sink.export_copy(self.session.rows(), &file_name)?;
        tracing::info!(file = %file_name, location = %location, "exported reviewed copy");
        Ok(location)
    }

    fn checkpoint(&mut self, trigger: CheckpointTrigger) -> CheckpointOutcome {
        let at = (self.clock)();
        let export_name = self.session.export_name(at);
        self.session.mark_checkpoint_attempted();
        let request = CheckpointRequest {
            trigger,
            rows: self.session.rows(),
            document: self.session.document(),
            export_name: &export_name,
        };
        let outcome = match self.sink.checkpoint(&request) {
            Ok(()) => {
                tracing::info!(?trigger, rows = request.rows.len(), "checkpoint saved");
                CheckpointOutcome::Saved { at, trigger }
            }
            Err(error) => {
                tracing::warn!(?trigger, %error, "checkpoint failed");
                CheckpointOutcome::Failed { at, trigger, error }
            }
        };
        self.last_checkpoint = Some(outcome.clone());
        outcome
    }
}
