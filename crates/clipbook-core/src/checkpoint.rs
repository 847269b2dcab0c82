//! Checkpoint policy: when to persist review progress.

use serde::Serialize;

/// Actions between automatic saves.
pub const DEFAULT_SAVE_INTERVAL: usize = 20;

/// Why a checkpoint ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckpointTrigger {
    /// The action counter reached the interval.
    Interval,
    /// The reviewer asked for a save.
    Manual,
    /// Reset for re-review.
    Reset,
}

/// Counts actions since the last save attempt.
///
/// The counter resets on every attempt, successful or not, so a failed
/// periodic save is retried only at the next interval crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckpointPolicy {
    interval: usize,
    actions_since_save: usize,
}

impl Default for CheckpointPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_SAVE_INTERVAL)
    }
}

impl CheckpointPolicy {
    /// An interval of 0 is treated as 1 (save after every action).
    pub fn new(interval: usize) -> Self {
        Self {
            interval: interval.max(1),
            actions_since_save: 0,
        }
    }

    pub fn interval(&self) -> usize {
        self.interval
    }

    pub fn pending(&self) -> usize {
        self.actions_since_save
    }

    /// Count one action. Returns `true` when a save is due.
    pub fn record_action(&mut self) -> bool {
        self.actions_since_save += 1;
        self.actions_since_save >= self.interval
    }

    /// Undo takes back one counted action.
    pub fn revert_action(&mut self) {
        self.actions_since_save = self.actions_since_save.saturating_sub(1);
    }

    pub fn mark_attempted(&mut self) {
        self.actions_since_save = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn due_on_interval_crossing() {
        let mut policy = CheckpointPolicy::new(3);
        assert!(!policy.record_action());
        assert!(!policy.record_action());
        assert!(policy.record_action());
        policy.mark_attempted();
        assert_eq!(policy.pending(), 0);
    }

    #[test]
    fn revert_is_floored_at_zero() {
        let mut policy = CheckpointPolicy::new(3);
        policy.revert_action();
        assert_eq!(policy.pending(), 0);
        policy.record_action();
        policy.record_action();
        policy.revert_action();
        assert!(!policy.record_action());
        assert!(policy.record_action());
    }

    #[test]
    fn zero_interval_saves_every_action() {
        let mut policy = CheckpointPolicy::new(0);
        assert_eq!(policy.interval(), 1);
        assert!(policy.record_action());
    }
}
