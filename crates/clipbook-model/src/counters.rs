use serde::{Deserialize, Serialize};

use crate::row::{RowSet, RowStatus};

/// Pass/bullet tallies derived from a [`RowSet`].
///
/// Always recomputed from the rows, never adjusted in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCounters {
    pub pass_count: usize,
    pub bullet_count: usize,
    pub total_reviewed: usize,
}

impl SessionCounters {
    pub fn from_rows(rows: &RowSet) -> Self {
        let mut counters = Self::default();
        for row in rows.iter() {
            match row.status {
                RowStatus::Unreviewed => {}
                RowStatus::Passed => counters.pass_count += 1,
                RowStatus::Bulleted(_) => counters.bullet_count += 1,
            }
        }
        counters.total_reviewed = counters.pass_count + counters.bullet_count;
        counters
    }
}
