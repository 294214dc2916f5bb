//! Derived progress statistics.

use serde::{Deserialize, Serialize};

/// Per-user progress statistics as of a reference day.
///
/// Ephemeral: recomputed from raw completion records on every read and
/// discarded after use. Nothing here is a stored counter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    /// Readings completed among those due
    pub completed_count: usize,

    /// Readings scheduled on or before the reference day
    pub due_count: usize,

    /// Due but not completed
    pub overdue_count: usize,

    /// Readings left in the whole plan
    pub remaining_count: usize,

    /// Completed share of the whole plan, percent, one decimal
    pub completion_percentage: f32,
}

impl Default for ProgressSnapshot {
    fn default() -> Self {
        Self {
            completed_count: 0,
            due_count: 0,
            overdue_count: 0,
            remaining_count: crate::TOTAL_READINGS,
            completion_percentage: 0.0,
        }
    }
}
