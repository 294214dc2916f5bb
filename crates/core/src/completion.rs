//! Completion records and the per-reading completion state machine.

use serde::{Deserialize, Serialize};

use crate::id::{ReadingId, RecordId, UserId};
use crate::Time;

/// Completion state for one (user, reading) pair.
///
/// Two states, freely toggled: `Pending ⇄ Completed`. The timestamp only
/// exists in the `Completed` state, so a "not completed but timestamped"
/// record cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompletionState {
    /// Not marked complete
    Pending,
    /// Marked complete at the given instant
    Completed {
        /// When the user marked the reading complete
        at: Time,
    },
}

impl CompletionState {
    /// Whether this state counts as completed.
    pub fn is_completed(&self) -> bool {
        matches!(self, CompletionState::Completed { .. })
    }

    /// Completion instant, if completed.
    pub fn completed_at(&self) -> Option<Time> {
        match self {
            CompletionState::Completed { at } => Some(*at),
            CompletionState::Pending => None,
        }
    }
}

/// The durable fact that a user marked a reading complete or incomplete.
///
/// Invariant: at most one record exists per (user, reading) pair. Records
/// are created on the first toggle and updated in place afterwards, never
/// deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRecord {
    /// Unique identifier
    pub id: RecordId,

    /// Owning user
    pub user_id: UserId,

    /// The reading this record tracks
    pub reading_id: ReadingId,

    /// Current completion state
    pub state: CompletionState,
}

impl CompletionRecord {
    /// Create the record for a first toggle: it starts out completed.
    pub fn completed(user_id: UserId, reading_id: ReadingId, at: Time) -> Self {
        Self {
            id: RecordId::new(),
            user_id,
            reading_id,
            state: CompletionState::Completed { at },
        }
    }

    /// Flip the completion state.
    ///
    /// The transition to `Completed` stamps `now`; the transition back to
    /// `Pending` drops the timestamp. The record keeps its identity either
    /// way, so two toggles in a row restore the original state value.
    pub fn toggle(&mut self, now: Time) {
        self.state = match self.state {
            CompletionState::Pending => CompletionState::Completed { at: now },
            CompletionState::Completed { .. } => CompletionState::Pending,
        };
    }
}
