//! Reading unit model - one dated entry in the reading plan.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::id::ReadingId;

/// Total number of readings in the complete plan.
///
/// The plan covers a fixed corpus; this is the denominator for completion
/// percentage no matter how much of the calendar has been published yet.
pub const TOTAL_READINGS: usize = 1189;

/// One scheduled reading in the plan calendar.
///
/// Readings are published once by the plan maintainer and never mutated or
/// deleted afterwards (append-only calendar).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadingUnit {
    /// Unique identifier
    pub id: ReadingId,

    /// Calendar day this reading is scheduled for (UTC)
    pub date: NaiveDate,

    /// Display title
    pub title: String,

    /// Passage to read
    pub passage: String,
}

impl ReadingUnit {
    /// Create a new reading unit for a given day.
    pub fn new(date: NaiveDate, title: impl Into<String>, passage: impl Into<String>) -> Self {
        Self {
            id: ReadingId::new(),
            date,
            title: title.into(),
            passage: passage.into(),
        }
    }
}

/// Classification of a reading relative to a reference day and one user's
/// completion records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadingStatus {
    /// A completed record exists for this reading
    Completed,
    /// Scheduled for the reference day and not yet completed
    Today,
    /// Scheduled before the reference day and not completed
    Overdue,
    /// Scheduled after the reference day; excluded from all counts
    Upcoming,
}

impl ReadingStatus {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingStatus::Completed => "Completed",
            ReadingStatus::Today => "Today",
            ReadingStatus::Overdue => "Overdue",
            ReadingStatus::Upcoming => "Upcoming",
        }
    }
}
