//! Lectio core data models.
//!
//! This crate defines the data structures shared by the reading-plan
//! progress tracker: the plan calendar, completion records, profiles, and
//! the derived statistics types.

#![warn(missing_docs)]

// Core identities
mod id;

// Plan calendar
mod reading;

// Per-user completion log
mod completion;

// People
mod profile;

// Group announcements
mod announcement;

// Derived statistics
mod snapshot;

// Re-exports
pub use id::*;

pub use reading::{ReadingStatus, ReadingUnit, TOTAL_READINGS};

pub use completion::{CompletionRecord, CompletionState};

pub use profile::{Identity, UserProfile};

pub use announcement::Announcement;

pub use snapshot::ProgressSnapshot;

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
