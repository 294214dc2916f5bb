//! Progress derivation over the plan calendar.
//!
//! Pure computation: every function here takes a snapshot of readings and
//! completion records and derives classifications and counts from scratch.
//! Nothing is cached between calls, so the numbers can never drift from the
//! underlying records.

use std::collections::HashSet;

use chrono::NaiveDate;
use lectio_core::{
    CompletionRecord, ProgressSnapshot, ReadingId, ReadingStatus, ReadingUnit, TOTAL_READINGS,
};

/// Readings scheduled on or before `as_of`.
///
/// Future readings are excluded entirely: they are neither due, overdue,
/// nor pending, and contribute to no count downstream.
pub fn due_set<'a>(units: &'a [ReadingUnit], as_of: NaiveDate) -> Vec<&'a ReadingUnit> {
    units.iter().filter(|u| u.date <= as_of).collect()
}

/// Ids of the readings a user has in the completed state.
pub fn completed_ids(records: &[CompletionRecord]) -> HashSet<ReadingId> {
    records
        .iter()
        .filter(|r| r.state.is_completed())
        .map(|r| r.reading_id)
        .collect()
}

/// Classify one reading relative to the reference day.
///
/// A completed record wins regardless of date; otherwise the calendar
/// decides: after `as_of` is upcoming, on `as_of` is today, before it is
/// overdue.
pub fn classify(
    unit: &ReadingUnit,
    as_of: NaiveDate,
    completed: &HashSet<ReadingId>,
) -> ReadingStatus {
    if completed.contains(&unit.id) {
        ReadingStatus::Completed
    } else if unit.date > as_of {
        ReadingStatus::Upcoming
    } else if unit.date == as_of {
        ReadingStatus::Today
    } else {
        ReadingStatus::Overdue
    }
}

/// Derive the scalar statistics for one user from a due set.
///
/// The completion percentage is always against the fixed plan size, not
/// the due-set size, so an empty calendar yields `0.0` rather than a
/// division error. Overdue is defined as due-but-incomplete; there is no
/// separately tracked "missed" counter.
pub fn snapshot(due: &[&ReadingUnit], completed: &HashSet<ReadingId>) -> ProgressSnapshot {
    let due_count = due.len();
    let completed_count = due.iter().filter(|u| completed.contains(&u.id)).count();

    let percentage = completed_count as f32 / TOTAL_READINGS as f32 * 100.0;

    ProgressSnapshot {
        completed_count,
        due_count,
        overdue_count: due_count - completed_count,
        remaining_count: TOTAL_READINGS.saturating_sub(completed_count),
        completion_percentage: (percentage * 10.0).round() / 10.0,
    }
}

/// Due readings not yet completed, oldest first.
///
/// Oldest-first ordering puts the longest-overdue reading at the top of
/// the list.
pub fn pending_list<'a>(
    due: &[&'a ReadingUnit],
    completed: &HashSet<ReadingId>,
) -> Vec<&'a ReadingUnit> {
    let mut pending: Vec<&ReadingUnit> = due
        .iter()
        .copied()
        .filter(|u| !completed.contains(&u.id))
        .collect();
    pending.sort_by(|a, b| a.date.cmp(&b.date));
    pending
}

/// The reading scheduled for the reference day, if the calendar has one.
pub fn today_reading<'a>(units: &'a [ReadingUnit], as_of: NaiveDate) -> Option<&'a ReadingUnit> {
    units.iter().find(|u| u.date == as_of)
}
