//! Cross-user ranking.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use lectio_core::{CompletionRecord, ProgressSnapshot, ReadingId, ReadingUnit, UserId, UserProfile};
use serde::Serialize;

use crate::progress::{due_set, snapshot};

/// One ranked row: a member and their derived statistics.
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    /// The ranked member
    pub profile: UserProfile,

    /// Their statistics as of the reference day
    pub snapshot: ProgressSnapshot,
}

/// Rank every member by completed readings.
///
/// The due set is computed once, as of the reference day, and shared by
/// every user's snapshot. Members with no completion records still appear,
/// ranked with zero completed. Ordering is completed count descending,
/// ties broken by ascending user id so repeated calls over identical input
/// produce identical rankings.
pub fn rank(
    profiles: &[UserProfile],
    units: &[ReadingUnit],
    records: &[CompletionRecord],
    as_of: NaiveDate,
) -> Vec<LeaderboardEntry> {
    let due = due_set(units, as_of);

    let mut by_user: HashMap<UserId, HashSet<ReadingId>> = HashMap::new();
    for record in records.iter().filter(|r| r.state.is_completed()) {
        by_user
            .entry(record.user_id)
            .or_default()
            .insert(record.reading_id);
    }

    let none = HashSet::new();
    let mut entries: Vec<LeaderboardEntry> = profiles
        .iter()
        .map(|profile| {
            let completed = by_user.get(&profile.id).unwrap_or(&none);
            LeaderboardEntry {
                profile: profile.clone(),
                snapshot: snapshot(&due, completed),
            }
        })
        .collect();

    entries.sort_by(|a, b| {
        b.snapshot
            .completed_count
            .cmp(&a.snapshot.completed_count)
            .then_with(|| a.profile.id.cmp(&b.profile.id))
    });
    entries
}
