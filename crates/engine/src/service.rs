//! Caller-facing tracker service.

use std::sync::Arc;

use chrono::NaiveDate;
use lectio_core::{
    Announcement, CompletionRecord, ProgressSnapshot, ReadingId, ReadingStatus, ReadingUnit,
    UserId,
};
use lectio_storage::Store;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::EngineError;
use crate::leaderboard::{rank, LeaderboardEntry};
use crate::progress::{classify, completed_ids, due_set, pending_list, snapshot, today_reading};
use crate::toggle::ToggleController;

/// The surface the UI or service layer calls.
///
/// Stateless between calls: every read recomputes from a fresh snapshot of
/// the store, and every input set for one computation is fully resolved
/// before classification runs. After a mutation the caller re-derives
/// rather than patching derived state.
pub struct TrackerService<S: Store> {
    storage: Arc<Mutex<S>>,
    toggles: ToggleController<S>,
}

impl<S: Store + 'static> TrackerService<S> {
    /// Create a service owning the given store.
    pub fn new(storage: S) -> Self {
        let storage = Arc::new(Mutex::new(storage));
        let toggles = ToggleController::new(Arc::clone(&storage));
        Self { storage, toggles }
    }

    /// Shared handle to the underlying store.
    pub fn storage(&self) -> Arc<Mutex<S>> {
        Arc::clone(&self.storage)
    }

    /// Derive one user's statistics as of a reference day.
    pub async fn get_snapshot(
        &self,
        user_id: UserId,
        as_of: NaiveDate,
    ) -> Result<ProgressSnapshot, EngineError> {
        let (units, records) = self.load_user_inputs(user_id).await?;
        let due = due_set(&units, as_of);
        let completed = completed_ids(&records);
        Ok(snapshot(&due, &completed))
    }

    /// Due readings the user has not completed, oldest first.
    pub async fn get_pending_readings(
        &self,
        user_id: UserId,
        as_of: NaiveDate,
    ) -> Result<Vec<ReadingUnit>, EngineError> {
        let (units, records) = self.load_user_inputs(user_id).await?;
        let due = due_set(&units, as_of);
        let completed = completed_ids(&records);
        Ok(pending_list(&due, &completed)
            .into_iter()
            .cloned()
            .collect())
    }

    /// The reading scheduled for the reference day, if any.
    ///
    /// `None` just means the calendar has no entry for the day; it is not
    /// an error.
    pub async fn get_today_reading(
        &self,
        as_of: NaiveDate,
    ) -> Result<Option<ReadingUnit>, EngineError> {
        let units = {
            let storage = self.storage.lock().await;
            storage.list_readings().await.map_err(EngineError::input)?
        };
        Ok(today_reading(&units, as_of).cloned())
    }

    /// Recent calendar entries with their classification, newest first.
    pub async fn get_calendar(
        &self,
        user_id: UserId,
        as_of: NaiveDate,
        limit: usize,
    ) -> Result<Vec<(ReadingUnit, ReadingStatus)>, EngineError> {
        let (units, records) = self.load_user_inputs(user_id).await?;
        let completed = completed_ids(&records);
        let mut entries: Vec<(ReadingUnit, ReadingStatus)> = units
            .iter()
            .map(|u| (u.clone(), classify(u, as_of, &completed)))
            .collect();
        entries.sort_by(|a, b| b.0.date.cmp(&a.0.date));
        entries.truncate(limit);
        Ok(entries)
    }

    /// Flip the user's completion state for a reading.
    ///
    /// The reading must be part of the plan calendar. Derived snapshots are
    /// not patched here; callers re-read after a successful toggle.
    pub async fn toggle(
        &self,
        user_id: UserId,
        reading_id: ReadingId,
    ) -> Result<CompletionRecord, EngineError> {
        {
            let storage = self.storage.lock().await;
            let units = storage.list_readings().await.map_err(EngineError::input)?;
            if !units.iter().any(|u| u.id == reading_id) {
                return Err(EngineError::UnknownReading(reading_id));
            }
        }
        self.toggles.toggle(user_id, reading_id).await
    }

    /// Rank every member by completed readings as of a reference day.
    pub async fn get_leaderboard(
        &self,
        as_of: NaiveDate,
    ) -> Result<Vec<LeaderboardEntry>, EngineError> {
        let storage = self.storage.lock().await;
        let (profiles, units, records) = tokio::join!(
            storage.list_profiles(),
            storage.list_readings(),
            storage.list_completions(None),
        );
        let profiles = profiles.map_err(EngineError::input)?;
        let units = units.map_err(EngineError::input)?;
        let records = records.map_err(EngineError::input)?;
        debug!(users = profiles.len(), records = records.len(), "ranking leaderboard");
        Ok(rank(&profiles, &units, &records, as_of))
    }

    /// Active announcements, newest first.
    pub async fn list_announcements(&self) -> Result<Vec<Announcement>, EngineError> {
        let storage = self.storage.lock().await;
        storage
            .list_announcements()
            .await
            .map_err(EngineError::input)
    }

    /// Load the plan and one user's records concurrently; classification
    /// only runs once both have resolved.
    async fn load_user_inputs(
        &self,
        user_id: UserId,
    ) -> Result<(Vec<ReadingUnit>, Vec<CompletionRecord>), EngineError> {
        let storage = self.storage.lock().await;
        let (units, records) = tokio::join!(
            storage.list_readings(),
            storage.list_completions(Some(user_id)),
        );
        Ok((
            units.map_err(EngineError::input)?,
            records.map_err(EngineError::input)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use async_trait::async_trait;
    use chrono::Utc;
    use lectio_core::{CompletionState, UserProfile, TOTAL_READINGS};
    use lectio_storage::{Result as StoreResult, StoreError};

    /// In-memory store seeded per test; `unavailable` makes every read
    /// fail, standing in for a store that cannot be reached.
    #[derive(Default)]
    struct MemStore {
        readings: Vec<ReadingUnit>,
        completions: HashMap<(UserId, ReadingId), CompletionRecord>,
        profiles: Vec<UserProfile>,
        announcements: Vec<Announcement>,
        unavailable: bool,
    }

    impl MemStore {
        fn check(&self) -> StoreResult<()> {
            if self.unavailable {
                Err(StoreError::NotFound("store unavailable".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl Store for MemStore {
        async fn save_reading(&mut self, reading: &ReadingUnit) -> StoreResult<()> {
            self.readings.push(reading.clone());
            Ok(())
        }
        async fn list_readings(&self) -> StoreResult<Vec<ReadingUnit>> {
            self.check()?;
            let mut readings = self.readings.clone();
            readings.sort_by(|a, b| a.date.cmp(&b.date));
            Ok(readings)
        }
        async fn insert_completion(&mut self, record: &CompletionRecord) -> StoreResult<()> {
            let key = (record.user_id, record.reading_id);
            if self.completions.contains_key(&key) {
                return Err(StoreError::DuplicateRecord {
                    user_id: record.user_id,
                    reading_id: record.reading_id,
                });
            }
            self.completions.insert(key, record.clone());
            Ok(())
        }
        async fn update_completion(&mut self, record: &CompletionRecord) -> StoreResult<()> {
            self.completions
                .insert((record.user_id, record.reading_id), record.clone());
            Ok(())
        }
        async fn find_completion(
            &self,
            user_id: UserId,
            reading_id: ReadingId,
        ) -> StoreResult<Option<CompletionRecord>> {
            Ok(self.completions.get(&(user_id, reading_id)).cloned())
        }
        async fn list_completions(
            &self,
            user_id: Option<UserId>,
        ) -> StoreResult<Vec<CompletionRecord>> {
            self.check()?;
            Ok(self
                .completions
                .values()
                .filter(|r| user_id.map_or(true, |u| r.user_id == u))
                .cloned()
                .collect())
        }
        async fn save_profile(&mut self, profile: &UserProfile) -> StoreResult<()> {
            self.profiles.push(profile.clone());
            Ok(())
        }
        async fn list_profiles(&self) -> StoreResult<Vec<UserProfile>> {
            self.check()?;
            Ok(self.profiles.clone())
        }
        async fn save_announcement(&mut self, announcement: &Announcement) -> StoreResult<()> {
            self.announcements.push(announcement.clone());
            Ok(())
        }
        async fn list_announcements(&self) -> StoreResult<Vec<Announcement>> {
            self.check()?;
            Ok(self.announcements.clone())
        }
    }

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, n).unwrap()
    }

    /// Three readings dated day 1..3, one user with day 2 completed.
    fn seeded() -> (MemStore, UserProfile, Vec<ReadingUnit>) {
        let mut store = MemStore::default();
        let units: Vec<ReadingUnit> = (1..=3)
            .map(|n| ReadingUnit::new(day(n), format!("Day {}", n), format!("Passage {}", n)))
            .collect();
        store.readings = units.clone();

        let user = UserProfile::new("Reader", Utc::now());
        store.profiles.push(user.clone());
        let record = CompletionRecord::completed(user.id, units[1].id, Utc::now());
        store.completions.insert((user.id, units[1].id), record);

        (store, user, units)
    }

    #[tokio::test]
    async fn test_snapshot_scenario() {
        let (store, user, _) = seeded();
        let service = TrackerService::new(store);

        let snap = service.get_snapshot(user.id, day(3)).await.unwrap();
        assert_eq!(snap.due_count, 3);
        assert_eq!(snap.completed_count, 1);
        assert_eq!(snap.overdue_count, 2);
        assert_eq!(snap.completed_count + snap.remaining_count, TOTAL_READINGS);
    }

    #[tokio::test]
    async fn test_pending_then_toggle_today() {
        let (store, user, units) = seeded();
        let service = TrackerService::new(store);

        let pending = service.get_pending_readings(user.id, day(3)).await.unwrap();
        let dates: Vec<_> = pending.iter().map(|u| u.date).collect();
        assert_eq!(dates, vec![day(1), day(3)]);

        // Toggle today's reading, then re-derive
        service.toggle(user.id, units[2].id).await.unwrap();

        let pending = service.get_pending_readings(user.id, day(3)).await.unwrap();
        let dates: Vec<_> = pending.iter().map(|u| u.date).collect();
        assert_eq!(dates, vec![day(1)]);

        let snap = service.get_snapshot(user.id, day(3)).await.unwrap();
        assert_eq!(snap.completed_count, 2);
    }

    #[tokio::test]
    async fn test_toggle_unknown_reading_rejected() {
        let (store, user, _) = seeded();
        let service = TrackerService::new(store);

        let err = service.toggle(user.id, ReadingId::new()).await.unwrap_err();
        assert!(matches!(err, EngineError::UnknownReading(_)));
    }

    #[tokio::test]
    async fn test_toggle_back_drops_timestamp() {
        let (store, user, units) = seeded();
        let service = TrackerService::new(store);

        let record = service.toggle(user.id, units[1].id).await.unwrap();
        assert_eq!(record.state, CompletionState::Pending);

        let snap = service.get_snapshot(user.id, day(3)).await.unwrap();
        assert_eq!(snap.completed_count, 0);
    }

    #[tokio::test]
    async fn test_today_reading_present_and_absent() {
        let (store, _, units) = seeded();
        let service = TrackerService::new(store);

        let today = service.get_today_reading(day(2)).await.unwrap();
        assert_eq!(today.map(|u| u.id), Some(units[1].id));

        assert!(service.get_today_reading(day(9)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_leaderboard_repeated_calls_are_stable() {
        let (mut store, _, units) = seeded();
        // Second user tied at one completed reading
        let rival = UserProfile::new("Rival", Utc::now());
        store.profiles.push(rival.clone());
        let record = CompletionRecord::completed(rival.id, units[0].id, Utc::now());
        store.completions.insert((rival.id, units[0].id), record);

        let service = TrackerService::new(store);
        let first = service.get_leaderboard(day(3)).await.unwrap();
        let second = service.get_leaderboard(day(3)).await.unwrap();

        let first_ids: Vec<_> = first.iter().map(|e| e.profile.id).collect();
        let second_ids: Vec<_> = second.iter().map(|e| e.profile.id).collect();
        assert_eq!(first_ids, second_ids);
    }

    #[tokio::test]
    async fn test_unavailable_store_is_input_unavailable() {
        let (mut store, user, _) = seeded();
        store.unavailable = true;
        let service = TrackerService::new(store);

        let err = service.get_snapshot(user.id, day(3)).await.unwrap_err();
        assert!(matches!(err, EngineError::InputUnavailable(_)));

        let err = service.get_leaderboard(day(3)).await.unwrap_err();
        assert!(matches!(err, EngineError::InputUnavailable(_)));
    }

    #[tokio::test]
    async fn test_calendar_newest_first_with_classification() {
        let (store, user, units) = seeded();
        let service = TrackerService::new(store);

        let entries = service.get_calendar(user.id, day(2), 10).await.unwrap();
        let statuses: Vec<_> = entries.iter().map(|(u, s)| (u.date, *s)).collect();
        assert_eq!(
            statuses,
            vec![
                (day(3), ReadingStatus::Upcoming),
                (day(2), ReadingStatus::Completed),
                (day(1), ReadingStatus::Overdue),
            ]
        );

        let limited = service.get_calendar(user.id, day(2), 2).await.unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].0.id, units[2].id);
    }

    #[tokio::test]
    async fn test_announcements_pass_through() {
        let (mut store, _, _) = seeded();
        store
            .announcements
            .push(Announcement::new("Kickoff", "We start Monday", Utc::now()));
        let service = TrackerService::new(store);

        let listed = service.list_announcements().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "Kickoff");
    }
}
