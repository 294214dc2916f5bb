//! JSON file storage implementation.
//!
//! Stores each object as a JSON file under a root directory (typically
//! `.lectio/`). Completion records are keyed by their (user, reading) pair
//! rather than their record id, so the at-most-one-record-per-pair
//! invariant holds structurally: a second insert for the same pair lands on
//! an existing file and is rejected.

use std::path::Path;

use lectio_core::{Announcement, CompletionRecord, ReadingId, ReadingUnit, UserId, UserProfile};
use tokio::fs;
use tracing::debug;

use super::{Result, Store, StoreError};

/// File-based JSON storage backend.
pub struct JsonStore {
    root: std::path::PathBuf,
}

impl JsonStore {
    /// Create storage, ensuring the per-kind subdirectories exist.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        fs::create_dir_all(root.join("readings")).await?;
        fs::create_dir_all(root.join("completions")).await?;
        fs::create_dir_all(root.join("profiles")).await?;
        fs::create_dir_all(root.join("announcements")).await?;

        Ok(Self { root })
    }

    fn reading_path(&self, id: ReadingId) -> std::path::PathBuf {
        self.root.join("readings").join(format!("{}.json", id))
    }
    fn completion_path(&self, user_id: UserId, reading_id: ReadingId) -> std::path::PathBuf {
        self.root
            .join("completions")
            .join(format!("{}_{}.json", user_id, reading_id))
    }
    fn profile_path(&self, id: UserId) -> std::path::PathBuf {
        self.root.join("profiles").join(format!("{}.json", id))
    }
    fn announcement_path(&self, announcement: &Announcement) -> std::path::PathBuf {
        self.root
            .join("announcements")
            .join(format!("{}.json", announcement.id))
    }
}

#[async_trait::async_trait]
impl Store for JsonStore {
    async fn save_reading(&mut self, reading: &ReadingUnit) -> Result<()> {
        let json = serde_json::to_string_pretty(reading)?;
        fs::write(self.reading_path(reading.id), json.as_bytes()).await?;
        Ok(())
    }

    async fn list_readings(&self) -> Result<Vec<ReadingUnit>> {
        let mut readings: Vec<ReadingUnit> = list_dir(&self.root.join("readings")).await?;
        readings.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(readings)
    }

    async fn insert_completion(&mut self, record: &CompletionRecord) -> Result<()> {
        let path = self.completion_path(record.user_id, record.reading_id);
        if fs::try_exists(&path).await? {
            return Err(StoreError::DuplicateRecord {
                user_id: record.user_id,
                reading_id: record.reading_id,
            });
        }
        let json = serde_json::to_string_pretty(record)?;
        fs::write(&path, json.as_bytes()).await?;
        debug!(user = %record.user_id, reading = %record.reading_id, "inserted completion record");
        Ok(())
    }

    async fn update_completion(&mut self, record: &CompletionRecord) -> Result<()> {
        let path = self.completion_path(record.user_id, record.reading_id);
        if !fs::try_exists(&path).await? {
            return Err(StoreError::NotFound(format!(
                "completion record {}",
                record.id
            )));
        }
        let json = serde_json::to_string_pretty(record)?;
        fs::write(&path, json.as_bytes()).await?;
        debug!(user = %record.user_id, reading = %record.reading_id, "updated completion record");
        Ok(())
    }

    async fn find_completion(
        &self,
        user_id: UserId,
        reading_id: ReadingId,
    ) -> Result<Option<CompletionRecord>> {
        read_json(&self.completion_path(user_id, reading_id)).await
    }

    async fn list_completions(&self, user_id: Option<UserId>) -> Result<Vec<CompletionRecord>> {
        let all: Vec<CompletionRecord> = list_dir(&self.root.join("completions")).await?;
        Ok(all
            .into_iter()
            .filter(|r| user_id.map_or(true, |u| r.user_id == u))
            .collect())
    }

    async fn save_profile(&mut self, profile: &UserProfile) -> Result<()> {
        let json = serde_json::to_string_pretty(profile)?;
        fs::write(self.profile_path(profile.id), json.as_bytes()).await?;
        Ok(())
    }

    async fn list_profiles(&self) -> Result<Vec<UserProfile>> {
        list_dir(&self.root.join("profiles")).await
    }

    async fn save_announcement(&mut self, announcement: &Announcement) -> Result<()> {
        let json = serde_json::to_string_pretty(announcement)?;
        fs::write(self.announcement_path(announcement), json.as_bytes()).await?;
        Ok(())
    }

    async fn list_announcements(&self) -> Result<Vec<Announcement>> {
        let mut announcements: Vec<Announcement> =
            list_dir(&self.root.join("announcements")).await?;
        announcements.retain(|a| a.is_active);
        announcements.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(announcements)
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &std::path::Path) -> Result<Option<T>> {
    match fs::read_to_string(path).await {
        Ok(json) => {
            let value = serde_json::from_str(&json)?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn list_dir<T: serde::de::DeserializeOwned>(dir: &std::path::Path) -> Result<Vec<T>> {
    let mut items = Vec::new();
    let mut rd = fs::read_dir(dir).await?;
    while let Some(entry) = rd.next_entry().await? {
        if entry.path().extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }
        if let Ok(Some(item)) = read_json(&entry.path()).await {
            items.push(item);
        }
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use lectio_core::CompletionState;

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, n).unwrap()
    }

    #[tokio::test]
    async fn test_readings_round_trip_sorted_by_date() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonStore::new(dir.path()).await.unwrap();

        store
            .save_reading(&ReadingUnit::new(day(3), "Day 3", "Genesis 5-7"))
            .await
            .unwrap();
        store
            .save_reading(&ReadingUnit::new(day(1), "Day 1", "Genesis 1-2"))
            .await
            .unwrap();
        store
            .save_reading(&ReadingUnit::new(day(2), "Day 2", "Genesis 3-4"))
            .await
            .unwrap();

        let readings = store.list_readings().await.unwrap();
        let dates: Vec<_> = readings.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![day(1), day(2), day(3)]);
    }

    #[tokio::test]
    async fn test_insert_rejects_second_record_for_pair() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonStore::new(dir.path()).await.unwrap();

        let user = UserId::new();
        let reading = ReadingId::new();
        let first = CompletionRecord::completed(user, reading, Utc::now());
        store.insert_completion(&first).await.unwrap();

        let second = CompletionRecord::completed(user, reading, Utc::now());
        let err = store.insert_completion(&second).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateRecord { .. }));

        // The original record is still the one on disk
        let found = store.find_completion(user, reading).await.unwrap().unwrap();
        assert_eq!(found.id, first.id);
    }

    #[tokio::test]
    async fn test_update_flips_state_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonStore::new(dir.path()).await.unwrap();

        let user = UserId::new();
        let reading = ReadingId::new();
        let mut record = CompletionRecord::completed(user, reading, Utc::now());
        store.insert_completion(&record).await.unwrap();

        record.toggle(Utc::now());
        store.update_completion(&record).await.unwrap();

        let found = store.find_completion(user, reading).await.unwrap().unwrap();
        assert_eq!(found.state, CompletionState::Pending);
        assert_eq!(store.list_completions(Some(user)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_missing_record_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonStore::new(dir.path()).await.unwrap();

        let record = CompletionRecord::completed(UserId::new(), ReadingId::new(), Utc::now());
        let err = store.update_completion(&record).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_completions_filters_by_user() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonStore::new(dir.path()).await.unwrap();

        let alice = UserId::new();
        let bob = UserId::new();
        for user in [alice, alice, bob] {
            let record = CompletionRecord::completed(user, ReadingId::new(), Utc::now());
            store.insert_completion(&record).await.unwrap();
        }

        assert_eq!(store.list_completions(Some(alice)).await.unwrap().len(), 2);
        assert_eq!(store.list_completions(Some(bob)).await.unwrap().len(), 1);
        assert_eq!(store.list_completions(None).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_announcements_active_only_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonStore::new(dir.path()).await.unwrap();

        let older = Announcement::new("Kickoff", "We start Monday", Utc::now());
        let mut retired = Announcement::new("Old schedule", "Ignore", Utc::now());
        retired.is_active = false;
        let newer = Announcement::new("Week 2", "Keep going", Utc::now());

        store.save_announcement(&older).await.unwrap();
        store.save_announcement(&retired).await.unwrap();
        store.save_announcement(&newer).await.unwrap();

        let listed = store.list_announcements().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, newer.id);
        assert_eq!(listed[1].id, older.id);
    }
}
