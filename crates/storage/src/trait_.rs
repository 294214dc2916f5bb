//! Storage trait abstraction.

use async_trait::async_trait;
use lectio_core::{Announcement, CompletionRecord, ReadingId, ReadingUnit, UserId, UserProfile};

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Item not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// A completion record already exists for the (user, reading) pair
    #[error("Duplicate completion record for user {user_id}, reading {reading_id}")]
    DuplicateRecord {
        /// Owning user
        user_id: UserId,
        /// Tracked reading
        reading_id: ReadingId,
    },
}

/// Storage abstraction for Lectio data.
///
/// This trait allows different storage backends to be plugged in. The
/// backend is the single enforcement point for the one-record-per
/// (user, reading) invariant: `insert_completion` must reject a second
/// record for an existing pair with [`StoreError::DuplicateRecord`].
#[async_trait]
pub trait Store: Send + Sync {
    // === Reading plan ===

    /// Append a reading to the plan calendar.
    async fn save_reading(&mut self, reading: &ReadingUnit) -> Result<()>;

    /// List the full plan calendar, date ascending.
    async fn list_readings(&self) -> Result<Vec<ReadingUnit>>;

    // === Completion records ===

    /// Insert a new completion record.
    ///
    /// Fails with [`StoreError::DuplicateRecord`] if a record for the same
    /// (user, reading) pair already exists.
    async fn insert_completion(&mut self, record: &CompletionRecord) -> Result<()>;

    /// Update an existing completion record in place.
    async fn update_completion(&mut self, record: &CompletionRecord) -> Result<()>;

    /// Look up the record for one (user, reading) pair.
    async fn find_completion(
        &self,
        user_id: UserId,
        reading_id: ReadingId,
    ) -> Result<Option<CompletionRecord>>;

    /// List completion records, optionally for a single user.
    async fn list_completions(&self, user_id: Option<UserId>) -> Result<Vec<CompletionRecord>>;

    // === Profiles ===

    /// Save a user profile (create or update).
    async fn save_profile(&mut self, profile: &UserProfile) -> Result<()>;

    /// List all user profiles.
    async fn list_profiles(&self) -> Result<Vec<UserProfile>>;

    // === Announcements ===

    /// Save an announcement.
    async fn save_announcement(&mut self, announcement: &Announcement) -> Result<()>;

    /// List active announcements, newest first.
    async fn list_announcements(&self) -> Result<Vec<Announcement>>;
}
