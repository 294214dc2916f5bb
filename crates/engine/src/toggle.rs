//! Completion toggle controller.

use std::sync::Arc;

use chrono::Utc;
use lectio_core::{CompletionRecord, ReadingId, UserId};
use lectio_storage::{Store, StoreError};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::EngineError;

/// Flips a user's completion state for one reading.
///
/// Each (user, reading) pair is a two-state machine, `Pending ⇄ Completed`,
/// starting at `Pending` (no record). The controller enforces at most one
/// record per pair by updating the existing record instead of inserting a
/// duplicate. It holds no derived state; after a successful toggle the
/// caller re-derives snapshots from a fresh read.
pub struct ToggleController<S: Store> {
    storage: Arc<Mutex<S>>,
}

impl<S: Store> ToggleController<S> {
    /// Create a controller over a shared store handle.
    pub fn new(storage: Arc<Mutex<S>>) -> Self {
        Self { storage }
    }

    /// Flip the completion state for `(user_id, reading_id)`.
    ///
    /// No existing record: one is created in the completed state. An
    /// existing record is flipped in place. A failed write leaves prior
    /// state untouched, and the controller performs no retries.
    pub async fn toggle(
        &self,
        user_id: UserId,
        reading_id: ReadingId,
    ) -> Result<CompletionRecord, EngineError> {
        let mut storage = self.storage.lock().await;
        let now = Utc::now();

        let existing = storage
            .find_completion(user_id, reading_id)
            .await
            .map_err(EngineError::input)?;

        if let Some(mut record) = existing {
            record.toggle(now);
            storage
                .update_completion(&record)
                .await
                .map_err(EngineError::write)?;
            info!(user = %user_id, reading = %reading_id, completed = record.state.is_completed(), "toggled completion");
            return Ok(record);
        }

        let record = CompletionRecord::completed(user_id, reading_id, now);
        match storage.insert_completion(&record).await {
            Ok(()) => {
                info!(user = %user_id, reading = %reading_id, "first completion recorded");
                Ok(record)
            }
            Err(StoreError::DuplicateRecord { .. }) => {
                // Another writer created the pair's record between our read
                // and the insert. Fall back to updating it; the conflict is
                // never surfaced to the user.
                debug!(user = %user_id, reading = %reading_id, "insert lost race, updating existing record");
                let mut record = storage
                    .find_completion(user_id, reading_id)
                    .await
                    .map_err(EngineError::input)?
                    .ok_or_else(|| {
                        EngineError::WriteFailed(StoreError::NotFound(format!(
                            "completion record for reading {}",
                            reading_id
                        )))
                    })?;
                record.toggle(now);
                storage
                    .update_completion(&record)
                    .await
                    .map_err(EngineError::write)?;
                Ok(record)
            }
            Err(e) => Err(EngineError::write(e)),
        }
    }
}
