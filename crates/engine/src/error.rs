//! Engine error taxonomy.

use lectio_core::ReadingId;
use lectio_storage::StoreError;

/// Errors surfaced by the progress engine and toggle controller.
///
/// None of these are fatal; every one is recoverable by re-fetching or
/// retrying the specific operation. The engine itself never retries -
/// retry policy belongs to the caller.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A required record set could not be fetched; nothing was computed
    /// from the partial data.
    #[error("input unavailable: {0}")]
    InputUnavailable(StoreError),

    /// A mutation was rejected; prior state is untouched.
    #[error("write failed: {0}")]
    WriteFailed(StoreError),

    /// The reading id is not part of the plan calendar.
    #[error("unknown reading: {0}")]
    UnknownReading(ReadingId),

    /// The session probe could not answer.
    #[error("session probe failed: {0}")]
    Session(String),
}

impl EngineError {
    pub(crate) fn input(source: StoreError) -> Self {
        EngineError::InputUnavailable(source)
    }

    pub(crate) fn write(source: StoreError) -> Self {
        EngineError::WriteFailed(source)
    }
}
