//! Session identity probe.

use async_trait::async_trait;
use lectio_core::Identity;

use crate::error::EngineError;

/// Answers "who is signed in right now?".
///
/// Opaque to the engine: how credentials were exchanged is the host's
/// concern. `None` means nobody is signed in and is a normal answer, not
/// an error.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// The current signed-in identity, if any.
    async fn current(&self) -> Result<Option<Identity>, EngineError>;
}
