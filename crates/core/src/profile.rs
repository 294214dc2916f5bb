//! User profiles and session identity.

use serde::{Deserialize, Serialize};

use crate::id::UserId;
use crate::Time;

/// A member of the reading group.
///
/// Identity only: progress counters are derived from completion records on
/// every read, never stored here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Unique identifier
    pub id: UserId,

    /// Display name
    pub name: String,

    /// When the user joined the plan
    pub joined_at: Time,
}

impl UserProfile {
    /// Create a new profile.
    pub fn new(name: impl Into<String>, joined_at: Time) -> Self {
        Self {
            id: UserId::new(),
            name: name.into(),
            joined_at,
        }
    }
}

/// The signed-in identity reported by the session probe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    /// The signed-in user
    pub user_id: UserId,

    /// Display name
    pub name: String,
}
