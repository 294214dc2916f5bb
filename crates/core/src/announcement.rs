//! Group announcements shown alongside the plan.

use serde::{Deserialize, Serialize};

use crate::id::AnnouncementId;
use crate::Time;

/// An announcement posted to the reading group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Announcement {
    /// Unique identifier
    pub id: AnnouncementId,

    /// Headline
    pub title: String,

    /// Body text
    pub content: String,

    /// Inactive announcements are hidden from listings
    pub is_active: bool,

    /// When the announcement was posted
    pub created_at: Time,
}

impl Announcement {
    /// Create a new active announcement.
    pub fn new(title: impl Into<String>, content: impl Into<String>, created_at: Time) -> Self {
        Self {
            id: AnnouncementId::new(),
            title: title.into(),
            content: content.into(),
            is_active: true,
            created_at,
        }
    }
}
