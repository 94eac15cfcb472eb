//! Story domain model.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::user::UserSummary;

/// Identifier of a story.
pub type StoryId = u64;

/// Stories are shown for this long after creation.
pub const STORY_LIFETIME_HOURS: i64 = 24;

/// An ephemeral photo story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub id: StoryId,
    pub user: UserSummary,
    pub image_url: String,
    pub text: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Expiry reported by the server, when it sends one
    pub expires_at: Option<DateTime<Utc>>,
}

impl Story {
    /// Whether the story should be presented as expired at `now`.
    ///
    /// The server-provided expiry wins; otherwise the story expires
    /// [`STORY_LIFETIME_HOURS`] after creation. Expired stories are never
    /// removed by the client.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        let expires_at = self
            .expires_at
            .unwrap_or_else(|| self.created_at + Duration::hours(STORY_LIFETIME_HOURS));
        now >= expires_at
    }
}
