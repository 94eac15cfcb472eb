//! Notification domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::post::PostId;
use super::user::UserSummary;

/// Identifier of a notification.
pub type NotificationId = u64;

/// What triggered a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Like,
    Comment,
    Follow,
}

/// A notification addressed to the authenticated user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub sender: UserSummary,
    pub message: String,
    pub is_read: bool,
    pub related_post: Option<PostId>,
    pub post_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Number of unread notifications in a list.
pub fn unread_count(notifications: &[Notification]) -> usize {
    notifications.iter().filter(|n| !n.is_read).count()
}
