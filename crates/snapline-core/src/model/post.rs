//! Post and Comment domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::UserSummary;

/// Identifier of a post.
pub type PostId = u64;

/// Identifier of a comment.
pub type CommentId = u64;

/// A published photo with its engagement counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub user: UserSummary,
    pub image_url: String,
    pub caption: Option<String>,
    pub likes_count: u64,
    pub is_liked: bool,
    pub comments_count: u64,
    /// Most recent comments, as truncated by the server
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
}

/// A comment on a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub user: UserSummary,
    pub text: String,
    pub created_at: DateTime<Utc>,
}
