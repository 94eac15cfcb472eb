//! Domain models.
//!
//! # Module Structure
//!
//! - `user`: `UserSummary`
//! - `post`: `Post`, `Comment`
//! - `notification`: `Notification`, `NotificationKind`
//! - `story`: `Story` and its expiry rule
//! - `feed`: `FeedMode`, `FeedView`
//! - `session`: `Session`, `SessionStatus`

mod feed;
mod notification;
mod post;
mod session;
mod story;
mod user;

pub use feed::{EmptyFeed, FeedMode, FeedView};
pub use notification::{Notification, NotificationId, NotificationKind, unread_count};
pub use post::{Comment, CommentId, Post, PostId};
pub use session::{Session, SessionStatus};
pub use story::{STORY_LIFETIME_HOURS, Story, StoryId};
pub use user::{UserId, UserSummary};
