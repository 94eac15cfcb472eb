//! The resource-fetching port.
//!
//! Every component issues its requests through [`SocialApi`]. Implementations
//! attach the session credential themselves; callers never pass tokens.

use async_trait::async_trait;

use crate::auth::{AuthGrant, Credentials, Registration};
use crate::error::Result;
use crate::media::ImageUpload;
use crate::model::{
    Comment, FeedMode, Notification, NotificationId, Post, PostId, Story, UserId, UserSummary,
};

/// Whose profile collections to address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileTarget {
    /// The authenticated user
    Own,
    User(UserId),
}

impl ProfileTarget {
    /// Path suffix appended to profile-scoped collections (`""` or `"{id}/"`).
    pub fn path_suffix(&self) -> String {
        match self {
            ProfileTarget::Own => String::new(),
            ProfileTarget::User(id) => format!("{}/", id),
        }
    }
}

/// Server operations consumed by the synchronization layer.
#[async_trait]
pub trait SocialApi: Send + Sync {
    /// `POST /auth/login/` (anonymous)
    async fn login(&self, credentials: &Credentials) -> Result<AuthGrant>;

    /// `POST /auth/register/` (anonymous)
    async fn register(&self, registration: &Registration) -> Result<AuthGrant>;

    /// `GET /profile/` or `/profile/{id}/`
    async fn fetch_profile(&self, target: ProfileTarget) -> Result<UserSummary>;

    /// `GET /feed/` (following) or `GET /posts/` (explore)
    async fn fetch_feed(&self, mode: FeedMode) -> Result<Vec<Post>>;

    /// `POST /posts/{id}/like/`, toggles the like
    async fn toggle_like(&self, post_id: PostId) -> Result<()>;

    /// `POST /posts/{id}/comments/`
    async fn add_comment(&self, post_id: PostId, text: &str) -> Result<Comment>;

    /// `POST /follow/{id}/`
    async fn follow(&self, user_id: UserId) -> Result<()>;

    /// `DELETE /unfollow/{id}/`
    async fn unfollow(&self, user_id: UserId) -> Result<()>;

    /// `GET /notifications/`, in server order
    async fn fetch_notifications(&self) -> Result<Vec<Notification>>;

    /// `POST /notifications/{id}/read/`
    async fn mark_notification_read(&self, id: NotificationId) -> Result<()>;

    /// `POST /notifications/read-all/`
    async fn mark_all_notifications_read(&self) -> Result<()>;

    /// `GET /users/search/?q=`
    async fn search_users(&self, query: &str) -> Result<Vec<UserSummary>>;

    /// `GET /stories/`
    async fn fetch_stories(&self) -> Result<Vec<Story>>;

    /// `POST /stories/` multipart (`image`, `text`)
    async fn create_story(&self, image: &ImageUpload, text: &str) -> Result<()>;

    /// `POST /posts/` multipart (`image`, `caption`)
    async fn create_post(&self, image: &ImageUpload, caption: &str) -> Result<()>;

    /// `GET /posts/my/` or `/posts/user/{id}/`
    async fn fetch_user_posts(&self, target: ProfileTarget) -> Result<Vec<Post>>;

    /// `GET /followers/` or `/followers/{id}/`
    async fn fetch_followers(&self, target: ProfileTarget) -> Result<Vec<UserSummary>>;

    /// `GET /following/` or `/following/{id}/`
    async fn fetch_following(&self, target: ProfileTarget) -> Result<Vec<UserSummary>>;

    /// `PATCH /profile/picture/` multipart (`bio`, optional `profile_picture`)
    async fn update_profile(&self, bio: &str, picture: Option<&ImageUpload>) -> Result<()>;
}
