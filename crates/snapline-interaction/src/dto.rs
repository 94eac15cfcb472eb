//! Wire DTOs for the server's JSON and their conversion into domain models.
//!
//! The server nests picture and bio under `profile`, exposes post images as
//! `image_display_url` (falling back to `image_url`) and names the
//! notification kind `notification_type`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use snapline_core::auth::AuthGrant;
use snapline_core::model::{Comment, Notification, NotificationKind, Post, Story, UserSummary};

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProfileDto {
    #[serde(default)]
    pub profile_picture_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserDto {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub followers_count: u64,
    #[serde(default)]
    pub following_count: u64,
    #[serde(default)]
    pub posts_count: u64,
    #[serde(default)]
    pub is_following: bool,
    #[serde(default)]
    pub profile: Option<ProfileDto>,
}

impl From<UserDto> for UserSummary {
    fn from(dto: UserDto) -> Self {
        let profile = dto.profile.unwrap_or_default();
        UserSummary {
            id: dto.id,
            username: dto.username,
            first_name: dto.first_name,
            last_name: dto.last_name,
            email: non_empty(dto.email),
            profile_picture_url: non_empty(profile.profile_picture_url),
            bio: non_empty(profile.bio),
            is_following: dto.is_following,
            posts_count: dto.posts_count,
            followers_count: dto.followers_count,
            following_count: dto.following_count,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentDto {
    pub id: u64,
    pub text: String,
    pub user: UserDto,
    pub created_at: DateTime<Utc>,
}

impl From<CommentDto> for Comment {
    fn from(dto: CommentDto) -> Self {
        Comment {
            id: dto.id,
            user: dto.user.into(),
            text: dto.text,
            created_at: dto.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostDto {
    pub id: u64,
    pub user: UserDto,
    #[serde(default)]
    pub image_display_url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub likes_count: u64,
    #[serde(default)]
    pub comments_count: u64,
    #[serde(default)]
    pub comments: Vec<CommentDto>,
    #[serde(default)]
    pub is_liked: bool,
    pub created_at: DateTime<Utc>,
}

impl From<PostDto> for Post {
    fn from(dto: PostDto) -> Self {
        Post {
            id: dto.id,
            user: dto.user.into(),
            image_url: non_empty(dto.image_display_url)
                .or_else(|| non_empty(dto.image_url))
                .unwrap_or_default(),
            caption: non_empty(dto.caption),
            likes_count: dto.likes_count,
            is_liked: dto.is_liked,
            comments_count: dto.comments_count,
            comments: dto.comments.into_iter().map(Comment::from).collect(),
            created_at: dto.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoryDto {
    pub id: u64,
    pub user: UserDto,
    #[serde(default)]
    pub image_display_url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<StoryDto> for Story {
    fn from(dto: StoryDto) -> Self {
        Story {
            id: dto.id,
            user: dto.user.into(),
            image_url: non_empty(dto.image_display_url)
                .or_else(|| non_empty(dto.image_url))
                .unwrap_or_default(),
            text: non_empty(dto.text),
            created_at: dto.created_at,
            expires_at: dto.expires_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationDto {
    pub id: u64,
    pub sender: UserDto,
    pub notification_type: NotificationKind,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub post: Option<u64>,
    #[serde(default)]
    pub post_image: Option<String>,
    #[serde(default)]
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<NotificationDto> for Notification {
    fn from(dto: NotificationDto) -> Self {
        Notification {
            id: dto.id,
            kind: dto.notification_type,
            sender: dto.sender.into(),
            message: dto.message,
            is_read: dto.is_read,
            related_post: dto.post,
            post_image_url: non_empty(dto.post_image),
            created_at: dto.created_at,
        }
    }
}

/// Login/registration response body.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponseDto {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
    pub user: UserDto,
}

impl From<AuthResponseDto> for AuthGrant {
    fn from(dto: AuthResponseDto) -> Self {
        AuthGrant {
            access: dto.access,
            refresh: dto.refresh,
            user: dto.user.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CommentRequest<'a> {
    pub text: &'a str,
}
