//! HttpSocialApi - the `reqwest` implementation of [`SocialApi`].

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use snapline_core::api::{ProfileTarget, SocialApi};
use snapline_core::auth::{AuthGrant, Credentials, Registration};
use snapline_core::config::ClientConfig;
use snapline_core::credential::CredentialHandle;
use snapline_core::error::{Result, SnaplineError};
use snapline_core::media::ImageUpload;
use snapline_core::model::{
    Comment, FeedMode, Notification, NotificationId, Post, PostId, Story, UserId, UserSummary,
};
use std::time::Duration;

use crate::dto::{
    AuthResponseDto, CommentDto, CommentRequest, NotificationDto, PostDto, StoryDto, UserDto,
};
use crate::response::classify_failure;

/// Talks to the Snapline REST API.
///
/// The bearer token is read from the shared [`CredentialHandle`] each time a
/// request is built, so login and logout take effect for the next request
/// without rebuilding the client.
#[derive(Clone)]
pub struct HttpSocialApi {
    client: Client,
    api_root: String,
    credential: CredentialHandle,
    timeout: Option<Duration>,
}

impl HttpSocialApi {
    pub fn new(config: &ClientConfig, credential: CredentialHandle) -> Self {
        Self {
            client: Client::new(),
            api_root: config.api_root.trim_end_matches('/').to_string(),
            credential,
            timeout: config.request_timeout(),
        }
    }

    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_root, path.trim_start_matches('/'))
    }

    /// Attaches the session credential (if any) and the configured timeout.
    fn auth_request(&self, request: RequestBuilder) -> RequestBuilder {
        let request = match self.timeout {
            Some(timeout) => request.timeout(timeout),
            None => request,
        };
        if let Some(token) = self.credential.bearer() {
            request.bearer_auth(token)
        } else {
            request
        }
    }

    /// Sends the request and turns any non-2xx status into a classified error.
    async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                SnaplineError::network(format!("Request timed out: {}", e))
            } else {
                SnaplineError::network(e.to_string())
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = classify_failure(status.as_u16(), &body);
        tracing::debug!(target: "http", "[HttpSocialApi] {} -> {}", status, err);
        Err(err)
    }

    async fn execute_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.execute(request).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| SnaplineError::network(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| SnaplineError::decode(e.to_string()))
    }

    async fn execute_empty(&self, request: RequestBuilder) -> Result<()> {
        self.execute(request).await.map(|_| ())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        tracing::debug!(target: "http", "[HttpSocialApi] GET {}", path);
        self.execute_json(self.auth_request(self.client.get(self.url(path))))
            .await
    }

    async fn get_users(&self, path: &str) -> Result<Vec<UserSummary>> {
        let users: Vec<UserDto> = self.get_json(path).await?;
        Ok(users.into_iter().map(UserSummary::from).collect())
    }

    async fn get_posts(&self, path: &str) -> Result<Vec<Post>> {
        let posts: Vec<PostDto> = self.get_json(path).await?;
        Ok(posts.into_iter().map(Post::from).collect())
    }

    async fn post_empty(&self, path: &str) -> Result<()> {
        tracing::debug!(target: "http", "[HttpSocialApi] POST {}", path);
        self.execute_empty(self.auth_request(self.client.post(self.url(path))))
            .await
    }

    async fn post_multipart(&self, path: &str, form: Form) -> Result<()> {
        tracing::debug!(target: "http", "[HttpSocialApi] POST {} (multipart)", path);
        self.execute_empty(
            self.auth_request(self.client.post(self.url(path)))
                .multipart(form),
        )
        .await
    }
}

fn image_part(image: &ImageUpload) -> Result<Part> {
    Part::bytes(image.bytes.clone())
        .file_name(image.file_name.clone())
        .mime_str(&image.content_type)
        .map_err(|e| SnaplineError::invalid_input(format!("Invalid image type: {}", e)))
}

#[async_trait]
impl SocialApi for HttpSocialApi {
    async fn login(&self, credentials: &Credentials) -> Result<AuthGrant> {
        tracing::debug!(target: "http", "[HttpSocialApi] POST auth/login/");
        let dto: AuthResponseDto = self
            .execute_json(self.client.post(self.url("auth/login/")).json(credentials))
            .await?;
        Ok(dto.into())
    }

    async fn register(&self, registration: &Registration) -> Result<AuthGrant> {
        tracing::debug!(target: "http", "[HttpSocialApi] POST auth/register/");
        let dto: AuthResponseDto = self
            .execute_json(
                self.client
                    .post(self.url("auth/register/"))
                    .json(registration),
            )
            .await?;
        Ok(dto.into())
    }

    async fn fetch_profile(&self, target: ProfileTarget) -> Result<UserSummary> {
        let dto: UserDto = self
            .get_json(&format!("profile/{}", target.path_suffix()))
            .await?;
        Ok(dto.into())
    }

    async fn fetch_feed(&self, mode: FeedMode) -> Result<Vec<Post>> {
        let path = match mode {
            FeedMode::Following => "feed/",
            FeedMode::Explore => "posts/",
        };
        self.get_posts(path).await
    }

    async fn toggle_like(&self, post_id: PostId) -> Result<()> {
        self.post_empty(&format!("posts/{}/like/", post_id)).await
    }

    async fn add_comment(&self, post_id: PostId, text: &str) -> Result<Comment> {
        let path = format!("posts/{}/comments/", post_id);
        tracing::debug!(target: "http", "[HttpSocialApi] POST {}", path);
        let dto: CommentDto = self
            .execute_json(
                self.auth_request(self.client.post(self.url(&path)))
                    .json(&CommentRequest { text }),
            )
            .await?;
        Ok(dto.into())
    }

    async fn follow(&self, user_id: UserId) -> Result<()> {
        self.post_empty(&format!("follow/{}/", user_id)).await
    }

    async fn unfollow(&self, user_id: UserId) -> Result<()> {
        let path = format!("unfollow/{}/", user_id);
        tracing::debug!(target: "http", "[HttpSocialApi] DELETE {}", path);
        self.execute_empty(self.auth_request(self.client.delete(self.url(&path))))
            .await
    }

    async fn fetch_notifications(&self) -> Result<Vec<Notification>> {
        let items: Vec<NotificationDto> = self.get_json("notifications/").await?;
        Ok(items.into_iter().map(Notification::from).collect())
    }

    async fn mark_notification_read(&self, id: NotificationId) -> Result<()> {
        self.post_empty(&format!("notifications/{}/read/", id))
            .await
    }

    async fn mark_all_notifications_read(&self) -> Result<()> {
        self.post_empty("notifications/read-all/").await
    }

    async fn search_users(&self, query: &str) -> Result<Vec<UserSummary>> {
        tracing::debug!(target: "http", "[HttpSocialApi] GET users/search/ q={:?}", query);
        let users: Vec<UserDto> = self
            .execute_json(
                self.auth_request(self.client.get(self.url("users/search/")))
                    .query(&[("q", query)]),
            )
            .await?;
        Ok(users.into_iter().map(UserSummary::from).collect())
    }

    async fn fetch_stories(&self) -> Result<Vec<Story>> {
        let stories: Vec<StoryDto> = self.get_json("stories/").await?;
        Ok(stories.into_iter().map(Story::from).collect())
    }

    async fn create_story(&self, image: &ImageUpload, text: &str) -> Result<()> {
        let form = Form::new()
            .part("image", image_part(image)?)
            .text("text", text.to_string());
        self.post_multipart("stories/", form).await
    }

    async fn create_post(&self, image: &ImageUpload, caption: &str) -> Result<()> {
        let form = Form::new()
            .part("image", image_part(image)?)
            .text("caption", caption.to_string());
        self.post_multipart("posts/", form).await
    }

    async fn fetch_user_posts(&self, target: ProfileTarget) -> Result<Vec<Post>> {
        match target {
            ProfileTarget::Own => self.get_posts("posts/my/").await,
            ProfileTarget::User(id) => self.get_posts(&format!("posts/user/{}/", id)).await,
        }
    }

    async fn fetch_followers(&self, target: ProfileTarget) -> Result<Vec<UserSummary>> {
        self.get_users(&format!("followers/{}", target.path_suffix()))
            .await
    }

    async fn fetch_following(&self, target: ProfileTarget) -> Result<Vec<UserSummary>> {
        self.get_users(&format!("following/{}", target.path_suffix()))
            .await
    }

    async fn update_profile(&self, bio: &str, picture: Option<&ImageUpload>) -> Result<()> {
        let mut form = Form::new().text("bio", bio.to_string());
        if let Some(picture) = picture {
            form = form.part("profile_picture", image_part(picture)?);
        }
        tracing::debug!(target: "http", "[HttpSocialApi] PATCH profile/picture/ (multipart)");
        self.execute_empty(
            self.auth_request(self.client.patch(self.url("profile/picture/")))
                .multipart(form),
        )
        .await
    }
}
