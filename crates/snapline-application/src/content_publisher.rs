//! ContentPublisher - creates posts and stories from image uploads.

use snapline_core::api::SocialApi;
use snapline_core::error::{Result, SnaplineError};
use snapline_core::media::{ImageUpload, MAX_POST_IMAGE_BYTES};
use std::sync::Arc;

use crate::session_store::SessionStore;

pub const CREATE_POST_FAILED: &str = "Failed to create post";
pub const CREATE_STORY_FAILED: &str = "Failed to create story";
const NO_IMAGE: &str = "Please select an image file";

pub struct ContentPublisher {
    api: Arc<dyn SocialApi>,
    session: Arc<SessionStore>,
}

impl ContentPublisher {
    pub fn new(api: Arc<dyn SocialApi>, session: Arc<SessionStore>) -> Self {
        Self { api, session }
    }

    fn checked(&self, image: Option<ImageUpload>) -> Result<ImageUpload> {
        self.session.require_authenticated()?;
        let image = image.ok_or_else(|| SnaplineError::invalid_input(NO_IMAGE))?;
        image.validate(MAX_POST_IMAGE_BYTES)?;
        Ok(image)
    }

    /// Publishes a post. Display the error with
    /// `user_message(CREATE_POST_FAILED)`.
    pub async fn create_post(&self, image: Option<ImageUpload>, caption: &str) -> Result<()> {
        let image = self.checked(image)?;
        self.session
            .observe(self.api.create_post(&image, caption).await)
            .inspect_err(|e| {
                tracing::warn!(target: "publisher", "[ContentPublisher] Post creation failed: {}", e);
            })?;
        tracing::info!(target: "publisher", "[ContentPublisher] Post created ({} bytes)", image.len());
        Ok(())
    }

    pub async fn create_story(&self, image: Option<ImageUpload>, text: &str) -> Result<()> {
        let image = self.checked(image)?;
        self.session
            .observe(self.api.create_story(&image, text).await)
            .inspect_err(|e| {
                tracing::warn!(target: "publisher", "[ContentPublisher] Story creation failed: {}", e);
            })?;
        tracing::info!(target: "publisher", "[ContentPublisher] Story created ({} bytes)", image.len());
        Ok(())
    }
}
