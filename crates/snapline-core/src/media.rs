//! Image uploads and their client-side validation.

use crate::error::{Result, SnaplineError};

/// Upper bound for post and story images.
pub const MAX_POST_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Upper bound for profile pictures.
pub const MAX_PROFILE_PICTURE_BYTES: usize = 5 * 1024 * 1024;

/// An image file ready to be sent as a multipart part.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    /// MIME type, e.g. `image/jpeg`
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Rejects non-image content and files above `max_bytes`.
    pub fn validate(&self, max_bytes: usize) -> Result<()> {
        if !self.content_type.starts_with("image/") {
            return Err(SnaplineError::invalid_input("Please select an image file"));
        }
        if self.bytes.len() > max_bytes {
            return Err(SnaplineError::invalid_input(format!(
                "File size must be less than {}MB",
                max_bytes / (1024 * 1024)
            )));
        }
        Ok(())
    }
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}
