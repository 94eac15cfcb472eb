//! Loading image uploads from the local file system.

use snapline_core::error::{Result, SnaplineError};
use snapline_core::media::ImageUpload;
use std::fs;
use std::path::Path;

/// Reads `path` into an [`ImageUpload`], guessing the MIME type from the
/// extension. Size and type limits are checked by the caller's use case.
pub fn load_image(path: &Path) -> Result<ImageUpload> {
    let bytes = fs::read(path)?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| SnaplineError::invalid_input(format!("Not a file: {}", path.display())))?
        .to_string();
    let content_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();

    tracing::debug!(
        "[MediaFile] Loaded {} ({} bytes, {})",
        file_name,
        bytes.len(),
        content_type
    );

    Ok(ImageUpload::new(file_name, content_type, bytes))
}
