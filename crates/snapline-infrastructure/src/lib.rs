pub mod config_service;
pub mod media_file;
pub mod paths;
pub mod token_store;

pub use crate::config_service::ConfigService;
pub use crate::media_file::load_image;
pub use crate::paths::SnaplinePaths;
pub use crate::token_store::{FileTokenStore, InMemoryTokenStore};
