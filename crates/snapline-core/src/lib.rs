pub mod api;
pub mod auth;
pub mod config;
pub mod credential;
pub mod error;
pub mod media;
pub mod model;
pub mod token_store;

// Re-export common types
pub use api::{ProfileTarget, SocialApi};
pub use credential::CredentialHandle;
pub use error::{Result, SnaplineError};
pub use token_store::TokenStore;
