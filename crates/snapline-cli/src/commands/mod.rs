pub mod auth;
pub mod feed;
pub mod notifications;
pub mod profile;
pub mod publish;
pub mod render;
pub mod search;

use anyhow::{Result, anyhow};
use snapline_application::SessionStore;
use snapline_core::api::SocialApi;
use snapline_core::config::ClientConfig;
use snapline_core::credential::CredentialHandle;
use snapline_core::model::UserSummary;
use snapline_infrastructure::{ConfigService, FileTokenStore};
use snapline_interaction::HttpSocialApi;
use std::path::Path;
use std::sync::Arc;

/// Wiring shared by every command: configuration, the HTTP client and the
/// restored session.
pub struct App {
    pub config: ClientConfig,
    pub api: Arc<dyn SocialApi>,
    pub session: Arc<SessionStore>,
}

impl App {
    pub async fn bootstrap(config_dir: Option<&Path>, api_root: Option<String>) -> Result<Self> {
        let mut config = ConfigService::new(config_dir)?.load()?;
        if let Some(api_root) = api_root {
            config.api_root = api_root;
        }
        tracing::debug!("[App] Using API root {}", config.api_root);

        let credential = CredentialHandle::new();
        let api: Arc<dyn SocialApi> = Arc::new(HttpSocialApi::new(&config, credential.clone()));
        let tokens = Arc::new(FileTokenStore::in_dir(config_dir)?);
        let session = Arc::new(SessionStore::new(api.clone(), tokens, credential));
        session.restore().await;

        Ok(Self {
            config,
            api,
            session,
        })
    }

    /// The signed-in user, or an error telling how to sign in.
    pub fn require_session(&self) -> Result<UserSummary> {
        self.session
            .current_user()
            .ok_or_else(|| anyhow!("Not logged in. Run `snapline login <username>` first."))
    }
}
