//! StoryTray - the list of stories shown above the feed.

use chrono::{DateTime, Utc};
use snapline_core::api::SocialApi;
use snapline_core::error::Result;
use snapline_core::model::Story;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::session_store::SessionStore;

#[derive(Default)]
struct TrayState {
    stories: Vec<Story>,
    latest_ticket: u64,
}

pub struct StoryTray {
    api: Arc<dyn SocialApi>,
    session: Arc<SessionStore>,
    state: Mutex<TrayState>,
}

impl StoryTray {
    pub fn new(api: Arc<dyn SocialApi>, session: Arc<SessionStore>) -> Self {
        Self {
            api,
            session,
            state: Mutex::new(TrayState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, TrayState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn stories(&self) -> Vec<Story> {
        self.lock().stories.clone()
    }

    /// Replaces the list with the server's. Only the latest issued load is
    /// applied; a failure keeps the previous list.
    pub async fn load(&self) -> Result<()> {
        self.session.require_authenticated()?;
        let ticket = {
            let mut state = self.lock();
            state.latest_ticket += 1;
            state.latest_ticket
        };

        let stories = self
            .session
            .observe(self.api.fetch_stories().await)
            .inspect_err(|e| {
                tracing::warn!(target: "stories", "[StoryTray] Failed to load stories: {}", e);
            })?;

        let mut state = self.lock();
        if state.latest_ticket == ticket {
            tracing::debug!(target: "stories", "[StoryTray] Loaded {} stories", stories.len());
            state.stories = stories;
        }
        Ok(())
    }

    /// Stories younger than their lifetime at `now`.
    pub fn active(&self, now: DateTime<Utc>) -> Vec<Story> {
        self.lock()
            .stories
            .iter()
            .filter(|story| !story.is_expired(now))
            .cloned()
            .collect()
    }

    /// Stories past their lifetime at `now`. They are not removed.
    pub fn expired(&self, now: DateTime<Utc>) -> Vec<Story> {
        self.lock()
            .stories
            .iter()
            .filter(|story| story.is_expired(now))
            .cloned()
            .collect()
    }
}
