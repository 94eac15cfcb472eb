//! FeedController - the post list of the following/explore feed.
//!
//! Every load takes a ticket; only the response of the most recently issued
//! load is applied. Mutations never patch the local list, they refetch it.

use snapline_core::api::SocialApi;
use snapline_core::error::{Result, SnaplineError};
use snapline_core::model::{Comment, FeedMode, FeedView, Post, PostId, UserId};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::session_store::SessionStore;

const LOAD_FAILED: &str = "Failed to load feed";

/// Result of a load that completed without error.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The response was the latest and replaced the list
    Applied(Vec<Post>),
    /// A newer load was issued meanwhile; the response was dropped
    Superseded,
}

#[derive(Default)]
struct FeedState {
    mode: FeedMode,
    items: Vec<Post>,
    loading: bool,
    loaded: bool,
    last_error: Option<SnaplineError>,
    latest_ticket: u64,
}

pub struct FeedController {
    api: Arc<dyn SocialApi>,
    session: Arc<SessionStore>,
    state: Mutex<FeedState>,
}

impl FeedController {
    pub fn new(api: Arc<dyn SocialApi>, session: Arc<SessionStore>) -> Self {
        Self {
            api,
            session,
            state: Mutex::new(FeedState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FeedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn mode(&self) -> FeedMode {
        self.lock().mode
    }

    /// What should be displayed right now.
    pub fn view(&self) -> FeedView {
        let state = self.lock();
        FeedView {
            mode: state.mode,
            items: state.items.clone(),
            loading: state.loading,
            loaded: state.loaded,
            last_error: state
                .last_error
                .as_ref()
                .map(|e| e.user_message(LOAD_FAILED)),
        }
    }

    /// Fetches the collection for `mode` and replaces the list.
    ///
    /// Switching mode clears the displayed items before the request goes
    /// out. A failed load keeps the previous items and records the error.
    pub async fn load(&self, mode: FeedMode) -> Result<LoadOutcome> {
        self.session.require_authenticated()?;

        let ticket = {
            let mut state = self.lock();
            if state.mode != mode {
                state.mode = mode;
                state.items.clear();
                state.loaded = false;
                state.last_error = None;
            }
            state.loading = true;
            state.latest_ticket += 1;
            state.latest_ticket
        };
        tracing::debug!(target: "feed", "[FeedController] Loading {:?} (ticket {})", mode, ticket);

        let result = self.session.observe(self.api.fetch_feed(mode).await);

        let mut state = self.lock();
        if state.latest_ticket != ticket {
            tracing::debug!(target: "feed", "[FeedController] Dropping superseded response (ticket {})", ticket);
            return Ok(LoadOutcome::Superseded);
        }
        state.loading = false;

        match result {
            Ok(posts) => {
                tracing::debug!(target: "feed", "[FeedController] Loaded {} posts", posts.len());
                state.items = posts.clone();
                state.loaded = true;
                state.last_error = None;
                Ok(LoadOutcome::Applied(posts))
            }
            Err(e) => {
                tracing::warn!(target: "feed", "[FeedController] Load failed: {}", e);
                state.last_error = Some(e.clone());
                Err(e)
            }
        }
    }

    /// Reloads the current mode.
    pub async fn reload(&self) -> Result<LoadOutcome> {
        let mode = self.mode();
        self.load(mode).await
    }

    /// Toggles the like on a post, then reloads. A failed toggle is logged
    /// and the reload still happens.
    pub async fn like(&self, post_id: PostId) -> Result<LoadOutcome> {
        self.session.require_authenticated()?;
        if let Err(e) = self.session.observe(self.api.toggle_like(post_id).await) {
            tracing::warn!(target: "feed", "[FeedController] Like on post {} failed: {}", post_id, e);
        }
        self.reload().await
    }

    pub async fn follow(&self, user_id: UserId) -> Result<LoadOutcome> {
        self.session.require_authenticated()?;
        if let Err(e) = self.session.observe(self.api.follow(user_id).await) {
            tracing::warn!(target: "feed", "[FeedController] Follow of user {} failed: {}", user_id, e);
        }
        self.reload().await
    }

    pub async fn unfollow(&self, user_id: UserId) -> Result<LoadOutcome> {
        self.session.require_authenticated()?;
        if let Err(e) = self.session.observe(self.api.unfollow(user_id).await) {
            tracing::warn!(target: "feed", "[FeedController] Unfollow of user {} failed: {}", user_id, e);
        }
        self.reload().await
    }

    /// Adds a comment. Unlike the other mutations, a failure is returned to
    /// the caller and no reload happens.
    pub async fn comment(&self, post_id: PostId, text: &str) -> Result<Comment> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SnaplineError::invalid_input("Comment cannot be empty"));
        }
        self.session.require_authenticated()?;

        let comment = self
            .session
            .observe(self.api.add_comment(post_id, text).await)?;
        tracing::debug!(target: "feed", "[FeedController] Comment {} added to post {}", comment.id, post_id);

        if let Err(e) = self.reload().await {
            tracing::debug!(target: "feed", "[FeedController] Reload after comment failed: {}", e);
        }
        Ok(comment)
    }
}
