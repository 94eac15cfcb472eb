//! SearchDebouncer - user search with a quiet period.
//!
//! Each keystroke restarts the quiet-period timer; only when it expires is a
//! search issued. A response is applied only while the query it was issued
//! for is still the current one.

use snapline_core::api::SocialApi;
use snapline_core::config::{DEFAULT_MIN_QUERY_LEN, DEFAULT_SEARCH_DEBOUNCE_MS};
use snapline_core::error::Result;
use snapline_core::model::{UserId, UserSummary};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::sync::futures::Notified;
use tokio::task::JoinHandle;

use crate::session_store::SessionStore;

#[derive(Default)]
struct SearchState {
    query: String,
    results: Vec<UserSummary>,
    /// Quiet-period timer; detached once it fires
    pending: Option<JoinHandle<()>>,
    /// Identifies the most recent `set_query` call
    keystroke: u64,
}

impl SearchState {
    fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
        self.keystroke += 1;
    }
}

pub struct SearchDebouncer {
    api: Arc<dyn SocialApi>,
    session: Arc<SessionStore>,
    quiet_period: Duration,
    min_query_len: usize,
    state: Mutex<SearchState>,
    settled: Notify,
}

impl SearchDebouncer {
    pub fn new(api: Arc<dyn SocialApi>, session: Arc<SessionStore>) -> Self {
        Self::with_timing(
            api,
            session,
            Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS),
            DEFAULT_MIN_QUERY_LEN,
        )
    }

    pub fn with_timing(
        api: Arc<dyn SocialApi>,
        session: Arc<SessionStore>,
        quiet_period: Duration,
        min_query_len: usize,
    ) -> Self {
        Self {
            api,
            session,
            quiet_period,
            min_query_len,
            state: Mutex::new(SearchState::default()),
            settled: Notify::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SearchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn query(&self) -> String {
        self.lock().query.clone()
    }

    pub fn results(&self) -> Vec<UserSummary> {
        self.lock().results.clone()
    }

    /// True while a quiet-period timer is waiting to fire.
    pub fn is_pending(&self) -> bool {
        self.lock()
            .pending
            .as_ref()
            .is_some_and(|pending| !pending.is_finished())
    }

    /// Resolves when the next issued search has finished, whether its
    /// results were applied, dropped or failed.
    ///
    /// Create the future before calling [`set_query`](Self::set_query).
    pub fn settled(&self) -> Notified<'_> {
        self.settled.notified()
    }

    /// Records a new query.
    ///
    /// Queries shorter than the minimum clear the results without a request.
    /// Longer ones (re)start the quiet-period timer. The query is counted
    /// and sent as typed, surrounding whitespace included.
    pub fn set_query(self: &Arc<Self>, query: impl Into<String>) {
        let query = query.into();
        let mut state = self.lock();
        state.cancel_pending();
        state.query = query.clone();

        if query.chars().count() < self.min_query_len {
            state.results.clear();
            return;
        }

        let keystroke = state.keystroke;
        let debouncer = Arc::downgrade(self);
        let quiet_period = self.quiet_period;
        state.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(quiet_period).await;
            let Some(debouncer) = debouncer.upgrade() else {
                return;
            };
            {
                let mut state = debouncer.lock();
                if state.keystroke != keystroke {
                    return;
                }
                // From here on the request runs to completion
                state.pending = None;
            }
            debouncer.search(query).await;
            debouncer.settled.notify_waiters();
        }));
    }

    async fn search(&self, query: String) {
        if let Err(e) = self.session.require_authenticated() {
            tracing::debug!(target: "search", "[SearchDebouncer] Skipping search: {}", e);
            return;
        }
        tracing::debug!(target: "search", "[SearchDebouncer] Searching for {:?}", query);

        let result = self
            .session
            .observe(self.api.search_users(&query).await);

        let mut state = self.lock();
        if state.query != query {
            tracing::debug!(target: "search", "[SearchDebouncer] Dropping results for outdated query {:?}", query);
            return;
        }
        match result {
            Ok(users) => state.results = users,
            Err(e) => {
                tracing::warn!(target: "search", "[SearchDebouncer] Search failed: {}", e);
            }
        }
    }

    /// Follows or unfollows a user from the results, then flips that
    /// entry's flag locally. No new search is issued.
    pub async fn toggle_follow(&self, user_id: UserId, currently_following: bool) -> Result<()> {
        self.session.require_authenticated()?;
        let result = if currently_following {
            self.api.unfollow(user_id).await
        } else {
            self.api.follow(user_id).await
        };
        self.session.observe(result)?;

        let mut state = self.lock();
        if let Some(entry) = state.results.iter_mut().find(|u| u.id == user_id) {
            entry.is_following = !currently_following;
        }
        Ok(())
    }

    /// Drops any pending timer.
    pub fn cancel(&self) {
        self.lock().cancel_pending();
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.lock().cancel_pending();
    }
}
