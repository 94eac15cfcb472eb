//! NotificationPoller - periodic refresh of the notification list and badge.
//!
//! The poller follows the session lifecycle: it polls while the session is
//! authenticated and stops on logout or invalidation. Read-state changes
//! are applied locally before the request is sent; a refresh that was
//! issued before such a change is dropped when it arrives.

use snapline_core::api::SocialApi;
use snapline_core::error::Result;
use snapline_core::model::{Notification, NotificationId, SessionStatus, unread_count};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;

use crate::session_store::SessionStore;

/// Shortest allowed refresh period.
pub const MIN_POLL_PERIOD: Duration = Duration::from_secs(1);

#[derive(Default)]
struct PollState {
    items: Vec<Notification>,
    unread: usize,
    /// Bumped by every local mutation and by `stop`
    generation: u64,
}

pub struct NotificationPoller {
    api: Arc<dyn SocialApi>,
    session: Arc<SessionStore>,
    period: Duration,
    state: Mutex<PollState>,
    ticker: Mutex<Option<CancellationToken>>,
    lifecycle: Mutex<Option<JoinHandle<()>>>,
}

fn guard<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl NotificationPoller {
    /// `period` is raised to [`MIN_POLL_PERIOD`] when shorter.
    pub fn new(api: Arc<dyn SocialApi>, session: Arc<SessionStore>, period: Duration) -> Self {
        Self {
            api,
            session,
            period: period.max(MIN_POLL_PERIOD),
            state: Mutex::new(PollState::default()),
            ticker: Mutex::new(None),
            lifecycle: Mutex::new(None),
        }
    }

    /// Notifications in server order.
    pub fn notifications(&self) -> Vec<Notification> {
        guard(&self.state).items.clone()
    }

    /// Number of unread notifications.
    pub fn unread(&self) -> usize {
        guard(&self.state).unread
    }

    pub fn is_running(&self) -> bool {
        guard(&self.ticker)
            .as_ref()
            .is_some_and(|token| !token.is_cancelled())
    }

    /// Fetches all notifications and recomputes the badge.
    ///
    /// Returns the unread count. On failure the previous list is kept.
    pub async fn refresh(&self) -> Result<usize> {
        self.session.require_authenticated()?;
        let generation = guard(&self.state).generation;

        let items = self
            .session
            .observe(self.api.fetch_notifications().await)?;

        let mut state = guard(&self.state);
        if state.generation != generation {
            tracing::debug!(target: "notifications", "[NotificationPoller] Dropping refresh issued before a local change");
            return Ok(state.unread);
        }
        state.unread = unread_count(&items);
        state.items = items;
        tracing::debug!(target: "notifications", "[NotificationPoller] {} unread of {}", state.unread, state.items.len());
        Ok(state.unread)
    }

    /// Marks one notification read locally, then tells the server.
    ///
    /// A failed request is logged; the local flag stays set.
    pub async fn mark_read(&self, id: NotificationId) -> Result<()> {
        self.session.require_authenticated()?;
        {
            let mut state = guard(&self.state);
            if let Some(notification) = state.items.iter_mut().find(|n| n.id == id) {
                notification.is_read = true;
            }
            let unread = unread_count(&state.items);
            state.unread = unread;
            state.generation += 1;
        }

        if let Err(e) = self
            .session
            .observe(self.api.mark_notification_read(id).await)
        {
            tracing::warn!(target: "notifications", "[NotificationPoller] Failed to mark {} read: {}", id, e);
        }
        Ok(())
    }

    /// Marks every notification read locally, then tells the server.
    pub async fn mark_all_read(&self) -> Result<()> {
        self.session.require_authenticated()?;
        {
            let mut state = guard(&self.state);
            for notification in state.items.iter_mut() {
                notification.is_read = true;
            }
            state.unread = 0;
            state.generation += 1;
        }

        if let Err(e) = self
            .session
            .observe(self.api.mark_all_notifications_read().await)
        {
            tracing::warn!(target: "notifications", "[NotificationPoller] Failed to mark all read: {}", e);
        }
        Ok(())
    }

    /// Starts the recurring refresh. The first refresh runs immediately.
    /// Does nothing when already running.
    pub fn start(self: &Arc<Self>) {
        let mut ticker = guard(&self.ticker);
        if ticker.as_ref().is_some_and(|token| !token.is_cancelled()) {
            return;
        }

        let token = CancellationToken::new();
        *ticker = Some(token.clone());
        let poller = Arc::downgrade(self);
        let period = self.period;

        tokio::spawn(async move {
            let mut ticks = interval(period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticks.tick() => {
                        let Some(poller) = poller.upgrade() else { break };
                        if let Err(e) = poller.refresh().await {
                            tracing::warn!(target: "notifications", "[NotificationPoller] Refresh failed: {}", e);
                        }
                    }
                }
            }
            tracing::debug!(target: "notifications", "[NotificationPoller] Ticker stopped");
        });

        tracing::info!(target: "notifications", "[NotificationPoller] Started ({}s interval)", period.as_secs());
    }

    /// Stops the recurring refresh and forgets the list.
    ///
    /// A refresh already in flight is dropped when it arrives.
    pub fn stop(&self) {
        if let Some(token) = guard(&self.ticker).take() {
            token.cancel();
            tracing::info!(target: "notifications", "[NotificationPoller] Stopped");
        }
        let mut state = guard(&self.state);
        state.items.clear();
        state.unread = 0;
        state.generation += 1;
    }

    /// Runs the poller whenever the session is authenticated.
    pub fn spawn_lifecycle(self: &Arc<Self>) {
        let mut status_rx = self.session.subscribe();
        let poller: Weak<Self> = Arc::downgrade(self);

        let handle = tokio::spawn(async move {
            loop {
                let status = *status_rx.borrow_and_update();
                let Some(this) = poller.upgrade() else { break };
                if status == SessionStatus::Authenticated {
                    this.start();
                } else {
                    this.stop();
                }
                drop(this);

                if status_rx.changed().await.is_err() {
                    break;
                }
            }
        });

        if let Some(previous) = guard(&self.lifecycle).replace(handle) {
            previous.abort();
        }
    }

    /// Stops polling and detaches from the session lifecycle.
    pub fn shutdown(&self) {
        if let Some(handle) = guard(&self.lifecycle).take() {
            handle.abort();
        }
        self.stop();
    }
}

impl Drop for NotificationPoller {
    fn drop(&mut self) {
        if let Some(handle) = guard(&self.lifecycle).take() {
            handle.abort();
        }
        if let Some(token) = guard(&self.ticker).take() {
            token.cancel();
        }
    }
}
