//! ProfileTabLoader - a profile summary with lazily loaded tabs.
//!
//! Posts are fetched together with the summary; followers and following are
//! fetched the first time their tab is selected. Opening a different profile
//! drops every cached collection, and responses for the previous profile are
//! ignored when they arrive.

use snapline_core::api::{ProfileTarget, SocialApi};
use snapline_core::error::{Result, SnaplineError};
use snapline_core::media::{ImageUpload, MAX_PROFILE_PICTURE_BYTES};
use snapline_core::model::{Post, UserSummary};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::session_store::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProfileTab {
    #[default]
    Posts,
    Followers,
    Following,
}

/// Snapshot of the open profile. `None` collections have not been loaded.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProfileView {
    pub target: Option<ProfileTarget>,
    pub summary: Option<UserSummary>,
    pub posts: Option<Vec<Post>>,
    pub followers: Option<Vec<UserSummary>>,
    pub following: Option<Vec<UserSummary>>,
    pub active_tab: ProfileTab,
}

#[derive(Default)]
struct ProfileState {
    view: ProfileView,
    /// Bumped whenever the identity changes
    epoch: u64,
    /// Latest issued summary fetch, from `open` or a refresh
    summary_ticket: u64,
    posts_ticket: u64,
    /// Tabs whose first fetch is in flight
    pending_tabs: HashSet<ProfileTab>,
}

pub struct ProfileTabLoader {
    api: Arc<dyn SocialApi>,
    session: Arc<SessionStore>,
    state: Mutex<ProfileState>,
}

impl ProfileTabLoader {
    pub fn new(api: Arc<dyn SocialApi>, session: Arc<SessionStore>) -> Self {
        Self {
            api,
            session,
            state: Mutex::new(ProfileState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ProfileState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn view(&self) -> ProfileView {
        self.lock().view.clone()
    }

    /// Whether the open profile belongs to the signed-in user.
    pub fn is_own_profile(&self) -> bool {
        let target = self.lock().view.target;
        match target {
            Some(ProfileTarget::Own) => true,
            Some(ProfileTarget::User(id)) => self.session.current_user().is_some_and(|u| u.id == id),
            None => false,
        }
    }

    fn next_summary_ticket(&self) -> u64 {
        let mut state = self.lock();
        state.summary_ticket += 1;
        state.summary_ticket
    }

    fn current(&self) -> Result<(ProfileTarget, u64)> {
        let state = self.lock();
        state
            .view
            .target
            .map(|target| (target, state.epoch))
            .ok_or_else(|| SnaplineError::invalid_input("No profile is open"))
    }

    /// Opens a profile and fetches its summary and posts.
    ///
    /// Both fetches run concurrently; the first error is returned after
    /// whatever succeeded has been applied.
    pub async fn open(&self, target: ProfileTarget) -> Result<()> {
        self.session.require_authenticated()?;

        let (epoch, summary_ticket, posts_ticket) = {
            let mut state = self.lock();
            if state.view.target != Some(target) {
                tracing::debug!(target: "profile", "[ProfileTabLoader] Switching to {:?}", target);
                state.epoch += 1;
                state.pending_tabs.clear();
                state.view = ProfileView {
                    target: Some(target),
                    ..ProfileView::default()
                };
            }
            state.summary_ticket += 1;
            state.posts_ticket += 1;
            (state.epoch, state.summary_ticket, state.posts_ticket)
        };

        let (summary, posts) = tokio::join!(
            self.api.fetch_profile(target),
            self.api.fetch_user_posts(target)
        );
        let summary = self.session.observe(summary);
        let posts = self.session.observe(posts);

        let mut state = self.lock();
        if state.epoch != epoch {
            tracing::debug!(target: "profile", "[ProfileTabLoader] Dropping responses for {:?}", target);
            return Ok(());
        }

        let mut first_error = None;
        if state.summary_ticket == summary_ticket {
            match summary {
                Ok(summary) => state.view.summary = Some(summary),
                Err(e) => {
                    tracing::warn!(target: "profile", "[ProfileTabLoader] Failed to load profile: {}", e);
                    first_error = Some(e);
                }
            }
        } else {
            tracing::debug!(target: "profile", "[ProfileTabLoader] Dropping superseded summary for {:?}", target);
        }
        if state.posts_ticket == posts_ticket {
            match posts {
                Ok(posts) => state.view.posts = Some(posts),
                Err(e) => {
                    tracing::warn!(target: "profile", "[ProfileTabLoader] Failed to load posts: {}", e);
                    first_error.get_or_insert(e);
                }
            }
        } else {
            tracing::debug!(target: "profile", "[ProfileTabLoader] Dropping superseded posts for {:?}", target);
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Switches tabs, fetching followers/following on first selection.
    ///
    /// A selection made while the first fetch of that tab is in flight
    /// does not issue another request. A failed fetch can be retried.
    pub async fn select_tab(&self, tab: ProfileTab) -> Result<()> {
        let (target, epoch) = {
            let mut state = self.lock();
            let target = state
                .view
                .target
                .ok_or_else(|| SnaplineError::invalid_input("No profile is open"))?;
            state.view.active_tab = tab;
            let loaded = match tab {
                ProfileTab::Posts => true,
                ProfileTab::Followers => state.view.followers.is_some(),
                ProfileTab::Following => state.view.following.is_some(),
            };
            if loaded || state.pending_tabs.contains(&tab) {
                return Ok(());
            }
            self.session.require_authenticated()?;
            state.pending_tabs.insert(tab);
            (target, state.epoch)
        };

        let users = match tab {
            ProfileTab::Posts => return Ok(()),
            ProfileTab::Followers => self.api.fetch_followers(target).await,
            ProfileTab::Following => self.api.fetch_following(target).await,
        };
        let users = self.session.observe(users);

        let mut state = self.lock();
        if state.epoch != epoch {
            tracing::debug!(target: "profile", "[ProfileTabLoader] Dropping {:?} for {:?}", tab, target);
            return Ok(());
        }
        state.pending_tabs.remove(&tab);
        let users = users.inspect_err(|e| {
            tracing::warn!(target: "profile", "[ProfileTabLoader] Failed to load {:?}: {}", tab, e);
        })?;
        match tab {
            ProfileTab::Followers => state.view.followers = Some(users),
            ProfileTab::Following => state.view.following = Some(users),
            ProfileTab::Posts => {}
        }
        Ok(())
    }

    /// Updates the own bio and optionally the profile picture.
    ///
    /// On success only the summary is refetched; loaded tabs are kept.
    pub async fn update_profile(&self, bio: &str, picture: Option<ImageUpload>) -> Result<()> {
        self.session.require_authenticated()?;
        if let Some(picture) = &picture {
            picture.validate(MAX_PROFILE_PICTURE_BYTES)?;
        }

        self.session
            .observe(self.api.update_profile(bio, picture.as_ref()).await)
            .inspect_err(|e| {
                tracing::warn!(target: "profile", "[ProfileTabLoader] Profile update failed: {}", e);
            })?;
        tracing::info!(target: "profile", "[ProfileTabLoader] Profile updated");

        let ticket = self.next_summary_ticket();
        let user = self.session.refresh_user().await?;
        if self.is_own_profile() {
            let mut state = self.lock();
            if state.summary_ticket == ticket {
                state.view.summary = Some(user);
            }
        }
        Ok(())
    }

    /// Follows or unfollows the open profile, then refetches its summary.
    ///
    /// Cached follower lists are left as they are.
    pub async fn toggle_follow(&self) -> Result<()> {
        self.session.require_authenticated()?;
        if self.is_own_profile() {
            return Err(SnaplineError::invalid_input("You cannot follow yourself"));
        }
        let (target, epoch) = self.current()?;
        let (user_id, following) = {
            let state = self.lock();
            let summary = state
                .view
                .summary
                .as_ref()
                .ok_or_else(|| SnaplineError::invalid_input("Profile is not loaded yet"))?;
            (summary.id, summary.is_following)
        };

        let result = if following {
            self.api.unfollow(user_id).await
        } else {
            self.api.follow(user_id).await
        };
        self.session.observe(result)?;

        let ticket = self.next_summary_ticket();
        let summary = self
            .session
            .observe(self.api.fetch_profile(target).await)?;
        let mut state = self.lock();
        if state.epoch == epoch && state.summary_ticket == ticket {
            state.view.summary = Some(summary);
        }
        Ok(())
    }
}
