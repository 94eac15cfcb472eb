//! SessionStore - owner of the authentication token and current user.
//!
//! The store is the only writer of the [`CredentialHandle`] shared with the
//! HTTP client. Token, user and credential change together under one lock,
//! and the new [`SessionStatus`] is published on a watch channel before the
//! lock is released, so no request issued after login lacks the credential
//! and none issued after logout carries it.

use snapline_core::api::{ProfileTarget, SocialApi};
use snapline_core::auth::{AuthFailure, AuthGrant, Credentials, Registration};
use snapline_core::credential::CredentialHandle;
use snapline_core::error::{Result, SnaplineError};
use snapline_core::model::{Session, SessionStatus, UserSummary};
use snapline_core::token_store::TokenStore;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::watch;

struct SessionInner {
    session: Session,
    /// Bumped on every transition; an in-flight restore only applies its
    /// outcome when no other transition happened meanwhile.
    epoch: u64,
}

pub struct SessionStore {
    api: Arc<dyn SocialApi>,
    token_store: Arc<dyn TokenStore>,
    credential: CredentialHandle,
    inner: RwLock<SessionInner>,
    status_tx: watch::Sender<SessionStatus>,
}

impl SessionStore {
    pub fn new(
        api: Arc<dyn SocialApi>,
        token_store: Arc<dyn TokenStore>,
        credential: CredentialHandle,
    ) -> Self {
        let (status_tx, _) = watch::channel(SessionStatus::Unauthenticated);
        Self {
            api,
            token_store,
            credential,
            inner: RwLock::new(SessionInner {
                session: Session::default(),
                epoch: 0,
            }),
            status_tx,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Publishes `status` if it differs from the last published one.
    fn publish(&self, status: SessionStatus) {
        self.status_tx.send_if_modified(|current| {
            if *current == status {
                return false;
            }
            *current = status;
            true
        });
    }

    pub fn credential(&self) -> &CredentialHandle {
        &self.credential
    }

    /// Copy of the current session.
    pub fn snapshot(&self) -> Session {
        self.read().session.clone()
    }

    pub fn status(&self) -> SessionStatus {
        self.read().session.status()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().session.is_authenticated()
    }

    pub fn current_user(&self) -> Option<UserSummary> {
        self.read().session.user().cloned()
    }

    /// Receiver of status changes; starts at the current status.
    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status_tx.subscribe()
    }

    pub fn require_authenticated(&self) -> Result<()> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(SnaplineError::NotAuthenticated)
        }
    }

    /// Restores a persisted session.
    ///
    /// Without a stored token this completes without any request. A stored
    /// token is validated by fetching the own profile; any failure discards
    /// it. Returns the resulting status.
    pub async fn restore(&self) -> SessionStatus {
        let token = match self.token_store.load() {
            Ok(Some(token)) => token,
            Ok(None) => {
                tracing::debug!(target: "session", "[SessionStore] No persisted token");
                return self.status();
            }
            Err(e) => {
                tracing::warn!(target: "session", "[SessionStore] Failed to read persisted token: {}", e);
                self.clear_persisted_token();
                return self.status();
            }
        };

        let epoch = {
            let mut inner = self.write();
            self.credential.attach(token.clone());
            inner.session.begin_check(token.clone());
            inner.epoch += 1;
            self.publish(SessionStatus::Checking);
            inner.epoch
        };
        tracing::debug!(target: "session", "[SessionStore] Validating persisted token");

        match self.api.fetch_profile(ProfileTarget::Own).await {
            Ok(user) => {
                let mut inner = self.write();
                if inner.epoch != epoch {
                    tracing::debug!(target: "session", "[SessionStore] Restore superseded, ignoring result");
                    return inner.session.status();
                }
                tracing::info!(target: "session", "[SessionStore] Session restored for {}", user.username);
                inner.session.authenticate(token, user);
                inner.epoch += 1;
                self.publish(SessionStatus::Authenticated);
                SessionStatus::Authenticated
            }
            Err(e) => {
                {
                    let mut inner = self.write();
                    if inner.epoch != epoch {
                        tracing::debug!(target: "session", "[SessionStore] Restore superseded, ignoring failure");
                        return inner.session.status();
                    }
                    self.credential.detach();
                    inner.session.reset();
                    inner.epoch += 1;
                    self.publish(SessionStatus::Unauthenticated);
                }
                tracing::warn!(target: "session", "[SessionStore] Persisted token rejected: {}", e);
                self.clear_persisted_token();
                SessionStatus::Unauthenticated
            }
        }
    }

    pub async fn login(&self, credentials: &Credentials) -> std::result::Result<(), AuthFailure> {
        tracing::info!(target: "session", "[SessionStore] Logging in as {}", credentials.username);
        match self.api.login(credentials).await {
            Ok(grant) => {
                self.adopt(grant);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(target: "session", "[SessionStore] Login failed: {}", e);
                Err(AuthFailure::from_login_error(&e))
            }
        }
    }

    /// Registers and signs in. A password confirmation mismatch fails before
    /// any request is issued.
    pub async fn register(
        &self,
        registration: &Registration,
    ) -> std::result::Result<(), AuthFailure> {
        registration.validate()?;

        tracing::info!(target: "session", "[SessionStore] Registering {}", registration.username);
        match self.api.register(registration).await {
            Ok(grant) => {
                self.adopt(grant);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(target: "session", "[SessionStore] Registration failed: {}", e);
                Err(AuthFailure::from_registration_error(&e))
            }
        }
    }

    fn adopt(&self, grant: AuthGrant) {
        // A session that cannot be persisted still works for this process
        if let Err(e) = self.token_store.save(&grant.access) {
            tracing::warn!(target: "session", "[SessionStore] Failed to persist token: {}", e);
        }

        let mut inner = self.write();
        tracing::info!(target: "session", "[SessionStore] Authenticated as {}", grant.user.username);
        self.credential.attach(grant.access.clone());
        inner.session.authenticate(grant.access, grant.user);
        inner.epoch += 1;
        self.publish(SessionStatus::Authenticated);
    }

    /// Ends the session. Idempotent.
    pub fn logout(&self) {
        tracing::info!(target: "session", "[SessionStore] Logging out");
        self.reset();
    }

    /// Ends the session after an authentication failure.
    pub fn invalidate(&self, reason: &str) {
        if self.status() == SessionStatus::Unauthenticated {
            return;
        }
        tracing::warn!(target: "session", "[SessionStore] Session invalidated: {}", reason);
        self.reset();
    }

    fn reset(&self) {
        {
            let mut inner = self.write();
            self.credential.detach();
            inner.session.reset();
            inner.epoch += 1;
            self.publish(SessionStatus::Unauthenticated);
        }
        self.clear_persisted_token();
    }

    fn clear_persisted_token(&self) {
        if let Err(e) = self.token_store.clear() {
            tracing::warn!(target: "session", "[SessionStore] Failed to clear persisted token: {}", e);
        }
    }

    /// Passes `result` through, invalidating the session when it carries an
    /// authentication error.
    pub fn observe<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            if e.is_auth() {
                self.invalidate(&e.to_string());
            }
        }
        result
    }

    /// Refetches the own profile and replaces the session user.
    pub async fn refresh_user(&self) -> Result<UserSummary> {
        self.require_authenticated()?;
        let user = self.observe(self.api.fetch_profile(ProfileTarget::Own).await)?;
        if self.write().session.replace_user(user.clone()) {
            tracing::debug!(target: "session", "[SessionStore] Session user refreshed");
        }
        Ok(user)
    }
}
