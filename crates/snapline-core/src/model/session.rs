//! Session domain model.

use serde::{Deserialize, Serialize};

use super::user::UserSummary;

/// Lifecycle phase of the authenticated session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionStatus {
    #[default]
    Unauthenticated,
    /// A restored token is being validated against the server
    Checking,
    Authenticated,
}

/// Authentication token and the account it belongs to.
///
/// `status == Authenticated` holds exactly when both `token` and `user` are
/// present. Use the transition methods rather than assigning fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Session {
    token: Option<String>,
    user: Option<UserSummary>,
    status: SessionStatus,
}

impl Session {
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&UserSummary> {
        self.user.as_ref()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_authenticated(&self) -> bool {
        self.status == SessionStatus::Authenticated
    }

    /// A restored token is being validated; no user is adopted yet.
    pub fn begin_check(&mut self, token: String) {
        self.token = Some(token);
        self.user = None;
        self.status = SessionStatus::Checking;
    }

    pub fn authenticate(&mut self, token: String, user: UserSummary) {
        self.token = Some(token);
        self.user = Some(user);
        self.status = SessionStatus::Authenticated;
    }

    /// Replaces the user record of an authenticated session.
    ///
    /// Returns `false` (and changes nothing) when not authenticated.
    pub fn replace_user(&mut self, user: UserSummary) -> bool {
        if !self.is_authenticated() {
            return false;
        }
        self.user = Some(user);
        true
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
