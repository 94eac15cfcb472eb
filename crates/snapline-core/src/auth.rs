//! Authentication payloads and the failure surface of session operations.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{FieldErrors, SnaplineError};
use crate::model::UserSummary;

/// Message reported when a registration's password confirmation differs.
pub const PASSWORD_MISMATCH: &str = "Passwords don't match";

/// Username/password pair sent to the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Profile fields sent to the registration endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub password_confirm: String,
}

impl Registration {
    /// Client-side checks performed before any request is issued.
    pub fn validate(&self) -> Result<(), AuthFailure> {
        if self.password != self.password_confirm {
            return Err(AuthFailure::Message(PASSWORD_MISMATCH.to_string()));
        }
        Ok(())
    }
}

/// Successful login/registration response.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthGrant {
    /// Bearer token attached to subsequent requests
    pub access: String,
    pub refresh: Option<String>,
    pub user: UserSummary,
}

/// Why a login or registration did not produce a session.
///
/// Registration failures can carry a per-field map; callers must handle both
/// shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthFailure {
    Message(String),
    Fields(FieldErrors),
}

impl AuthFailure {
    /// Maps a login error: the server `detail`, or a generic message.
    pub fn from_login_error(err: &SnaplineError) -> Self {
        Self::Message(err.detail().unwrap_or("Login failed").to_string())
    }

    /// Maps a registration error: the field map when present, otherwise the
    /// server `detail` or a generic message.
    pub fn from_registration_error(err: &SnaplineError) -> Self {
        match err.field_errors() {
            Some(fields) => Self::Fields(fields.clone()),
            None => Self::Message(err.detail().unwrap_or("Registration failed").to_string()),
        }
    }

    /// A single line for inline display.
    pub fn display_message(&self) -> String {
        match self {
            Self::Message(message) => message.clone(),
            Self::Fields(fields) => fields
                .iter()
                .map(|(field, messages)| format!("{}: {}", field, messages.join(" ")))
                .collect::<Vec<_>>()
                .join("; "),
        }
    }
}

impl fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_message())
    }
}

impl std::error::Error for AuthFailure {}
