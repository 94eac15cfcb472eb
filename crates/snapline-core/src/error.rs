//! Error types for the Snapline client.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Field name to the list of messages the server reported for it.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// A shared error type for every Snapline crate.
///
/// The first five variants form the taxonomy of server interaction failures.
/// The remaining variants cover client-side validation and the ambient
/// concerns (token file, configuration).
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SnaplineError {
    /// Transport failure, no response was received
    #[error("Network error: {0}")]
    Network(String),

    /// 401 response, the credential is missing, expired or invalid
    #[error("Authentication failed: {}", .detail.as_deref().unwrap_or("unauthorized"))]
    Auth { detail: Option<String> },

    /// 4xx response carrying field-level detail
    #[error("Validation failed: {}", .detail.as_deref().unwrap_or("invalid request"))]
    Validation {
        detail: Option<String>,
        fields: FieldErrors,
    },

    /// 4xx response without structured detail
    #[error("Request rejected ({status}): {}", .detail.as_deref().unwrap_or("not found or conflict"))]
    NotFoundOrConflict { status: u16, detail: Option<String> },

    /// 5xx response
    #[error("Server error ({status}): {}", .detail.as_deref().unwrap_or("internal server error"))]
    Server { status: u16, detail: Option<String> },

    /// Response body did not have the expected shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// A fetch was attempted without an authenticated session
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Client-side validation rejected the input before any request
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Token storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },
}

impl SnaplineError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates an Auth error
    pub fn auth(detail: Option<String>) -> Self {
        Self::Auth { detail }
    }

    /// Creates an InvalidInput error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Creates a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a Decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this error must invalidate the current session
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }

    /// Check if this is a transport failure
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Check if this is a field-level validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Check if this is a 5xx error
    pub fn is_server(&self) -> bool {
        matches!(self, Self::Server { .. })
    }

    /// The server-provided `detail` message, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Auth { detail }
            | Self::Validation { detail, .. }
            | Self::NotFoundOrConflict { detail, .. }
            | Self::Server { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// The field error map of a validation error, if any.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation { fields, .. } if !fields.is_empty() => Some(fields),
            _ => None,
        }
    }

    /// Message suitable for inline display.
    ///
    /// Client-side validation messages are shown verbatim; server failures
    /// show their `detail` or the given fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::InvalidInput(message) => message.clone(),
            _ => self
                .detail()
                .map(str::to_string)
                .unwrap_or_else(|| fallback.to_string()),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for SnaplineError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for SnaplineError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for SnaplineError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, SnaplineError>`.
pub type Result<T> = std::result::Result<T, SnaplineError>;
