//! Persisted session token port.

use crate::error::Result;

/// Fixed key the session token is stored under.
pub const TOKEN_KEY: &str = "authToken";

/// Durable key-value storage for the single session token.
///
/// Read once at startup, written on login/registration and cleared on
/// logout or session invalidation. Implementations must not log the token.
pub trait TokenStore: Send + Sync {
    /// Returns the persisted token, or `None` when nothing is stored.
    fn load(&self) -> Result<Option<String>>;

    /// Persists `token`, replacing any previous one.
    fn save(&self, token: &str) -> Result<()>;

    /// Removes the persisted token. Succeeds when nothing is stored.
    fn clear(&self) -> Result<()>;
}
