//! Shared credential slot read by the outbound request pipeline.

use std::sync::{Arc, PoisonError, RwLock};

/// Bearer token slot shared between the session store (sole writer) and the
/// HTTP client (reader at request-build time).
///
/// Cloning shares the slot.
#[derive(Clone, Default)]
pub struct CredentialHandle {
    token: Arc<RwLock<Option<String>>>,
}

impl CredentialHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches `token` to every request built from now on.
    pub fn attach(&self, token: impl Into<String>) {
        let mut slot = self.token.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(token.into());
    }

    /// Removes the credential; subsequent requests are anonymous.
    pub fn detach(&self) {
        let mut slot = self.token.write().unwrap_or_else(PoisonError::into_inner);
        *slot = None;
    }

    /// Current bearer token, if attached.
    pub fn bearer(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_attached(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl std::fmt::Debug for CredentialHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the token itself
        f.debug_struct("CredentialHandle")
            .field("attached", &self.is_attached())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_the_slot() {
        let handle = CredentialHandle::new();
        let reader = handle.clone();

        handle.attach("abc");
        assert_eq!(reader.bearer().as_deref(), Some("abc"));

        handle.detach();
        assert!(!reader.is_attached());
    }

    #[test]
    fn test_debug_hides_token() {
        let handle = CredentialHandle::new();
        handle.attach("secret-token");
        let printed = format!("{:?}", handle);
        assert!(!printed.contains("secret-token"));
        assert!(printed.contains("attached: true"));
    }
}
