//! UserSummary domain model.

use serde::{Deserialize, Serialize};

/// Identifier of a user account.
pub type UserId = u64;

/// Public summary of a user account as seen by the authenticated viewer.
///
/// Every component keeps its own copy; a change made through one component
/// becomes visible elsewhere only after that component refetches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub profile_picture_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    /// Whether the viewer follows this user
    #[serde(default)]
    pub is_following: bool,
    #[serde(default)]
    pub posts_count: u64,
    #[serde(default)]
    pub followers_count: u64,
    #[serde(default)]
    pub following_count: u64,
}

impl UserSummary {
    /// Creates a summary with only the identity fields set.
    pub fn new(id: UserId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            first_name: String::new(),
            last_name: String::new(),
            email: None,
            profile_picture_url: None,
            bio: None,
            is_following: false,
            posts_count: 0,
            followers_count: 0,
            following_count: 0,
        }
    }

    /// "First Last", or the username when both names are blank.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}
