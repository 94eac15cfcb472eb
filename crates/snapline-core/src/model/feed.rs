//! Feed view model.

use serde::{Deserialize, Serialize};

use super::post::Post;

/// Selector between the followed-users collection and the global one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedMode {
    #[default]
    Following,
    Explore,
}

/// Guidance shown when a feed comes back empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyFeed {
    /// Nobody the viewer follows has posted
    NoFollowedPosts,
    /// No posts exist at all
    NoPostsYet,
}

impl EmptyFeed {
    pub fn message(&self) -> &'static str {
        match self {
            EmptyFeed::NoFollowedPosts => {
                "No posts from people you follow yet! Try exploring or following some users."
            }
            EmptyFeed::NoPostsYet => "No posts available yet!",
        }
    }
}

/// Snapshot of the feed as it should be displayed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeedView {
    pub mode: FeedMode,
    pub items: Vec<Post>,
    pub loading: bool,
    /// A load for `mode` has completed successfully
    pub loaded: bool,
    pub last_error: Option<String>,
}

impl FeedView {
    /// Empty-state guidance, only once a load has completed with no items.
    /// A failed load shows its error instead.
    pub fn empty_state(&self) -> Option<EmptyFeed> {
        if self.loading || !self.loaded || self.last_error.is_some() || !self.items.is_empty() {
            return None;
        }
        Some(match self.mode {
            FeedMode::Following => EmptyFeed::NoFollowedPosts,
            FeedMode::Explore => EmptyFeed::NoPostsYet,
        })
    }
}
