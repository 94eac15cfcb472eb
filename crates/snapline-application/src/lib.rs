//! Session and data-synchronization components.
//!
//! Every component talks to the server through an `Arc<dyn SocialApi>` and
//! funnels its results through the shared [`SessionStore`], which owns the
//! credential and invalidates the session on authentication failures.

pub mod content_publisher;
pub mod feed_controller;
pub mod notification_poller;
pub mod profile_tabs;
pub mod search_debouncer;
pub mod session_store;
pub mod story_tray;

#[cfg(test)]
mod test_support;

pub use content_publisher::ContentPublisher;
pub use feed_controller::{FeedController, LoadOutcome};
pub use notification_poller::NotificationPoller;
pub use profile_tabs::{ProfileTab, ProfileTabLoader, ProfileView};
pub use search_debouncer::SearchDebouncer;
pub use session_store::SessionStore;
pub use story_tray::StoryTray;
