//! Client configuration model.

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_API_ROOT: &str = "http://localhost:8000/api";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;
pub const DEFAULT_MIN_QUERY_LEN: usize = 2;

/// Settings shared by the HTTP client and the synchronization components.
///
/// Every field has a default, so a partial `config.toml` is valid.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL every API path is appended to
    #[serde(default = "default_api_root")]
    pub api_root: String,
    /// Notification badge refresh period
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// Quiet period before a search query is sent
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
    /// Queries shorter than this clear the results instead of searching
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,
    /// Per-request timeout; the transport default applies when absent
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_api_root() -> String {
    DEFAULT_API_ROOT.to_string()
}

fn default_poll_interval_secs() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

fn default_search_debounce_ms() -> u64 {
    DEFAULT_SEARCH_DEBOUNCE_MS
}

fn default_min_query_len() -> usize {
    DEFAULT_MIN_QUERY_LEN
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_root: default_api_root(),
            poll_interval_secs: default_poll_interval_secs(),
            search_debounce_ms: default_search_debounce_ms(),
            min_query_len: default_min_query_len(),
            request_timeout_secs: None,
        }
    }
}

impl ClientConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ClientConfig = toml::from_str(r#"api_root = "https://snap.example/api""#)
            .expect("partial config should parse");
        assert_eq!(config.api_root, "https://snap.example/api");
        assert_eq!(config.poll_interval(), Duration::from_secs(30));
        assert_eq!(config.search_debounce(), Duration::from_millis(300));
        assert_eq!(config.min_query_len, 2);
        assert!(config.request_timeout().is_none());
    }
}
