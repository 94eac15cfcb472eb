//! Client configuration loading.
//!
//! Priority: environment variables > config.toml > built-in defaults.

use snapline_core::config::ClientConfig;
use snapline_core::error::{Result, SnaplineError};
use std::fs;
use std::path::{Path, PathBuf};

use crate::paths::SnaplinePaths;

pub const ENV_API_ROOT: &str = "SNAPLINE_API_ROOT";
pub const ENV_POLL_INTERVAL_SECS: &str = "SNAPLINE_POLL_INTERVAL_SECS";

/// Loads [`ClientConfig`] from `config.toml` and the environment.
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    /// Uses `config.toml` under `base`, or the default config directory.
    pub fn new(base: Option<&Path>) -> anyhow::Result<Self> {
        let path = SnaplinePaths::new(base)
            .config_file()
            .map_err(|e| anyhow::anyhow!("Failed to get config path: {}", e))?;
        Ok(Self { path })
    }

    /// Creates a service with a custom file path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Reads the file (missing or empty → defaults) and applies the
    /// process environment on top.
    pub fn load(&self) -> Result<ClientConfig> {
        let config = self.load_file()?;
        apply_env_overrides(config, |key| std::env::var(key).ok())
    }

    fn load_file(&self) -> Result<ClientConfig> {
        if !self.path.exists() {
            tracing::debug!("[ConfigService] No config at {}, using defaults", self.path.display());
            return Ok(ClientConfig::default());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(ClientConfig::default());
        }

        toml::from_str(&content).map_err(|e| {
            SnaplineError::config(format!(
                "Failed to parse {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}

/// Applies `SNAPLINE_*` overrides read through `lookup`.
pub fn apply_env_overrides<F>(mut config: ClientConfig, lookup: F) -> Result<ClientConfig>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(api_root) = lookup(ENV_API_ROOT).filter(|v| !v.trim().is_empty()) {
        config.api_root = api_root;
    }

    if let Some(raw) = lookup(ENV_POLL_INTERVAL_SECS) {
        config.poll_interval_secs = raw.trim().parse().map_err(|_| {
            SnaplineError::config(format!("{} must be a number of seconds, got '{}'", ENV_POLL_INTERVAL_SECS, raw))
        })?;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::new(Some(temp_dir.path())).unwrap();
        let config = service.load_file().unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_file_values_are_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            "api_root = \"https://snap.example/api\"\npoll_interval_secs = 10\n",
        )
        .unwrap();

        let config = ConfigService::with_path(path).load_file().unwrap();
        assert_eq!(config.api_root, "https://snap.example/api");
        assert_eq!(config.poll_interval_secs, 10);
        assert_eq!(config.search_debounce_ms, 300);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "poll_interval_secs = \"soon\"").unwrap();

        let result = ConfigService::with_path(path).load_file();
        assert!(matches!(result, Err(SnaplineError::Config(_))));
    }

    #[test]
    fn test_env_overrides_win() {
        let config = apply_env_overrides(ClientConfig::default(), |key| match key {
            ENV_API_ROOT => Some("http://10.0.0.2/api".to_string()),
            ENV_POLL_INTERVAL_SECS => Some("5".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.api_root, "http://10.0.0.2/api");
        assert_eq!(config.poll_interval_secs, 5);
    }

    #[test]
    fn test_bad_env_interval_is_rejected() {
        let result = apply_env_overrides(ClientConfig::default(), |key| {
            (key == ENV_POLL_INTERVAL_SECS).then(|| "often".to_string())
        });
        assert!(matches!(result, Err(SnaplineError::Config(_))));
    }
}
