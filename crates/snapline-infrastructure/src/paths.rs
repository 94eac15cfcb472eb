//! Unified path management for snapline files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/snapline/          # Config directory
//! ├── config.toml              # Client configuration
//! └── session.json             # Persisted session token (0600)
//! ```

use std::path::{Path, PathBuf};

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home/config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Resolves snapline file locations, optionally under a custom base directory.
#[derive(Debug, Clone)]
pub struct SnaplinePaths {
    base: Option<PathBuf>,
}

impl SnaplinePaths {
    /// `base` replaces the platform config directory (used by tests and the
    /// CLI's `--config-dir`).
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    /// Returns the snapline configuration directory.
    ///
    /// - `Ok(PathBuf)`: e.g. `~/.config/snapline/`, or the custom base
    /// - `Err(PathError::ConfigDirNotFound)`: platform directory unknown
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join("snapline"))
                .ok_or(PathError::ConfigDirNotFound),
        }
    }

    /// Path to `config.toml`.
    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Path to the session token file.
    ///
    /// # Security Note
    ///
    /// The file is written with 600 permissions on Unix.
    pub fn session_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("session.json"))
    }
}
