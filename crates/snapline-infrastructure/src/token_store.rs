//! Token store implementations.
//!
//! - [`FileTokenStore`]: JSON key-value file, written atomically
//! - [`InMemoryTokenStore`]: process-local, for tests and ephemeral sessions

use snapline_core::error::{Result, SnaplineError};
use snapline_core::token_store::{TOKEN_KEY, TokenStore};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::paths::SnaplinePaths;

type KeyValues = BTreeMap<String, serde_json::Value>;

/// Stores the session token under [`TOKEN_KEY`] in a JSON object file.
///
/// Other keys in the file are preserved on write. Writes go through a
/// temporary file and an atomic rename; on Unix the file is 0600.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Creates a store at the default location (`~/.config/snapline/session.json`).
    pub fn new_default() -> anyhow::Result<Self> {
        Self::in_dir(None)
    }

    /// Creates a store under `base`, or the default config directory.
    pub fn in_dir(base: Option<&Path>) -> anyhow::Result<Self> {
        let path = SnaplinePaths::new(base)
            .session_file()
            .map_err(|e| anyhow::anyhow!("Failed to get session path: {}", e))?;
        Ok(Self { path })
    }

    /// Creates a store with a custom file path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<KeyValues> {
        if !self.path.exists() {
            return Ok(KeyValues::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(KeyValues::new());
        }
        serde_json::from_str(&content).map_err(|e| {
            SnaplineError::storage(format!(
                "Session file {} is not a JSON object: {}",
                self.path.display(),
                e
            ))
        })
    }

    fn write_entries(&self, entries: &KeyValues) -> Result<()> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| SnaplineError::storage("Session path has no parent directory"))?;
        fs::create_dir_all(parent)?;

        let json = serde_json::to_string_pretty(entries)?;
        let tmp_path = self.path.with_extension("json.tmp");
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(json.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp_path, fs::Permissions::from_mode(0o600))?;
        }

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>> {
        let entries = self.read_entries()?;
        Ok(entries
            .get(TOKEN_KEY)
            .and_then(|value| value.as_str())
            .filter(|token| !token.is_empty())
            .map(str::to_string))
    }

    fn save(&self, token: &str) -> Result<()> {
        let mut entries = self.read_entries()?;
        entries.insert(
            TOKEN_KEY.to_string(),
            serde_json::Value::String(token.to_string()),
        );
        self.write_entries(&entries)?;
        tracing::debug!(target: "session", "[FileTokenStore] Token persisted to {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut entries = self.read_entries()?;
        if entries.remove(TOKEN_KEY).is_none() {
            return Ok(());
        }
        self.write_entries(&entries)?;
        tracing::debug!(target: "session", "[FileTokenStore] Token cleared");
        Ok(())
    }
}

/// Keeps the token in memory only.
#[derive(Default)]
pub struct InMemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `token`, as if persisted earlier.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for InMemoryTokenStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self
            .token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, token: &str) -> Result<()> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}
