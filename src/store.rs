use crate::{RecommenderError, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Key/value capability the session facts are stored in.
///
/// Implementations must make `set` and `remove` idempotent: setting a key to
/// the same value twice, or removing a key that is absent, succeeds.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Process-local store, used by tests and one-shot runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .map_err(|e| RecommenderError::Storage(e.to_string()))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries
            .lock()
            .map_err(|e| RecommenderError::Storage(e.to_string()))?
            .remove(key);
        Ok(())
    }
}

/// Store persisted as a JSON object in a single file.
///
/// The default location follows the XDG Base Directory Specification:
/// `~/.local/share/antirecommender/session.json`. Every mutation rewrites the
/// whole file, so the store survives between runs of the binary the way
/// browser local storage survives page reloads.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Get the default session file path using XDG directories.
    pub fn default_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir().ok_or_else(|| {
            RecommenderError::Storage("Cannot determine XDG data directory".to_string())
        })?;

        Ok(data_dir.join("antirecommender").join("session.json"))
    }

    /// Open the store at the default path.
    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_path()?)
    }

    /// Open the store at `path`, loading existing entries if the file exists.
    ///
    /// A corrupted file is discarded with a warning rather than failing, as
    /// the only consequence is having to log in again.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let json = fs::read_to_string(&path).map_err(|e| {
                RecommenderError::Storage(format!("Failed to read session file: {e}"))
            })?;
            match serde_json::from_str(&json) {
                Ok(entries) => entries,
                Err(e) => {
                    log::warn!("Ignoring unreadable session file {}: {e}", path.display());
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };

        log::debug!("Session store opened at: {}", path.display());
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        // Create parent directories if they don't exist
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                RecommenderError::Storage(format!("Failed to create session directory: {e}"))
            })?;
        }

        let json = serde_json::to_string_pretty(entries).map_err(|e| {
            RecommenderError::Storage(format!("Failed to serialize session: {e}"))
        })?;

        fs::write(&self.path, json).map_err(|e| {
            RecommenderError::Storage(format!("Failed to write session file: {e}"))
        })?;

        log::debug!("Session saved to: {}", self.path.display());
        Ok(())
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| RecommenderError::Storage(e.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| RecommenderError::Storage(e.to_string()))?;
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }
}
