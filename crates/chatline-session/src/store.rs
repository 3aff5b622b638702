//! Persisted client state.
//!
//! A tiny string key/value store. The only key in use is
//! [`CONVERSATION_KEY`], holding the user's conversation id across restarts.

use std::collections::{BTreeMap, HashMap};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, warn};

use crate::error::StoreError;

/// Key under which the user's conversation id is persisted.
pub const CONVERSATION_KEY: &str = "conversation_uuid";

/// String key/value storage that outlives the process.
pub trait IdStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Store backed by a JSON object file.
#[derive(Debug, Clone)]
pub struct FileIdStore {
    path: PathBuf,
}

impl FileIdStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data dir>/chatline/state.json`, if the platform has a data dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("chatline").join("state.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Like `load`, but a corrupt file reads as empty so the next write
    /// replaces it.
    fn load_for_write(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match self.load() {
            Err(StoreError::Json(e)) => {
                warn!(path = %self.path.display(), error = %e, "Discarding corrupt client state");
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    fn save(&self, values: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(values)?;
        std::fs::write(&self.path, raw)?;
        debug!(path = %self.path.display(), "Saved client state");
        Ok(())
    }
}

impl IdStore for FileIdStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.load()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut values = self.load_for_write()?;
        values.insert(key.to_string(), value.to_string());
        self.save(&values)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        match self.load() {
            Ok(mut values) => {
                if values.remove(key).is_some() {
                    self.save(&values)?;
                }
                Ok(())
            }
            Err(StoreError::Json(e)) => {
                warn!(path = %self.path.display(), error = %e, "Discarding corrupt client state");
                self.save(&BTreeMap::new())
            }
            Err(e) => Err(e),
        }
    }
}

/// Process-local store, for sessions that should not persist anything.
#[derive(Debug, Default)]
pub struct MemoryIdStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryIdStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdStore for MemoryIdStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.lock().unwrap_or_else(|e| e.into_inner()).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.values.lock().unwrap_or_else(|e| e.into_inner()).remove(key);
        Ok(())
    }
}
