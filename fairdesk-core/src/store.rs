//! Persistence of the fair collection.
//!
//! The whole collection is one JSON blob in a single named slot of a
//! synchronous key-value store. It is read once at startup and rewritten
//! wholesale after every mutation.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{FairDeskError, FairDeskResult};
use crate::fair::TradeFair;

/// Slot holding the serialized fair collection.
pub const FAIRS_KEY: &str = "fairs_data";

/// A local, synchronous key-value store of named text slots.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> FairDeskResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> FairDeskResult<()>;
}

/// Stores each slot as `<dir>/<key>.json`.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore { dir: dir.into() }
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> FairDeskResult<Option<String>> {
        let path = self.slot_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(&path)?))
    }

    fn set(&self, key: &str, value: &str) -> FairDeskResult<()> {
        std::fs::create_dir_all(&self.dir)?;

        let path = self.slot_path(key);
        let temp = self.dir.join(format!("{}.json.tmp", key));

        std::fs::write(&temp, value)?;
        std::fs::rename(&temp, &path)?;
        Ok(())
    }
}

/// In-memory slots. Clones share the same storage.
#[derive(Clone, Default)]
pub struct MemoryStore {
    slots: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> FairDeskResult<Option<String>> {
        Ok(self.slots.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> FairDeskResult<()> {
        self.slots.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Loads and saves the fair collection through a [`KeyValueStore`].
pub struct FairStore {
    backend: Box<dyn KeyValueStore>,
}

impl FairStore {
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        FairStore {
            backend: Box::new(backend),
        }
    }

    /// Read the collection. Never fails: an absent, unreadable or malformed
    /// blob is treated as "no data yet".
    pub fn load(&self) -> Vec<TradeFair> {
        let raw = match self.backend.get(FAIRS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Could not read stored fairs, starting empty");
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(fairs) => fairs,
            Err(e) => {
                tracing::warn!(error = %e, "Stored fairs are malformed, starting empty");
                Vec::new()
            }
        }
    }

    /// Overwrite the stored collection.
    pub fn save(&self, fairs: &[TradeFair]) -> FairDeskResult<()> {
        let content = serde_json::to_string(fairs)
            .map_err(|e| FairDeskError::Serialization(e.to_string()))?;
        self.backend.set(FAIRS_KEY, &content)?;
        tracing::debug!(count = fairs.len(), "Saved fairs");
        Ok(())
    }
}
