//! Key/value slot storage
//!
//! `FileKeyValueStore` keeps all slots in one JSON object on disk:
//! ```json
//! { "registeredUsers": "{\"alice\":{...}}" }
//! ```
//! Values are opaque strings, the same way a browser's local storage holds
//! serialized text. Every access takes an advisory lock on a sibling
//! `.lock` file, so separate processes can share the file safely.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::files::{lock_path_for, write_atomic, FileLock};
use crate::domain::result::{Error, Result};
use crate::ports::KeyValueStore;

type Slots = BTreeMap<String, String>;

/// Slots persisted to a JSON file
pub struct FileKeyValueStore {
    path: PathBuf,
    lock_path: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            lock_path: lock_path_for(path),
        }
    }

    fn read_slots(&self) -> Result<Slots> {
        if !self.path.exists() {
            return Ok(Slots::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Slots::new());
        }
        serde_json::from_str(&content)
            .map_err(|e| Error::storage(format!("corrupt storage file {}: {}", self.path.display(), e)))
    }

    fn write_slots(&self, slots: &Slots) -> Result<()> {
        let content = serde_json::to_vec_pretty(slots)?;
        write_atomic(&self.path, &content)
    }

    /// Run `f` on the slots under an exclusive lock, writing them back if
    /// `f` reports a change.
    fn with_exclusive<T>(&self, f: impl FnOnce(&mut Slots) -> Result<(T, bool)>) -> Result<T> {
        let _lock = FileLock::exclusive(&self.lock_path)?;

        let mut slots = self.read_slots()?;
        let (value, changed) = f(&mut slots)?;
        if changed {
            self.write_slots(&slots)?;
        }
        Ok(value)
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _lock = FileLock::shared(&self.lock_path)?;
        Ok(self.read_slots()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        tracing::debug!(key, path = %self.path.display(), "storage set");
        self.with_exclusive(|slots| {
            slots.insert(key.to_string(), value.to_string());
            Ok(((), true))
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        tracing::debug!(key, path = %self.path.display(), "storage remove");
        self.with_exclusive(|slots| {
            let changed = slots.remove(key).is_some();
            Ok(((), changed))
        })
    }

    fn update(
        &self,
        key: &str,
        f: &mut dyn FnMut(Option<String>) -> Result<Option<String>>,
    ) -> Result<()> {
        tracing::debug!(key, path = %self.path.display(), "storage update");
        self.with_exclusive(|slots| match f(slots.get(key).cloned())? {
            Some(value) => {
                slots.insert(key.to_string(), value);
                Ok(((), true))
            }
            None => Ok(((), false)),
        })
    }
}

/// Slots held in process memory
#[derive(Default)]
pub struct MemoryKeyValueStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.slots.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.slots.lock()?.remove(key);
        Ok(())
    }

    fn update(
        &self,
        key: &str,
        f: &mut dyn FnMut(Option<String>) -> Result<Option<String>>,
    ) -> Result<()> {
        let mut slots = self.slots.lock()?;
        if let Some(value) = f(slots.get(key).cloned())? {
            slots.insert(key.to_string(), value);
        }
        Ok(())
    }
}
