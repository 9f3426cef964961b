//! Persisted per-item state that survives between check cycles.
//!
//! Keys are chosen by the caller and must be unique per logical metric
//! (host, service and counter name); the store does not enforce this.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::rate::RateState;
use crate::error::{LevelcheckError, Result};

/// State remembered for one key
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ItemState {
    Counter(RateState),
    Average { timestamp: f64, average: f64 },
}

pub trait ValueStore {
    fn get(&self, key: &str) -> Option<ItemState>;

    fn set(&mut self, key: &str, state: ItemState);

    fn remove(&mut self, key: &str) -> Option<ItemState>;

    /// All keys, in ascending order
    fn keys(&self) -> Vec<String>;

    /// Remove every key starting with `prefix`, returning how many were removed
    fn clear_prefix(&mut self, prefix: &str) -> usize {
        let matching: Vec<String> = self
            .keys()
            .into_iter()
            .filter(|key| key.starts_with(prefix))
            .collect();
        for key in &matching {
            self.remove(key);
        }
        matching.len()
    }
}

impl<S: ValueStore + ?Sized> ValueStore for &mut S {
    fn get(&self, key: &str) -> Option<ItemState> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, state: ItemState) {
        (**self).set(key, state)
    }

    fn remove(&mut self, key: &str) -> Option<ItemState> {
        (**self).remove(key)
    }

    fn keys(&self) -> Vec<String> {
        (**self).keys()
    }
}

/// In-memory store with process lifetime
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryValueStore {
    items: BTreeMap<String, ItemState>,
}

impl MemoryValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ItemState)> {
        self.items.iter()
    }
}

impl ValueStore for MemoryValueStore {
    fn get(&self, key: &str) -> Option<ItemState> {
        self.items.get(key).copied()
    }

    fn set(&mut self, key: &str, state: ItemState) {
        self.items.insert(key.to_string(), state);
    }

    fn remove(&mut self, key: &str) -> Option<ItemState> {
        self.items.remove(key)
    }

    fn keys(&self) -> Vec<String> {
        self.items.keys().cloned().collect()
    }
}

/// Store backed by a JSON file. Changes are kept in memory until [`save`](Self::save).
///
/// Only keys this instance set or removed are written back; every other key
/// is taken from the file as it is at save time, so concurrent runs sharing
/// one file do not drop each other's counters.
#[derive(Debug, Clone)]
pub struct FileValueStore {
    path: PathBuf,
    items: MemoryValueStore,
    // `None` marks a removal
    changes: BTreeMap<String, Option<ItemState>>,
}

impl FileValueStore {
    /// Load the store at `path`. A missing or empty file yields an empty store.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let items = read_items(&path)?;

        log::debug!("loaded {} item states from {}", items.len(), path.display());
        Ok(Self {
            path,
            items,
            changes: BTreeMap::new(),
        })
    }

    /// Merge the pending changes into the file on disk.
    ///
    /// The merged content goes to a sibling temporary file which is then
    /// renamed over the target, so readers never see a half-written file.
    pub fn save(&mut self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut merged = read_items(&self.path)?;
        for (key, change) in &self.changes {
            match change {
                Some(state) => merged.set(key, *state),
                None => {
                    merged.remove(key);
                }
            }
        }

        let data = serde_json::to_vec_pretty(&merged)?;
        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, data)?;
        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        log::debug!(
            "saved {} changed keys, {} item states in {}",
            self.changes.len(),
            merged.len(),
            self.path.display()
        );
        self.items = merged;
        self.changes.clear();
        Ok(())
    }

    /// Default location below the user's local data directory
    pub fn default_path() -> Result<PathBuf> {
        let data_dir = dirs::data_local_dir()
            .ok_or_else(|| LevelcheckError::config("Could not determine data directory"))?;

        Ok(data_dir.join("levelcheck").join("counters.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn items(&self) -> &MemoryValueStore {
        &self.items
    }

    /// Keys set or removed since the last load or save
    pub fn pending(&self) -> usize {
        self.changes.len()
    }

    // One temporary file per process so parallel savers do not share it
    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(format!(".{}.tmp", std::process::id()));
        self.path.with_file_name(name)
    }
}

fn read_items(path: &Path) -> Result<MemoryValueStore> {
    if !path.exists() {
        return Ok(MemoryValueStore::new());
    }

    let data = fs::read(path)?;
    if data.iter().all(u8::is_ascii_whitespace) {
        return Ok(MemoryValueStore::new());
    }

    serde_json::from_slice(&data).map_err(|e| {
        LevelcheckError::value_store(format!("corrupt value store {}: {}", path.display(), e))
    })
}

impl ValueStore for FileValueStore {
    fn get(&self, key: &str) -> Option<ItemState> {
        self.items.get(key)
    }

    fn set(&mut self, key: &str, state: ItemState) {
        self.changes.insert(key.to_string(), Some(state));
        self.items.set(key, state)
    }

    fn remove(&mut self, key: &str) -> Option<ItemState> {
        self.changes.insert(key.to_string(), None);
        self.items.remove(key)
    }

    fn keys(&self) -> Vec<String> {
        self.items.keys()
    }
}
