//! The flat namespace behind both local stores

use cstudio_store::{DELIMITER, Result, StoreError};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::fs;

/// A single flat key to JSON-string namespace
///
/// Reads and writes are synchronous against the in-memory map. When opened
/// with a path, every mutation is flushed to that file as one JSON object.
#[derive(Debug)]
pub struct LocalStorage {
    items: Mutex<BTreeMap<String, String>>,
    path: Option<PathBuf>,
    flush: tokio::sync::Mutex<()>,
}

impl LocalStorage {
    /// A volatile namespace that lives as long as the process
    pub fn in_memory() -> Self {
        Self {
            items: Mutex::new(BTreeMap::new()),
            path: None,
            flush: tokio::sync::Mutex::new(()),
        }
    }

    /// Open the namespace persisted at `path`
    ///
    /// A missing or empty file starts an empty namespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let items = load_items(&path).await?;
        tracing::debug!(path = %path.display(), entries = items.len(), "opened local storage");

        Ok(Self {
            items: Mutex::new(items),
            path: Some(path),
            flush: tokio::sync::Mutex::new(()),
        })
    }

    /// The file this namespace is persisted to, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get_item(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    pub async fn set_item(&self, key: &str, value: String) -> Result<()> {
        self.lock().insert(key.to_string(), value);
        self.persist().await
    }

    pub async fn remove_item(&self, key: &str) -> Result<()> {
        let removed = self.lock().remove(key).is_some();
        if removed {
            self.persist().await?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Entries whose key sits directly under `parent`
    ///
    /// With an empty `parent` these are the keys without any delimiter.
    pub fn children_of(&self, parent: &str) -> Vec<(String, String)> {
        let items = self.lock();

        if parent.is_empty() {
            return items
                .iter()
                .filter(|(key, _)| !key.contains(DELIMITER))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect();
        }

        let prefix = format!("{parent}{DELIMITER}");
        items
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .filter_map(|(key, value)| {
                let leaf = &key[prefix.len()..];
                (!leaf.is_empty() && !leaf.contains(DELIMITER))
                    .then(|| (leaf.to_string(), value.clone()))
            })
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Write the current map to disk
    ///
    /// Flushes are serialized and each one snapshots the map after taking the
    /// flush lock, so the last flush to finish always holds the latest state.
    async fn persist(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let _guard = self.flush.lock().await;
        let snapshot = self.lock().clone();
        save_items(path, &snapshot).await
    }
}

async fn load_items(path: &Path) -> Result<BTreeMap<String, String>> {
    if !fs::try_exists(path)
        .await
        .map_err(|e| StoreError::io(path, e))?
    {
        return Ok(BTreeMap::new());
    }

    let contents = fs::read_to_string(path)
        .await
        .map_err(|e| StoreError::io(path, e))?;

    if contents.is_empty() {
        return Ok(BTreeMap::new());
    }

    serde_json::from_str(&contents)
        .map_err(|e| StoreError::deserialize(path.display().to_string(), e))
}

async fn save_items(path: &Path, items: &BTreeMap<String, String>) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| StoreError::io(parent, e))?;
    }

    let contents = serde_json::to_string_pretty(items).map_err(StoreError::Serialize)?;

    fs::write(path, contents)
        .await
        .map_err(|e| StoreError::io(path, e))
}
