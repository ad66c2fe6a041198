//! Flat store split across per-prefix backing files

use crate::storage::{load_entries, modify_entries};
use async_trait::async_trait;
use cstudio_store::{AppName, DELIMITER, FlatStore, Result, StoreKey};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Backing store holding every fixed-key value
pub const INTERNAL_STORE: &str = ".interstr";

/// Handle to one `<name>.cst` backing file
///
/// Writes to the same file are serialized through the handle.
#[derive(Debug)]
pub struct BackingStore {
    name: String,
    path: PathBuf,
    lock: Mutex<()>,
}

impl BackingStore {
    fn new(name: String, path: PathBuf) -> Self {
        Self {
            name,
            path,
            lock: Mutex::new(()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().await;
        let mut entries = load_entries(&self.path).await?;
        Ok(entries.remove(key))
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let _guard = self.lock.lock().await;
        modify_entries(&self.path, |entries| {
            entries.insert(key.to_string(), value);
            true
        })
        .await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        let _guard = self.lock.lock().await;
        modify_entries(&self.path, |entries| entries.remove(key).is_some()).await
    }
}

/// Flat store persisting each key prefix to its own backing file
///
/// Dynamic keys are routed by their prefix (trailing delimiter stripped);
/// fixed keys share the internal backing store. Handles are created on first
/// use and reused for the lifetime of the store.
#[derive(Debug)]
pub struct NativeStore {
    dir: PathBuf,
    stores: Mutex<HashMap<String, Arc<BackingStore>>>,
}

impl NativeStore {
    /// A store whose backing files live in `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            stores: Mutex::new(HashMap::new()),
        }
    }

    /// A store in the application's platform config directory
    pub fn for_app(app_name: &AppName) -> Self {
        Self::new(crate::storage::config_dir(app_name))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of backing stores opened so far
    pub async fn open_stores(&self) -> usize {
        self.stores.lock().await.len()
    }

    /// The backing store `key` is routed to, created on first use
    pub async fn backing_store(&self, key: &StoreKey) -> Arc<BackingStore> {
        let name = store_name(key);
        let mut stores = self.stores.lock().await;

        if let Some(store) = stores.get(&name) {
            return Arc::clone(store);
        }

        let file_name = format!("{}.cst", name.replace(DELIMITER, "_"));
        let store = Arc::new(BackingStore::new(name.clone(), self.dir.join(file_name)));
        tracing::debug!(store = %name, path = %store.path().display(), "created backing store");
        stores.insert(name, Arc::clone(&store));
        store
    }
}

fn store_name(key: &StoreKey) -> String {
    match key {
        StoreKey::Fixed(_) => INTERNAL_STORE.to_string(),
        StoreKey::Dynamic(key) => key.normalized_prefix().to_string(),
    }
}

#[async_trait]
impl FlatStore for NativeStore {
    async fn get_raw(&self, key: &StoreKey) -> Result<Option<String>> {
        self.backing_store(key).await.get(key.as_str()).await
    }

    async fn set_raw(&self, key: &StoreKey, value: String) -> Result<()> {
        self.backing_store(key).await.set(key.as_str(), value).await
    }

    async fn remove(&self, key: &StoreKey) -> Result<()> {
        self.backing_store(key).await.remove(key.as_str()).await?;
        Ok(())
    }
}
