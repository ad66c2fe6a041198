//! Local storage backend
//!
//! Mirrors how a browser-hosted client persists data: every value, whether a
//! setting or a file-like entry, lives in one flat namespace keyed by its full
//! path. Listing a "folder" is a prefix scan over that namespace.
//!
//! # Example
//!
//! ```ignore
//! use cstudio_local_store::{LocalFileStore, LocalStorage, LocalStore};
//! use cstudio_store::{FlatStoreExt, StoreKeys};
//! use std::sync::Arc;
//!
//! let storage = Arc::new(LocalStorage::in_memory());
//! let store = LocalStore::new(Arc::clone(&storage));
//! let files = LocalFileStore::new(storage);
//!
//! store.set(StoreKeys::History, &Vec::<String>::new()).await?;
//! ```

mod storage;

use async_trait::async_trait;
use cstudio_store::{DynamicKey, FileStore, FlatStore, RawEntry, Result, StoreKey};
use std::sync::Arc;

pub use storage::LocalStorage;

/// Flat store over a [`LocalStorage`] namespace
#[derive(Clone, Debug)]
pub struct LocalStore {
    storage: Arc<LocalStorage>,
}

impl LocalStore {
    pub fn new(storage: Arc<LocalStorage>) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &Arc<LocalStorage> {
        &self.storage
    }
}

#[async_trait]
impl FlatStore for LocalStore {
    async fn get_raw(&self, key: &StoreKey) -> Result<Option<String>> {
        Ok(self.storage.get_item(key.as_str()))
    }

    async fn set_raw(&self, key: &StoreKey, value: String) -> Result<()> {
        self.storage.set_item(key.as_str(), value).await
    }

    async fn remove(&self, key: &StoreKey) -> Result<()> {
        self.storage.remove_item(key.as_str()).await
    }
}

/// File store over a [`LocalStorage`] namespace
///
/// Entries are stored under their full key path; a parent path is listed by
/// scanning for keys directly beneath it.
#[derive(Clone, Debug)]
pub struct LocalFileStore {
    storage: Arc<LocalStorage>,
}

impl LocalFileStore {
    pub fn new(storage: Arc<LocalStorage>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn get_raw(&self, key: &DynamicKey) -> Result<Option<String>> {
        Ok(self.storage.get_item(key.full_path()))
    }

    async fn set_raw(&self, key: &DynamicKey, value: String) -> Result<()> {
        self.storage.set_item(key.full_path(), value).await
    }

    async fn remove(&self, key: &DynamicKey) -> Result<()> {
        self.storage.remove_item(key.full_path()).await
    }

    async fn list_raw(&self, key: &DynamicKey) -> Result<Vec<RawEntry>> {
        let entries = self
            .storage
            .children_of(key.parent_path())
            .into_iter()
            .map(|(name, contents)| RawEntry { name, contents })
            .collect();
        Ok(entries)
    }
}
