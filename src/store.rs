//! Backend contracts
//!
//! Backends implement the object-safe [`FlatStore`] and [`FileStore`] traits
//! over raw JSON strings. Typed access goes through [`FlatStoreExt`] and
//! [`FileStoreExt`], which every backend gets for free.

use crate::error::{Result, StoreError};
use crate::key::{DynamicKey, StoreKey};
use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use std::future::Future;

/// A key to JSON value store over a single namespace
#[async_trait]
pub trait FlatStore: Send + Sync {
    /// Read the raw JSON stored under `key`, `None` when absent
    async fn get_raw(&self, key: &StoreKey) -> Result<Option<String>>;

    /// Store raw JSON under `key`, overwriting any previous value
    async fn set_raw(&self, key: &StoreKey, value: String) -> Result<()>;

    /// Delete `key`; deleting an absent key is not an error
    async fn remove(&self, key: &StoreKey) -> Result<()>;
}

/// One entry found while listing a parent path
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawEntry {
    /// Final path component of the entry
    pub name: String,
    /// Raw JSON contents
    pub contents: String,
}

/// A store of file-like entries addressed by [`DynamicKey`]
///
/// Entries sharing a parent path can be enumerated together.
#[async_trait]
pub trait FileStore: Send + Sync {
    async fn get_raw(&self, key: &DynamicKey) -> Result<Option<String>>;

    async fn set_raw(&self, key: &DynamicKey, value: String) -> Result<()>;

    async fn remove(&self, key: &DynamicKey) -> Result<()>;

    /// Every entry stored directly under `key`'s parent path
    ///
    /// A parent that was never created yields an empty list.
    async fn list_raw(&self, key: &DynamicKey) -> Result<Vec<RawEntry>>;
}

pub(crate) fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> Result<T> {
    serde_json::from_str(raw).map_err(|e| StoreError::deserialize(key, e))
}

pub(crate) fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(StoreError::Serialize)
}

/// Typed access to a [`FlatStore`]
pub trait FlatStoreExt: FlatStore {
    /// Read and deserialize the value under `key`
    fn get<T>(&self, key: impl Into<StoreKey> + Send) -> impl Future<Output = Result<Option<T>>> + Send
    where
        T: DeserializeOwned;

    /// Read the value under `key`, durably writing `default` first if absent
    fn get_or_default<T>(
        &self,
        key: impl Into<StoreKey> + Send,
        default: T,
    ) -> impl Future<Output = Result<T>> + Send
    where
        T: Serialize + DeserializeOwned + Send;

    /// Serialize and store `value` under `key`
    fn set<T>(&self, key: impl Into<StoreKey> + Send, value: &T) -> impl Future<Output = Result<()>> + Send
    where
        T: Serialize + Sync + ?Sized;
}

impl<S: FlatStore + ?Sized> FlatStoreExt for S {
    async fn get<T>(&self, key: impl Into<StoreKey> + Send) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let key = key.into();
        match self.get_raw(&key).await? {
            Some(raw) => decode(key.as_str(), &raw).map(Some),
            None => Ok(None),
        }
    }

    async fn get_or_default<T>(&self, key: impl Into<StoreKey> + Send, default: T) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Send,
    {
        let key = key.into();
        match self.get_raw(&key).await? {
            Some(raw) => decode(key.as_str(), &raw),
            None => {
                self.set_raw(&key, encode(&default)?).await?;
                Ok(default)
            }
        }
    }

    async fn set<T>(&self, key: impl Into<StoreKey> + Send, value: &T) -> Result<()>
    where
        T: Serialize + Sync + ?Sized,
    {
        let key = key.into();
        let json = encode(value)?;
        self.set_raw(&key, json).await
    }
}

/// Typed access to a [`FileStore`]
pub trait FileStoreExt: FileStore {
    fn get<T>(&self, key: &DynamicKey) -> impl Future<Output = Result<Option<T>>> + Send
    where
        T: DeserializeOwned;

    /// Read the entry at `key`, durably writing `default` first if absent
    fn get_or_default<T>(&self, key: &DynamicKey, default: T) -> impl Future<Output = Result<T>> + Send
    where
        T: Serialize + DeserializeOwned + Send;

    fn set<T>(&self, key: &DynamicKey, value: &T) -> impl Future<Output = Result<()>> + Send
    where
        T: Serialize + Sync + ?Sized;

    /// Every decodable entry sharing `key`'s parent path
    ///
    /// Entries that fail to decode are skipped.
    fn list_by_parent<T>(&self, key: &DynamicKey) -> impl Future<Output = Result<Vec<T>>> + Send
    where
        T: DeserializeOwned;
}

impl<S: FileStore + ?Sized> FileStoreExt for S {
    async fn get<T>(&self, key: &DynamicKey) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        match self.get_raw(key).await? {
            Some(raw) => decode(key.full_path(), &raw).map(Some),
            None => Ok(None),
        }
    }

    async fn get_or_default<T>(&self, key: &DynamicKey, default: T) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Send,
    {
        match self.get_raw(key).await? {
            Some(raw) => decode(key.full_path(), &raw),
            None => {
                self.set_raw(key, encode(&default)?).await?;
                Ok(default)
            }
        }
    }

    async fn set<T>(&self, key: &DynamicKey, value: &T) -> Result<()>
    where
        T: Serialize + Sync + ?Sized,
    {
        let json = encode(value)?;
        self.set_raw(key, json).await
    }

    async fn list_by_parent<T>(&self, key: &DynamicKey) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let entries = self.list_raw(key).await?;
        let parent = key.parent_path();

        let values = entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_str(&entry.contents) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!(parent, entry = %entry.name, error = %e, "skipping malformed entry");
                    None
                }
            })
            .collect();

        Ok(values)
    }
}
