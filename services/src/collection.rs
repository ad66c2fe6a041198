//! Reactive, write-through collections over an [`AppStore`]
//!
//! A [`CollectionStore`] keeps one observable in-memory collection per
//! namespace. The first access to a namespace hydrates it from durable
//! storage; after that every mutation changes the in-memory snapshot first
//! and then persists the change before the call returns.

use crate::app_store::AppStore;
use cstudio_store::{
    DynamicKey, FileStore, FileStoreExt, FlatStoreExt, Readable, Result, StoreKeys, Writable,
};
use serde::{Serialize, de::DeserializeOwned};
use std::collections::HashMap;
use std::iter;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// An item a [`CollectionStore`] can hold
pub trait Entity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Stable identifier; empty until the store assigns one
    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);

    /// Epoch milliseconds of the last change, used to order hydrated items
    fn last_modified(&self) -> i64;

    /// Temporary entities stay in memory and are never persisted
    fn is_temporary(&self) -> bool {
        false
    }
}

/// How a collection is laid out in durable storage
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layout {
    /// One file per entity at `<prefix>:<namespace...>:<id>`
    PerEntity { prefix: &'static str },
    /// The whole collection as one JSON array under a fixed key
    Aggregate { key: StoreKeys },
}

/// Writable collection and its read-only projection
struct Collection<E> {
    writable: Writable<Vec<E>>,
    readable: Readable<Vec<E>>,
}

/// Observable collections of `E`, one per namespace
///
/// A namespace is an ordered list of key segments, e.g. `[connection, database]`
/// for consoles. Aggregate collections are global and use the empty namespace.
pub struct CollectionStore<E> {
    store: Arc<AppStore>,
    files: Arc<dyn FileStore>,
    layout: Layout,
    collections: Mutex<HashMap<String, Arc<Collection<E>>>>,
}

impl<E> std::fmt::Debug for CollectionStore<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CollectionStore {{ layout: {:?} }}", self.layout)
    }
}

impl<E: Entity> CollectionStore<E> {
    pub fn new(store: Arc<AppStore>, layout: Layout) -> Self {
        let files = store.file_store();
        Self {
            store,
            files,
            layout,
            collections: Mutex::new(HashMap::new()),
        }
    }

    /// The read-only projection of a namespace, hydrating it on first access
    pub async fn collection(&self, namespace: &[&str]) -> Result<Readable<Vec<E>>> {
        Ok(self.load(namespace).await?.readable.clone())
    }

    /// Append `entity`, assigning an id if it has none, and persist it
    pub async fn add(&self, namespace: &[&str], mut entity: E) -> Result<E> {
        if entity.id().is_empty() {
            entity.set_id(Uuid::new_v4().to_string());
        }

        let collection = self.load(namespace).await?;
        collection.writable.update(|items| items.push(entity.clone()));

        match self.layout {
            Layout::PerEntity { .. } => self.persist_entity(namespace, &entity).await?,
            Layout::Aggregate { key } => self.persist_all(key, &collection).await?,
        }

        Ok(entity)
    }

    /// Replace the entity with the same id
    ///
    /// Returns `false` without touching memory or storage when no entity
    /// has that id.
    pub async fn update(&self, namespace: &[&str], entity: E) -> Result<bool> {
        let collection = self.load(namespace).await?;

        let replaced = collection.writable.update_if(|items| {
            match items.iter_mut().find(|item| item.id() == entity.id()) {
                Some(slot) => {
                    *slot = entity.clone();
                    true
                }
                None => false,
            }
        });

        if !replaced {
            return Ok(false);
        }

        match self.layout {
            Layout::PerEntity { .. } => self.persist_entity(namespace, &entity).await?,
            Layout::Aggregate { key } => self.persist_all(key, &collection).await?,
        }

        Ok(true)
    }

    /// Remove the entity with `id` from memory and from durable storage
    ///
    /// Returns whether the entity was in memory.
    pub async fn remove(&self, namespace: &[&str], id: &str) -> Result<bool> {
        let collection = self.load(namespace).await?;

        let removed = collection.writable.update_if(|items| {
            let before = items.len();
            items.retain(|item| item.id() != id);
            items.len() != before
        });

        match self.layout {
            Layout::PerEntity { prefix } => {
                self.files.remove(&entity_key(prefix, namespace, id)).await?;
            }
            Layout::Aggregate { key } if removed => self.persist_all(key, &collection).await?,
            Layout::Aggregate { .. } => {}
        }

        Ok(removed)
    }

    /// Look up an entity by id
    ///
    /// Per-entity collections fall back to durable storage on a miss and put
    /// the entity found there back into memory.
    pub async fn get(&self, namespace: &[&str], id: &str) -> Result<Option<E>> {
        let collection = self.load(namespace).await?;

        if let Some(found) = collection.writable.get().iter().find(|item| item.id() == id) {
            return Ok(Some(found.clone()));
        }

        let Layout::PerEntity { prefix } = self.layout else {
            return Ok(None);
        };

        let Some(stored) = self.files.get::<E>(&entity_key(prefix, namespace, id)).await? else {
            return Ok(None);
        };

        tracing::debug!(id, "restored entity from storage");
        collection.writable.update_if(|items| {
            if items.iter().any(|item| item.id() == stored.id()) {
                return false;
            }
            items.push(stored.clone());
            true
        });

        Ok(Some(stored))
    }

    /// Number of namespaces hydrated so far
    pub async fn loaded_namespaces(&self) -> usize {
        self.collections.lock().await.len()
    }

    async fn load(&self, namespace: &[&str]) -> Result<Arc<Collection<E>>> {
        let listing_key = self.listing_key(namespace);
        let mut collections = self.collections.lock().await;

        if let Some(collection) = collections.get(listing_key.full_path()) {
            return Ok(Arc::clone(collection));
        }

        let items = self.hydrate(&listing_key).await?;
        tracing::debug!(namespace = %listing_key.parent_path(), items = items.len(), "hydrated collection");

        let writable = Writable::new(items);
        let readable = writable.readonly();
        let collection = Arc::new(Collection { writable, readable });
        collections.insert(listing_key.full_path().to_string(), Arc::clone(&collection));

        Ok(collection)
    }

    async fn hydrate(&self, listing_key: &DynamicKey) -> Result<Vec<E>> {
        match self.layout {
            Layout::PerEntity { .. } => {
                let mut items: Vec<E> = self.files.list_by_parent(listing_key).await?;
                items.sort_by_key(|item| item.last_modified());
                Ok(items)
            }
            Layout::Aggregate { key } => self.store.get_or_default(key, Vec::new()).await,
        }
    }

    /// Key whose parent path is the namespace "folder"
    fn listing_key(&self, namespace: &[&str]) -> DynamicKey {
        let prefix = match self.layout {
            Layout::PerEntity { prefix } => prefix,
            Layout::Aggregate { key } => key.as_str(),
        };
        entity_key(prefix, namespace, "all")
    }

    async fn persist_entity(&self, namespace: &[&str], entity: &E) -> Result<()> {
        let Layout::PerEntity { prefix } = self.layout else {
            return Ok(());
        };

        let key = entity_key(prefix, namespace, entity.id());
        if entity.is_temporary() {
            self.files.remove(&key).await
        } else {
            self.files.set(&key, entity).await
        }
    }

    async fn persist_all(&self, key: StoreKeys, collection: &Collection<E>) -> Result<()> {
        let snapshot = collection.writable.get();
        let durable: Vec<&E> = snapshot.iter().filter(|item| !item.is_temporary()).collect();
        self.store.set(key, &durable).await
    }
}

fn entity_key(prefix: &str, namespace: &[&str], id: &str) -> DynamicKey {
    DynamicKey::of(namespace.iter().copied().chain(iter::once(id)), Some(prefix))
}
