//! Saved connection profiles and connection history

use crate::app_store::AppStore;
use crate::collaborators::RemoteDatabase;
use crate::collection::{CollectionStore, Layout};
use crate::schema::ConnectionSchema;
use cstudio_store::{Readable, Result, StoreKeys};
use std::sync::Arc;

const GLOBAL: &[&str] = &[];

/// Saved connections, persisted as one array under
/// [`StoreKeys::SavedConnections`]
///
/// Temporary connections are listed alongside saved ones but never written.
#[derive(Debug)]
pub struct ConnectionService {
    connections: CollectionStore<ConnectionSchema>,
}

impl ConnectionService {
    pub fn new(store: Arc<AppStore>) -> Self {
        Self {
            connections: CollectionStore::new(
                store,
                Layout::Aggregate {
                    key: StoreKeys::SavedConnections,
                },
            ),
        }
    }

    pub async fn saved(&self) -> Result<Readable<Vec<ConnectionSchema>>> {
        self.connections.collection(GLOBAL).await
    }

    pub async fn add(&self, connection: ConnectionSchema) -> Result<ConnectionSchema> {
        self.connections.add(GLOBAL, connection).await
    }

    /// Replace the saved connection with the same id; `false` if there is none
    pub async fn update(&self, connection: ConnectionSchema) -> Result<bool> {
        self.connections.update(GLOBAL, connection).await
    }

    pub async fn get(&self, id: &str) -> Result<Option<ConnectionSchema>> {
        self.connections.get(GLOBAL, id).await
    }

    pub async fn remove(&self, id: &str) -> Result<bool> {
        self.connections.remove(GLOBAL, id).await
    }

    /// Reconcile a connection's databases with what the server reports
    ///
    /// Returns the updated connection, or `None` if `id` is unknown.
    pub async fn refresh_databases(
        &self,
        id: &str,
        remote: &dyn RemoteDatabase,
    ) -> Result<Option<ConnectionSchema>> {
        let Some(mut connection) = self.get(id).await? else {
            return Ok(None);
        };

        let names: Vec<String> = remote.list().await.into_iter().map(|db| db.name).collect();
        connection.update_databases(&names);
        self.update(connection.clone()).await?;

        tracing::debug!(id, databases = connection.databases.len(), "refreshed databases");
        Ok(Some(connection))
    }
}

/// Recently opened connections, persisted as one array under
/// [`StoreKeys::History`]
#[derive(Debug)]
pub struct HistoryService {
    entries: CollectionStore<ConnectionSchema>,
}

impl HistoryService {
    pub fn new(store: Arc<AppStore>) -> Self {
        Self {
            entries: CollectionStore::new(
                store,
                Layout::Aggregate {
                    key: StoreKeys::History,
                },
            ),
        }
    }

    pub async fn entries(&self) -> Result<Readable<Vec<ConnectionSchema>>> {
        self.entries.collection(GLOBAL).await
    }

    pub async fn add(&self, connection: ConnectionSchema) -> Result<ConnectionSchema> {
        self.entries.add(GLOBAL, connection).await
    }

    pub async fn remove(&self, id: &str) -> Result<bool> {
        self.entries.remove(GLOBAL, id).await
    }
}
