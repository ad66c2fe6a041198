use crate::app_store::{AppStore, Backend};
use crate::connection::{ConnectionService, HistoryService};
use crate::console::ConsoleService;
use crate::settings::SettingsService;
use cstudio_store::Result;
use std::sync::Arc;

/// One application store and the services built on it
///
/// Every service holds its own collections; build one context per process
/// (or per test) and share it.
#[derive(Debug)]
pub struct StoreContext {
    store: Arc<AppStore>,
    consoles: ConsoleService,
    connections: ConnectionService,
    history: HistoryService,
    settings: SettingsService,
}

impl StoreContext {
    pub fn new(store: AppStore) -> Self {
        let store = Arc::new(store);
        Self {
            consoles: ConsoleService::new(Arc::clone(&store)),
            connections: ConnectionService::new(Arc::clone(&store)),
            history: HistoryService::new(Arc::clone(&store)),
            settings: SettingsService::new(Arc::clone(&store)),
            store,
        }
    }

    pub async fn open(backend: Backend) -> Result<Self> {
        Ok(Self::new(AppStore::open(backend).await?))
    }

    /// Hydrate the global collections and settings
    pub async fn restore(&self) -> Result<()> {
        self.connections.saved().await?;
        self.history.entries().await?;
        self.settings.settings().await?;
        tracing::debug!(kind = ?self.store.backend_kind(), "restored stored state");
        Ok(())
    }

    pub fn store(&self) -> &Arc<AppStore> {
        &self.store
    }

    pub fn consoles(&self) -> &ConsoleService {
        &self.consoles
    }

    pub fn connections(&self) -> &ConnectionService {
        &self.connections
    }

    pub fn history(&self) -> &HistoryService {
        &self.history
    }

    pub fn settings(&self) -> &SettingsService {
        &self.settings
    }
}
