//! Application settings

use crate::app_store::AppStore;
use crate::schema::AppSettings;
use cstudio_store::{FlatStoreExt, Readable, Result, StoreError, StoreKeys, Writable};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// The single [`AppSettings`] value, persisted under [`StoreKeys::AppSettings`]
#[derive(Debug)]
pub struct SettingsService {
    store: Arc<AppStore>,
    settings: OnceCell<Writable<AppSettings>>,
}

impl SettingsService {
    pub fn new(store: Arc<AppStore>) -> Self {
        Self {
            store,
            settings: OnceCell::new(),
        }
    }

    /// The current settings, written with defaults on first read
    pub async fn settings(&self) -> Result<Readable<AppSettings>> {
        Ok(self.load().await?.readonly())
    }

    pub async fn set_resizable_size(&self, value: f64) -> Result<()> {
        let settings = self.load().await?;
        settings.update(|s| s.resizable_size = value);
        self.store.set(StoreKeys::AppSettings, &*settings.get()).await
    }

    async fn load(&self) -> Result<&Writable<AppSettings>> {
        self.settings
            .get_or_try_init(|| async {
                let stored = self
                    .store
                    .get_or_default(StoreKeys::AppSettings, AppSettings::default())
                    .await?;
                Ok::<_, StoreError>(Writable::new(stored))
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn defaults_are_written_on_first_read() {
        let store = Arc::new(AppStore::in_memory());
        let service = SettingsService::new(Arc::clone(&store));

        assert_eq!(service.settings().await.unwrap().get().resizable_size, 22.0);
        let stored: Option<AppSettings> = store.get(StoreKeys::AppSettings).await.unwrap();
        assert_eq!(stored, Some(AppSettings::default()));
    }

    #[tokio::test]
    async fn resizable_size_is_published_and_persisted() {
        let store = Arc::new(AppStore::in_memory());
        let service = SettingsService::new(Arc::clone(&store));
        let settings = service.settings().await.unwrap();
        let mut changes = settings.subscribe();

        service.set_resizable_size(35.5).await.unwrap();

        assert!(changes.has_changed().unwrap());
        assert_eq!(settings.get().resizable_size, 35.5);

        let reopened = SettingsService::new(store);
        assert_eq!(reopened.settings().await.unwrap().get().resizable_size, 35.5);
    }
}
