//! Backend selection

use async_trait::async_trait;
use cstudio_local_store::{LocalFileStore, LocalStorage, LocalStore};
use cstudio_native_store::{NativeFileStore, NativeStore, config_dir, data_dir, project_dirs};
use cstudio_store::{AppName, FileStore, FlatStore, Result, StoreKey};
use std::path::PathBuf;
use std::sync::Arc;

/// Which medium an [`AppStore`] persists to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendKind {
    Local,
    Native,
}

/// The storage medium to open
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Backend {
    /// One flat namespace, persisted to `path` or kept in memory when `None`
    Local { path: Option<PathBuf> },
    /// Backing files in `config_dir`, file-like entries under `data_dir`
    Native { config_dir: PathBuf, data_dir: PathBuf },
}

impl Backend {
    /// Pick the backend the current environment supports
    ///
    /// Native storage is used whenever the platform resolves project
    /// directories for `app_name`. Without them there is nowhere durable to
    /// write, and the session falls back to in-memory local storage.
    pub fn detect(app_name: &AppName) -> Self {
        match project_dirs(app_name) {
            Some(_) => Backend::Native {
                config_dir: config_dir(app_name),
                data_dir: data_dir(app_name),
            },
            None => Backend::Local { path: None },
        }
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            Backend::Local { .. } => BackendKind::Local,
            Backend::Native { .. } => BackendKind::Native,
        }
    }
}

/// The process-wide store: a flat store and its matching file store
///
/// Both halves always sit on the same medium. The backend is chosen once, when
/// the store is opened, and never re-checked.
pub struct AppStore {
    kind: BackendKind,
    flat: Arc<dyn FlatStore>,
    files: Arc<dyn FileStore>,
}

impl std::fmt::Debug for AppStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AppStore {{ kind: {:?} }}", self.kind)
    }
}

impl AppStore {
    /// Open the given backend
    ///
    /// # Errors
    ///
    /// Returns an error if a persisted local storage file exists but cannot be
    /// read or parsed.
    pub async fn open(backend: Backend) -> Result<Self> {
        let store = match backend {
            Backend::Local { path } => {
                let storage = match path {
                    Some(path) => LocalStorage::open(path).await?,
                    None => LocalStorage::in_memory(),
                };
                Self::local(Arc::new(storage))
            }
            Backend::Native {
                config_dir,
                data_dir,
            } => Self {
                kind: BackendKind::Native,
                flat: Arc::new(NativeStore::new(config_dir)),
                files: Arc::new(NativeFileStore::new(data_dir)),
            },
        };

        tracing::debug!(kind = ?store.kind, "opened application store");
        Ok(store)
    }

    /// A local store over an already opened namespace
    pub fn local(storage: Arc<LocalStorage>) -> Self {
        Self {
            kind: BackendKind::Local,
            flat: Arc::new(LocalStore::new(Arc::clone(&storage))),
            files: Arc::new(LocalFileStore::new(storage)),
        }
    }

    /// A volatile local store, mostly useful in tests
    pub fn in_memory() -> Self {
        Self::local(Arc::new(LocalStorage::in_memory()))
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.kind
    }

    /// The file store on the same medium as this store
    pub fn file_store(&self) -> Arc<dyn FileStore> {
        Arc::clone(&self.files)
    }
}

#[async_trait]
impl FlatStore for AppStore {
    async fn get_raw(&self, key: &StoreKey) -> Result<Option<String>> {
        self.flat.get_raw(key).await
    }

    async fn set_raw(&self, key: &StoreKey, value: String) -> Result<()> {
        self.flat.set_raw(key, value).await
    }

    async fn remove(&self, key: &StoreKey) -> Result<()> {
        self.flat.remove(key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cstudio_store::{DynamicKey, FileStoreExt, FlatStoreExt, StoreKeys};

    #[tokio::test]
    async fn native_backend_splits_config_and_data() {
        let dir = tempfile::tempdir().unwrap();
        let store = AppStore::open(Backend::Native {
            config_dir: dir.path().join("config"),
            data_dir: dir.path().join("data"),
        })
        .await
        .unwrap();
        assert_eq!(store.backend_kind(), BackendKind::Native);

        store.set(StoreKeys::History, &vec![1]).await.unwrap();
        let key = DynamicKey::of(["c", "db", "id"], Some("console"));
        store.file_store().set(&key, &"body").await.unwrap();

        assert!(dir.path().join("config").join(".interstr.cst").is_file());
        assert!(dir.path().join("data/console/c/db/id").is_file());
    }

    #[tokio::test]
    async fn local_backend_shares_one_namespace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local-storage.json");
        let store = AppStore::open(Backend::Local {
            path: Some(path.clone()),
        })
        .await
        .unwrap();
        assert_eq!(store.backend_kind(), BackendKind::Local);

        let key = DynamicKey::of(["c", "db", "id"], Some("console"));
        store.file_store().set(&key, &"body").await.unwrap();
        assert_eq!(store.get::<String>(&key).await.unwrap().as_deref(), Some("body"));

        let reopened = AppStore::open(Backend::Local { path: Some(path) }).await.unwrap();
        assert_eq!(
            reopened.file_store().get::<String>(&key).await.unwrap().as_deref(),
            Some("body")
        );
    }

    #[test]
    fn detect_follows_platform_directories() {
        let app_name = AppName::default();

        match (project_dirs(&app_name), Backend::detect(&app_name)) {
            (
                Some(dirs),
                Backend::Native {
                    config_dir: config,
                    data_dir: data,
                },
            ) => {
                assert!(config.starts_with(dirs.config_local_dir()));
                assert!(data.starts_with(dirs.data_local_dir()));
                assert_eq!(config, config_dir(&app_name));
                assert_eq!(data, data_dir(&app_name));
            }
            (None, Backend::Local { path: None }) => {}
            _ => panic!("selected backend does not match the platform directories"),
        }
    }

    #[test]
    fn backend_kind_matches_variant() {
        assert_eq!(Backend::Local { path: None }.kind(), BackendKind::Local);
        let native = Backend::Native {
            config_dir: PathBuf::from("c"),
            data_dir: PathBuf::from("d"),
        };
        assert_eq!(native.kind(), BackendKind::Native);
    }
}
