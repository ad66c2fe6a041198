//! File store mapped onto a real directory tree

use async_trait::async_trait;
use cstudio_store::{AppName, DynamicKey, FileStore, RawEntry, Result, StoreError};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// File store rooted at a directory
///
/// Every key component becomes one path component: the key
/// `console:conn:db:id` is the file `<root>/console/conn/db/id`.
#[derive(Clone, Debug)]
pub struct NativeFileStore {
    root: PathBuf,
}

/// Where a key lives on disk
struct Location {
    dir: PathBuf,
    file: PathBuf,
}

impl NativeFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// A file store in the application's platform data directory
    pub fn for_app(app_name: &AppName) -> Self {
        Self::new(crate::storage::data_dir(app_name))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn locate(&self, key: &DynamicKey) -> Result<Location> {
        let mut dir = self.root.clone();
        let mut components = key.components().peekable();

        while let Some(component) = components.next() {
            if !is_valid_component(component) {
                return Err(StoreError::InvalidKey(key.full_path().to_string()));
            }
            if components.peek().is_none() {
                let file = dir.join(component);
                return Ok(Location { dir, file });
            }
            dir.push(component);
        }

        Err(StoreError::InvalidKey(key.full_path().to_string()))
    }
}

fn is_valid_component(component: &str) -> bool {
    !component.is_empty()
        && component != "."
        && component != ".."
        && !component.contains(['/', '\\'])
}

#[async_trait]
impl FileStore for NativeFileStore {
    async fn get_raw(&self, key: &DynamicKey) -> Result<Option<String>> {
        let location = self.locate(key)?;

        match fs::read_to_string(&location.file).await {
            Ok(contents) if contents.is_empty() => Ok(None),
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(location.file, e)),
        }
    }

    async fn set_raw(&self, key: &DynamicKey, value: String) -> Result<()> {
        let location = self.locate(key)?;

        fs::create_dir_all(&location.dir)
            .await
            .map_err(|e| StoreError::io(&location.dir, e))?;

        fs::write(&location.file, value)
            .await
            .map_err(|e| StoreError::io(&location.file, e))?;

        tracing::debug!(path = %location.file.display(), "wrote entry");
        Ok(())
    }

    async fn remove(&self, key: &DynamicKey) -> Result<()> {
        let location = self.locate(key)?;

        match fs::remove_file(&location.file).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(location.file, e)),
        }
    }

    async fn list_raw(&self, key: &DynamicKey) -> Result<Vec<RawEntry>> {
        let location = self.locate(key)?;

        let mut dir = match fs::read_dir(&location.dir).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(location.dir, e)),
        };

        let mut entries = Vec::new();
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| StoreError::io(&location.dir, e))?
        {
            let path = entry.path();
            match entry.file_type().await {
                Ok(file_type) if file_type.is_file() => {}
                Ok(_) => continue,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping entry of unknown type");
                    continue;
                }
            }

            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                tracing::warn!(path = %path.display(), "skipping entry with non UTF-8 name");
                continue;
            };

            if let Some(contents) = read_entry(&path).await {
                entries.push(RawEntry { name, contents });
            }
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

/// Contents of one listed file; `None` when it is empty or cannot be read
async fn read_entry(path: &Path) -> Option<String> {
    match fs::read_to_string(path).await {
        Ok(contents) if contents.is_empty() => None,
        Ok(contents) => Some(contents),
        // Removed between listing and reading
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) if e.kind() == ErrorKind::InvalidData => {
            tracing::warn!(path = %path.display(), "skipping entry that is not UTF-8");
            None
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "skipping unreadable entry");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{block_on, ids_and_removals, json_value};
    use cstudio_store::FileStoreExt;
    use proptest::prelude::*;
    use serde_json::Value;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Console {
        id: String,
        name: String,
    }

    fn console(id: &str) -> Console {
        Console {
            id: id.to_string(),
            name: format!("console-{id}"),
        }
    }

    fn key(id: &str) -> DynamicKey {
        DynamicKey::of(["conn-a", "db-x", id], Some("console"))
    }

    #[tokio::test]
    async fn keys_map_to_nested_files() {
        let dir = tempfile::tempdir().unwrap();
        let files = NativeFileStore::new(dir.path());

        files.set(&key("1"), &console("1")).await.unwrap();

        let path = dir.path().join("console").join("conn-a").join("db-x").join("1");
        assert!(path.is_file());
        assert_eq!(files.get::<Console>(&key("1")).await.unwrap(), Some(console("1")));
    }

    #[tokio::test]
    async fn three_consoles_then_remove_one() {
        let dir = tempfile::tempdir().unwrap();
        let files = NativeFileStore::new(dir.path());

        for id in ["a", "b", "c"] {
            files.set(&key(id), &console(id)).await.unwrap();
        }
        let listed: Vec<Console> = files.list_by_parent(&key("all")).await.unwrap();
        assert_eq!(listed, vec![console("a"), console("b"), console("c")]);

        files.remove(&key("b")).await.unwrap();
        let listed: Vec<Console> = files.list_by_parent(&key("all")).await.unwrap();
        assert_eq!(listed, vec![console("a"), console("c")]);
    }

    #[tokio::test]
    async fn listing_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let files = NativeFileStore::new(dir.path().join("never-created"));

        let listed: Vec<Console> = files.list_by_parent(&key("all")).await.unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn listing_skips_directories_and_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        let files = NativeFileStore::new(dir.path());

        files.set(&key("good"), &console("good")).await.unwrap();
        files.set_raw(&key("bad"), "{ nope".to_string()).await.unwrap();
        files
            .set(&DynamicKey::of(["conn-a", "db-x", "sub", "deep"], Some("console")), &console("deep"))
            .await
            .unwrap();

        let listed: Vec<Console> = files.list_by_parent(&key("all")).await.unwrap();
        assert_eq!(listed, vec![console("good")]);
    }

    #[tokio::test]
    async fn missing_and_removed_entries_read_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let files = NativeFileStore::new(dir.path());

        assert_eq!(files.get::<Console>(&key("x")).await.unwrap(), None);
        files.remove(&key("x")).await.unwrap();

        files.set(&key("x"), &console("x")).await.unwrap();
        files.remove(&key("x")).await.unwrap();
        assert_eq!(files.get::<Console>(&key("x")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn get_or_default_creates_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let files = NativeFileStore::new(dir.path());

        let value = files.get_or_default(&key("d"), console("d")).await.unwrap();
        assert_eq!(value, console("d"));
        assert!(dir.path().join("console/conn-a/db-x/d").is_file());
    }

    #[tokio::test]
    async fn rejects_keys_escaping_the_root() {
        let dir = tempfile::tempdir().unwrap();
        let files = NativeFileStore::new(dir.path());

        let escaping = DynamicKey::of(["..", "etc"], Some("console"));
        let err = files.set(&escaping, &console("x")).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidKey(_)));

        let dotted = DynamicKey::of(["conn", ".", "id"], Some("console"));
        let err = files.get::<Console>(&dotted).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidKey(_)));
    }

    #[tokio::test]
    async fn trailing_separator_in_a_segment_stays_one_folder() {
        let dir = tempfile::tempdir().unwrap();
        let files = NativeFileStore::new(dir.path());

        let slashed = DynamicKey::of(["conn-a", "db-x/", "1"], Some("console"));
        files.set(&slashed, &console("1")).await.unwrap();

        assert!(dir.path().join("console/conn-a/db-x/1").is_file());
        let listed: Vec<Console> = files.list_by_parent(&key("all")).await.unwrap();
        assert_eq!(listed, vec![console("1")]);
    }

    #[tokio::test]
    async fn unreadable_entry_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("entry");
        std::fs::write(&file, "{}").unwrap();

        assert_eq!(read_entry(&file).await.as_deref(), Some("{}"));
        assert_eq!(read_entry(&dir.path().join("gone")).await, None);
        // Reading a directory fails with neither NotFound nor InvalidData
        assert_eq!(read_entry(dir.path()).await, None);

        std::fs::write(&file, [0xff, 0xfe]).unwrap();
        assert_eq!(read_entry(&file).await, None);
    }

    #[tokio::test]
    async fn failed_directory_creation_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let files = NativeFileStore::new(dir.path());

        // A regular file where the parent directory should be
        std::fs::write(dir.path().join("console"), "occupied").unwrap();

        let err = files.set(&key("1"), &console("1")).await.unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
        assert_eq!(std::fs::read_to_string(dir.path().join("console")).unwrap(), "occupied");
    }

    proptest! {
        #[test]
        fn any_value_round_trips(value in json_value(), name in "[a-z]{1,6}") {
            let dir = tempfile::tempdir().unwrap();
            let files = NativeFileStore::new(dir.path());

            let loaded = block_on(async {
                files.set(&key(&name), &value).await.unwrap();
                files.get::<Value>(&key(&name)).await.unwrap()
            });

            prop_assert_eq!(loaded, Some(value));
        }

        #[test]
        fn listing_holds_sets_minus_removes((ids, removed) in ids_and_removals()) {
            let dir = tempfile::tempdir().unwrap();
            let files = NativeFileStore::new(dir.path());

            let listed: Vec<Console> = block_on(async {
                for id in &ids {
                    files.set(&key(id), &console(id)).await.unwrap();
                }
                for id in &removed {
                    files.remove(&key(id)).await.unwrap();
                }
                files.list_by_parent(&key("all")).await.unwrap()
            });

            let listed_ids: Vec<String> = listed.into_iter().map(|c| c.id).collect();
            let mut expected: Vec<String> = ids.into_iter().filter(|id| !removed.contains(id)).collect();
            expected.sort();
            prop_assert_eq!(listed_ids, expected);
        }
    }
}
