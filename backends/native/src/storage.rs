//! On-disk locations and backing-store file operations

use cstudio_store::{AppName, Result, StoreError};
use directories::ProjectDirs;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Resolve the platform directories for the application, if the platform has any
pub fn project_dirs(app_name: &AppName) -> Option<ProjectDirs> {
    ProjectDirs::from(
        app_name.qualifier.as_str(),
        app_name.organization.as_str(),
        app_name.application.as_str(),
    )
}

/// Directory holding the flat backing stores (`<name>.cst` files)
///
/// Uses platform-specific conventions:
/// - Linux: `$XDG_CONFIG_HOME/<app>/store` or `~/.config/<app>/store`
/// - macOS: `~/Library/Application Support/<app>/store`
/// - Windows: `%LOCALAPPDATA%\<app>\config\store`
pub fn config_dir(app_name: &AppName) -> PathBuf {
    project_dirs(app_name)
        .map(|dirs| dirs.config_local_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
        .join("store")
}

/// Root directory of the file store
pub fn data_dir(app_name: &AppName) -> PathBuf {
    project_dirs(app_name)
        .map(|dirs| dirs.data_local_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
        .join("files")
}

/// Load a backing store file
///
/// Returns an empty map if the file doesn't exist or is empty.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub(crate) async fn load_entries(path: &Path) -> Result<HashMap<String, String>> {
    let contents = match fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
        Err(e) => return Err(StoreError::io(path, e)),
    };

    if contents.is_empty() {
        return Ok(HashMap::new());
    }

    serde_json::from_str(&contents)
        .map_err(|e| StoreError::deserialize(path.display().to_string(), e))
}

/// Save a backing store file, creating its directory if needed
pub(crate) async fn save_entries(path: &Path, entries: &HashMap<String, String>) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| StoreError::io(parent, e))?;
    }

    let contents = serde_json::to_string_pretty(entries).map_err(StoreError::Serialize)?;

    fs::write(path, contents)
        .await
        .map_err(|e| StoreError::io(path, e))
}

/// Load a backing store, apply `modifier`, and save it back if it reports a change
pub(crate) async fn modify_entries<F>(path: &Path, modifier: F) -> Result<bool>
where
    F: FnOnce(&mut HashMap<String, String>) -> bool,
{
    let mut entries = load_entries(path).await?;
    let modified = modifier(&mut entries);

    if modified {
        save_entries(path, &entries).await?;
    }

    Ok(modified)
}
