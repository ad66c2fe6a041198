//! Error type shared by every store backend

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Failures surfaced by the stores
///
/// A missing key is never an error: reads return `None` and listings return
/// an empty `Vec`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying medium failed (permissions, disk full, ...)
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize value: {0}")]
    Serialize(#[source] serde_json::Error),

    /// A stored entry could not be decoded into the requested type
    #[error("failed to deserialize value at '{key}': {source}")]
    Deserialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid key '{0}'")]
    InvalidKey(String),
}

impl StoreError {
    /// Wrap a decoding failure with the key it happened at
    pub fn deserialize(key: impl Into<String>, source: serde_json::Error) -> Self {
        StoreError::Deserialize {
            key: key.into(),
            source,
        }
    }

    /// Wrap an I/O error with the path it happened at
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}
