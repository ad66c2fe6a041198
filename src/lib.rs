//! Storage core for the cstudio desktop client
//!
//! Settings, connection profiles, consoles and history are persisted through
//! two kinds of stores that every backend provides:
//!
//! - a [`FlatStore`]: key to JSON value, addressed by a fixed [`StoreKeys`]
//!   value or a [`DynamicKey`]
//! - a [`FileStore`]: file-like entries addressed by [`DynamicKey`], where all
//!   entries sharing a parent path can be listed together
//!
//! In-memory projections of stored collections are published through
//! [`Writable`] and [`Readable`].
//!
//! # Example
//!
//! ```ignore
//! use cstudio_store::{DynamicKey, FileStoreExt};
//!
//! async fn list_consoles(files: &dyn cstudio_store::FileStore) -> cstudio_store::Result<()> {
//!     let key = DynamicKey::of(["conn-a", "db-x", "all"], Some("console"));
//!     let consoles: Vec<serde_json::Value> = files.list_by_parent(&key).await?;
//!     println!("{} consoles", consoles.len());
//!     Ok(())
//! }
//! ```

mod app_name;
mod error;
mod key;
mod observable;
mod store;

pub use app_name::AppName;
pub use error::{Result, StoreError};
pub use key::{DEFAULT_PREFIX, DELIMITER, DynamicKey, StoreKey, StoreKeys};
pub use observable::{Readable, Writable};
pub use store::{FileStore, FileStoreExt, FlatStore, FlatStoreExt, RawEntry};
