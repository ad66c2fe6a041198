//! Native storage backend
//!
//! Persists data the way the desktop build of the client does:
//!
//! - flat values go to backing files in the platform config directory, one
//!   file per key prefix (`<prefix>.cst`), with fixed keys sharing `.interstr.cst`
//! - file-like entries go to a directory tree in the platform data directory,
//!   one file per entry, so a "folder" listing is a real directory listing
//!
//! # Example
//!
//! ```ignore
//! use cstudio_native_store::{NativeFileStore, NativeStore};
//! use cstudio_store::AppName;
//!
//! let app_name = AppName::new("com", "cstudio", "cosmos-studio");
//! let store = NativeStore::for_app(&app_name);
//! let files = NativeFileStore::for_app(&app_name);
//! ```

mod files;
mod flat;
mod storage;
#[cfg(test)]
mod test_support;

pub use files::NativeFileStore;
pub use flat::{BackingStore, INTERNAL_STORE, NativeStore};
pub use storage::{config_dir, data_dir, project_dirs};
