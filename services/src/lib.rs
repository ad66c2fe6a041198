//! Application-level stores for the cstudio client
//!
//! [`AppStore`] picks the storage medium once. The services on top keep
//! observable in-memory collections that are hydrated on first access and
//! written through on every change:
//!
//! - [`ConsoleService`]: one file per console, grouped by connection and database
//! - [`ConnectionService`] and [`HistoryService`]: one JSON array each
//! - [`SettingsService`]: a single settings value
//!
//! [`StoreContext`] wires all of them to one store.

mod app_store;
mod collaborators;
mod collection;
mod connection;
mod console;
mod context;
mod schema;
mod settings;

pub use app_store::{AppStore, Backend, BackendKind};
pub use collaborators::{
    CreateResponse, DatabaseInfo, DeleteResponse, ExportOptions, ExportResponse, Exporter, QueryPage,
    RemoteDatabase,
};
pub use collection::{CollectionStore, Entity, Layout};
pub use connection::{ConnectionService, HistoryService};
pub use console::{CONSOLE_PREFIX, ConsoleService};
pub use context::StoreContext;
pub use schema::{AppSettings, BadgeColor, ConnectionSchema, Console, ConsoleType, now_millis};
pub use settings::SettingsService;
