//! Interfaces of the services this crate hands data to or takes data from

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A database as listed by the remote service
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseInfo {
    pub name: String,
    pub unique_id: String,
    pub last_updated: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreateResponse {
    pub status: u16,
    pub reason: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub status: u16,
    pub message: Option<String>,
}

/// First page of a query and the cursor to continue from
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QueryPage {
    pub status: u16,
    pub page: Vec<Value>,
    pub cursor: Option<String>,
}

/// The remote document database, as seen from the storage layer
#[async_trait]
pub trait RemoteDatabase: Send + Sync {
    async fn list(&self) -> Vec<DatabaseInfo>;

    async fn create(&self, name: &str) -> CreateResponse;

    async fn delete(&self, name: &str) -> DeleteResponse;

    async fn query(&self, text: &str, page_size: usize) -> QueryPage;

    async fn query_next(&self, cursor: &str) -> Vec<Value>;
}

/// Options understood by an [`Exporter`]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExportOptions {
    pub as_zip: bool,
    pub zip_name: Option<String>,
    pub save_directory: Option<String>,
    pub ignore_azure_metadata: bool,
    /// Write each array element to its own file
    pub save_individually: bool,
    /// Property naming each file when saving individually, `id` when unset
    pub file_identifier_property: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportResponse {
    Success,
    NoData,
    NoPath,
}

/// Writes exported data somewhere outside the store
#[async_trait]
pub trait Exporter: Send + Sync {
    async fn export(&self, data: Value, options: &ExportOptions) -> ExportResponse;
}
