//! Query consoles, one collection per connection and database

use crate::app_store::AppStore;
use crate::collaborators::{ExportOptions, ExportResponse, Exporter};
use crate::collection::{CollectionStore, Layout};
use crate::schema::{Console, ConsoleType, now_millis};
use cstudio_store::{Readable, Result, StoreError};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

/// Prefix of every console key
pub const CONSOLE_PREFIX: &str = "console";

/// Consoles stored one file each under
/// `console/<connection id>/<database name>/<console id>`
#[derive(Debug)]
pub struct ConsoleService {
    consoles: CollectionStore<Console>,
}

impl ConsoleService {
    pub fn new(store: Arc<AppStore>) -> Self {
        Self {
            consoles: CollectionStore::new(
                store,
                Layout::PerEntity {
                    prefix: CONSOLE_PREFIX,
                },
            ),
        }
    }

    /// Create an empty console named after the number of existing ones
    pub async fn create(
        &self,
        connection_id: &str,
        database: &str,
        container: &str,
        console_type: ConsoleType,
    ) -> Result<Console> {
        let console = Console {
            id: Uuid::new_v4().to_string(),
            name: self.next_name(connection_id, database).await?,
            bound_container: container.to_string(),
            last_updated: now_millis(),
            content: None,
            console_type,
        };

        self.consoles.add(&[connection_id, database], console).await
    }

    /// Create a new console with the container, content and type of `source`
    pub async fn copy(&self, connection_id: &str, database: &str, source: &Console) -> Result<Console> {
        let console = Console {
            id: Uuid::new_v4().to_string(),
            name: self.next_name(connection_id, database).await?,
            bound_container: source.bound_container.clone(),
            last_updated: now_millis(),
            content: source.content.clone(),
            console_type: source.console_type,
        };

        self.consoles.add(&[connection_id, database], console).await
    }

    pub async fn get(&self, connection_id: &str, database: &str, console_id: &str) -> Result<Option<Console>> {
        self.consoles.get(&[connection_id, database], console_id).await
    }

    /// Replace a console's content; `None` when the console does not exist
    pub async fn update_content(
        &self,
        connection_id: &str,
        database: &str,
        console_id: &str,
        content: Option<Value>,
    ) -> Result<Option<Console>> {
        let Some(mut console) = self.get(connection_id, database, console_id).await? else {
            return Ok(None);
        };

        console.content = content;
        console.last_updated = now_millis();
        self.consoles
            .update(&[connection_id, database], console.clone())
            .await?;

        Ok(Some(console))
    }

    pub async fn delete(&self, connection_id: &str, database: &str, console_id: &str) -> Result<bool> {
        self.consoles.remove(&[connection_id, database], console_id).await
    }

    /// The consoles of a connection and database
    pub async fn store_of(&self, connection_id: &str, database: &str) -> Result<Readable<Vec<Console>>> {
        self.consoles.collection(&[connection_id, database]).await
    }

    /// Hand the consoles of a connection and database to `exporter`
    pub async fn export(
        &self,
        connection_id: &str,
        database: &str,
        exporter: &dyn Exporter,
        options: &ExportOptions,
    ) -> Result<ExportResponse> {
        let consoles = self.store_of(connection_id, database).await?.get();
        if consoles.is_empty() {
            return Ok(ExportResponse::NoData);
        }

        let data = serde_json::to_value(&*consoles).map_err(StoreError::Serialize)?;
        Ok(exporter.export(data, options).await)
    }

    async fn next_name(&self, connection_id: &str, database: &str) -> Result<String> {
        let existing = self.store_of(connection_id, database).await?.get().len();
        Ok(format!("console-{}", existing + 1))
    }
}
