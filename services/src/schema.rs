//! Persisted entity types

use crate::collection::Entity;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeColor {
    Red,
    Yellow,
    Green,
    Indigo,
    Purple,
    Pink,
    Blue,
    Dark,
    Primary,
    #[default]
    #[serde(rename = "none")]
    Unset,
}

/// A saved connection profile
///
/// Temporary profiles (quick-connect sessions) are kept in memory only.
/// Unknown fields are preserved in `extra`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionSchema {
    pub id: String,
    pub name: String,
    pub endpoint: String,
    pub primary_key: String,
    #[serde(default)]
    pub databases: Vec<String>,
    #[serde(default)]
    pub last_connected: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge_text: Option<String>,
    #[serde(default)]
    pub badge_color: BadgeColor,
    #[serde(default)]
    pub temp: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used_database: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConnectionSchema {
    pub fn new(
        name: impl Into<String>,
        endpoint: impl Into<String>,
        primary_key: impl Into<String>,
    ) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            endpoint: endpoint.into(),
            primary_key: primary_key.into(),
            databases: Vec::new(),
            last_connected: now_millis(),
            badge_text: None,
            badge_color: BadgeColor::default(),
            temp: false,
            last_used_database: None,
            extra: Map::new(),
        }
    }

    /// Mark the profile as a session-only connection
    pub fn temporary(mut self) -> Self {
        self.temp = true;
        self
    }

    /// Reconcile the known databases with the ones the server reports
    ///
    /// An empty list is filled with `dbs`; otherwise databases the server no
    /// longer reports are dropped.
    pub fn update_databases(&mut self, dbs: &[String]) {
        if self.databases.is_empty() {
            self.databases.extend(dbs.iter().cloned());
        } else {
            self.databases.retain(|db| dbs.contains(db));
        }
    }

    pub fn update_last_used(&mut self, db: impl Into<String>) {
        self.last_used_database = Some(db.into());
    }
}

impl Entity for ConnectionSchema {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn last_modified(&self) -> i64 {
        self.last_connected
    }

    fn is_temporary(&self) -> bool {
        self.temp
    }
}

/// What a console's content runs as
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsoleType {
    #[serde(rename = "SP")]
    Procedure,
    #[serde(rename = "UFN")]
    Function,
    #[default]
    Query,
}

/// A query console bound to a container
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Console {
    pub id: String,
    pub name: String,
    pub bound_container: String,
    pub last_updated: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
    #[serde(default)]
    pub console_type: ConsoleType,
}

impl Entity for Console {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn last_modified(&self) -> i64 {
        self.last_updated
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub resizable_size: f64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            resizable_size: 22.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn connection_keeps_unknown_fields() {
        let raw = json!({
            "id": "c1",
            "name": "prod",
            "endpoint": "https://prod.documents.azure.com",
            "primaryKey": "secret",
            "databases": ["orders"],
            "lastConnected": 1700000000000i64,
            "badgeColor": "green",
            "region": "westeurope"
        });

        let conn: ConnectionSchema = serde_json::from_value(raw).unwrap();
        assert_eq!(conn.badge_color, BadgeColor::Green);
        assert!(!conn.temp);
        assert_eq!(conn.extra.get("region"), Some(&json!("westeurope")));

        let back = serde_json::to_value(&conn).unwrap();
        assert_eq!(back["region"], json!("westeurope"));
        assert_eq!(back["primaryKey"], json!("secret"));
    }

    #[test]
    fn update_databases_fills_then_intersects() {
        let mut conn = ConnectionSchema::new("n", "e", "k");
        conn.update_databases(&["a".into(), "b".into()]);
        assert_eq!(conn.databases, ["a", "b"]);

        conn.update_databases(&["b".into(), "c".into()]);
        assert_eq!(conn.databases, ["b"]);

        conn.update_last_used("b");
        assert_eq!(conn.last_used_database.as_deref(), Some("b"));
    }

    #[test]
    fn console_type_uses_short_names() {
        assert_eq!(serde_json::to_value(ConsoleType::Procedure).unwrap(), json!("SP"));
        assert_eq!(serde_json::to_value(ConsoleType::Function).unwrap(), json!("UFN"));
        assert_eq!(serde_json::to_value(ConsoleType::Query).unwrap(), json!("Query"));
    }

    #[test]
    fn default_settings() {
        assert_eq!(AppSettings::default().resizable_size, 22.0);
        let parsed: AppSettings = serde_json::from_value(json!({ "resizableSize": 30 })).unwrap();
        assert_eq!(parsed.resizable_size, 30.0);
    }
}
