//! Remote document store contract.
//!
//! The remote copy is one document: the full serialized application state
//! plus a numeric `lastUpdated` field holding epoch milliseconds. Writes
//! replace the whole document and reads fetch the whole document.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::models::AppData;
use crate::storage::document;

/// Field carrying the writer's timestamp
pub const LAST_UPDATED_FIELD: &str = "lastUpdated";
/// Older clients wrote the timestamp under this name
const LEGACY_LAST_UPDATED_FIELD: &str = "_lastUpdated";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyncError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Remote store answered with HTTP {0}")]
    Status(u16),
    #[error("Could not decode remote document: {0}")]
    Decode(String),
    #[error("Remote store timed out")]
    Timeout,
    #[error("Not connected to a remote store")]
    NotConnected,
}

impl From<reqwest::Error> for SyncError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            SyncError::Timeout
        } else if error.is_decode() {
            SyncError::Decode(error.to_string())
        } else if let Some(status) = error.status() {
            SyncError::Status(status.as_u16())
        } else {
            SyncError::Network(error.to_string())
        }
    }
}

/// A whole-document remote store
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Fetch the document. `Ok(None)` means the remote is empty.
    async fn fetch(&self) -> Result<Option<Value>, SyncError>;

    /// Replace the document
    async fn push(&self, document: &Value) -> Result<(), SyncError>;

    /// Where the document lives, for logs
    fn describe(&self) -> String;
}

/// A fetched remote document, upgraded into application state
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteDocument {
    pub state: AppData,
    pub last_updated: Option<i64>,
}

impl RemoteDocument {
    /// Extract the timestamp and upgrade the rest against `defaults`, the
    /// same way a locally stored document is upgraded
    pub fn from_value(value: Value, defaults: &AppData) -> Result<Self, SyncError> {
        let last_updated = read_timestamp(&value, LAST_UPDATED_FIELD)
            .or_else(|| read_timestamp(&value, LEGACY_LAST_UPDATED_FIELD));
        let state = document::upgrade_value(value, defaults)
            .map_err(|e| SyncError::Decode(format!("{:#}", e)))?;
        Ok(Self { state, last_updated })
    }

    /// The wire form of `state` stamped with `last_updated`
    pub fn to_value(state: &AppData, last_updated: i64) -> Result<Value, SyncError> {
        let mut value = serde_json::to_value(state).map_err(|e| SyncError::Decode(e.to_string()))?;
        match value.as_object_mut() {
            Some(map) => {
                map.insert(LAST_UPDATED_FIELD.to_string(), Value::from(last_updated));
                Ok(value)
            }
            None => Err(SyncError::Decode("state did not serialize to an object".to_string())),
        }
    }
}

fn read_timestamp(value: &Value, field: &str) -> Option<i64> {
    let raw = value.get(field)?;
    raw.as_i64().or_else(|| raw.as_f64().map(|millis| millis as i64))
}
