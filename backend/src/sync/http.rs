//! Remote store speaking the Firebase Realtime Database REST dialect:
//! `GET {url}/{document}.json` reads and `PUT` replaces the document, with an
//! optional `auth` query parameter.

use async_trait::async_trait;
use log::debug;
use serde_json::Value;
use std::time::Duration;

use super::remote::{RemoteStore, SyncError};

#[derive(Debug, Clone)]
pub struct HttpRemoteStore {
    client: reqwest::Client,
    document_url: String,
    auth_token: Option<String>,
}

impl HttpRemoteStore {
    pub fn new(base_url: &str, document: &str, auth_token: Option<String>, timeout: Duration) -> Result<Self, SyncError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SyncError::Network(e.to_string()))?;
        Ok(Self {
            client,
            document_url: document_url(base_url, document),
            auth_token,
        })
    }

    pub fn document_url(&self) -> &str {
        &self.document_url
    }

    fn request(&self, method: reqwest::Method) -> reqwest::RequestBuilder {
        let builder = self.client.request(method, &self.document_url);
        match &self.auth_token {
            Some(token) => builder.query(&[("auth", token.as_str())]),
            None => builder,
        }
    }
}

fn document_url(base_url: &str, document: &str) -> String {
    format!(
        "{}/{}.json",
        base_url.trim_end_matches('/'),
        document.trim_matches('/')
    )
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn fetch(&self) -> Result<Option<Value>, SyncError> {
        debug!("GET {}", self.document_url);
        let response = self.request(reqwest::Method::GET).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Status(status.as_u16()));
        }

        // An empty location reads back as JSON null
        let value: Value = response.json().await?;
        Ok(match value {
            Value::Null => None,
            other => Some(other),
        })
    }

    async fn push(&self, document: &Value) -> Result<(), SyncError> {
        debug!("PUT {}", self.document_url);
        let response = self.request(reqwest::Method::PUT).json(document).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Status(status.as_u16()));
        }
        Ok(())
    }

    fn describe(&self) -> String {
        self.document_url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_url_joins_cleanly() {
        assert_eq!(
            document_url("https://example.firebaseio.com/", "/kidsTasks"),
            "https://example.firebaseio.com/kidsTasks.json"
        );
        assert_eq!(
            document_url("http://localhost:9000", "family/kidsTasks"),
            "http://localhost:9000/family/kidsTasks.json"
        );
    }

    #[test]
    fn test_store_reports_its_location() {
        let store = HttpRemoteStore::new("http://localhost:9000", "kidsTasks", None, Duration::from_secs(1)).unwrap();
        assert_eq!(store.describe(), "http://localhost:9000/kidsTasks.json");
    }
}
