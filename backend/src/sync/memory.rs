//! In-memory remote store for tests and single-process setups.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use super::remote::{RemoteStore, SyncError};

#[derive(Debug, Default)]
pub struct MemoryRemoteStore {
    document: Mutex<Option<Value>>,
    offline: AtomicBool,
    pushes: AtomicUsize,
}

impl MemoryRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(document: Value) -> Self {
        Self {
            document: Mutex::new(Some(document)),
            ..Self::default()
        }
    }

    /// Overwrite the document as another device would
    pub fn set_document(&self, document: Value) {
        *self.document.lock().unwrap_or_else(PoisonError::into_inner) = Some(document);
    }

    pub fn document(&self) -> Option<Value> {
        self.document
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Make every request fail with a network error
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of successful pushes
    pub fn push_count(&self) -> usize {
        self.pushes.load(Ordering::SeqCst)
    }

    fn check_online(&self) -> Result<(), SyncError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(SyncError::Network("remote unreachable".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RemoteStore for MemoryRemoteStore {
    async fn fetch(&self) -> Result<Option<Value>, SyncError> {
        self.check_online()?;
        Ok(self.document())
    }

    async fn push(&self, document: &Value) -> Result<(), SyncError> {
        self.check_online()?;
        self.set_document(document.clone());
        self.pushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
