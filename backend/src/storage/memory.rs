//! In-memory storage, used by tests and when no data directory is usable.

use anyhow::{bail, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use super::traits::StateStorage;

#[derive(Debug, Default)]
pub struct MemoryStorage {
    document: Mutex<Option<String>>,
    failing: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(document: impl Into<String>) -> Self {
        Self {
            document: Mutex::new(Some(document.into())),
            failing: AtomicBool::new(false),
        }
    }

    /// Make every subsequent read and write fail
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// The last document written, bypassing the failure switch
    pub fn document(&self) -> Option<String> {
        self.document
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl StateStorage for MemoryStorage {
    fn load_document(&self) -> Result<Option<String>> {
        if self.failing.load(Ordering::SeqCst) {
            bail!("memory storage is failing reads");
        }
        Ok(self.document())
    }

    fn save_document(&self, document: &str) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            bail!("memory storage is failing writes");
        }
        *self.document.lock().unwrap_or_else(PoisonError::into_inner) = Some(document.to_string());
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
