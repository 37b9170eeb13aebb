//! # Storage Traits
//!
//! The application state is persisted as one serialized document under one
//! key. Backends only move that document in and out of durable storage;
//! parsing and upgrading it is the job of [`super::document`].

use anyhow::Result;

/// Durable home of the serialized application state
pub trait StateStorage: Send + Sync {
    /// Read the stored document. `Ok(None)` means nothing has been stored yet.
    fn load_document(&self) -> Result<Option<String>>;

    /// Replace the stored document
    fn save_document(&self, document: &str) -> Result<()>;

    /// Human-readable location, for logs
    fn location(&self) -> String;
}
