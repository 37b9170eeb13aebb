//! # Remote Sync
//!
//! Optional multi-device synchronization against a remote document store
//! using whole-document last-write-wins.
//!
//! - [`remote`]: the store contract and the wire document
//! - [`reconcile`]: the single conflict decision function
//! - [`coordinator`]: connection state, pushes and the change watcher
//! - [`http`] / [`memory`]: store implementations

pub mod coordinator;
pub mod http;
pub mod memory;
pub mod reconcile;
pub mod remote;

pub use coordinator::{SyncCoordinator, SyncStatus};
pub use http::HttpRemoteStore;
pub use memory::MemoryRemoteStore;
pub use reconcile::{reconcile, SyncDecision, SyncPhase};
pub use remote::{RemoteDocument, RemoteStore, SyncError};
