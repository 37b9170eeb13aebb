//! Last-write-wins reconciliation.
//!
//! The whole document is the unit of conflict. Every decision about whether
//! a remote document replaces local state, or local state is pushed, is made
//! here and nowhere else.

use crate::domain::models::AppData;

use super::remote::RemoteDocument;

/// When the reconciliation is happening
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    /// First contact with the remote store
    Connect,
    /// A change notification arrived after connecting
    RemoteChange,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SyncDecision {
    /// Replace local state with the remote document
    AdoptRemote { state: AppData, last_updated: i64 },
    /// Write local state to the remote store
    PushLocal,
    /// Leave both sides as they are
    Ignore,
}

/// Decide what to do with a remote document.
///
/// On connect a timestamped remote document always wins; an empty or
/// unstamped remote gets the local state. Later notifications are applied
/// only when strictly newer than `last_seen`, and never while a local push
/// is in flight.
pub fn reconcile(phase: SyncPhase, remote: Option<RemoteDocument>, last_seen: i64, syncing: bool) -> SyncDecision {
    match phase {
        SyncPhase::Connect => match remote {
            Some(RemoteDocument {
                state,
                last_updated: Some(last_updated),
            }) => SyncDecision::AdoptRemote { state, last_updated },
            _ => SyncDecision::PushLocal,
        },
        SyncPhase::RemoteChange => {
            if syncing {
                return SyncDecision::Ignore;
            }
            match remote {
                Some(document) => {
                    let last_updated = document.last_updated.unwrap_or(0);
                    if last_updated > last_seen {
                        SyncDecision::AdoptRemote {
                            state: document.state,
                            last_updated,
                        }
                    } else {
                        SyncDecision::Ignore
                    }
                }
                None => SyncDecision::Ignore,
            }
        }
    }
}
