//! Sync coordinator.
//!
//! Tracks two flags, `initialized` (the remote channel is up) and `syncing`
//! (a local push is in flight), plus the newest remote timestamp this client
//! has seen or produced. Remote failures only ever drop the coordinator back
//! to offline; local state keeps working regardless.
//!
//! Pushes are serialized through one writer lock. Each push reads the
//! service's state after taking the lock, so whichever push finishes last
//! carries the newest state and the highest stamp. `syncing` is only set
//! while that lock is held. Remote changes that arrive while the lock is
//! taken are dropped.

use log::{debug, info, warn};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::domain::models::AppData;
use crate::domain::Clock;
use crate::SharedChoreService;

use super::reconcile::{reconcile, SyncDecision, SyncPhase};
use super::remote::{RemoteDocument, RemoteStore, SyncError};

/// Snapshot of the coordinator flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncStatus {
    pub connected: bool,
    pub syncing: bool,
    pub last_seen: Option<i64>,
    pub remote: String,
}

impl SyncStatus {
    pub fn label(&self) -> &'static str {
        if self.connected {
            "connected"
        } else {
            "offline"
        }
    }
}

pub struct SyncCoordinator {
    remote: Arc<dyn RemoteStore>,
    chores: SharedChoreService,
    clock: Arc<dyn Clock>,
    initialized: AtomicBool,
    syncing: AtomicBool,
    last_seen: AtomicI64,
    writer: Mutex<()>,
}

impl SyncCoordinator {
    pub fn new(remote: Arc<dyn RemoteStore>, chores: SharedChoreService, clock: Arc<dyn Clock>) -> Self {
        Self {
            remote,
            chores,
            clock,
            initialized: AtomicBool::new(false),
            syncing: AtomicBool::new(false),
            last_seen: AtomicI64::new(0),
            writer: Mutex::new(()),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    pub fn status(&self) -> SyncStatus {
        let last_seen = self.last_seen.load(Ordering::SeqCst);
        SyncStatus {
            connected: self.is_connected(),
            syncing: self.syncing.load(Ordering::SeqCst),
            last_seen: (last_seen > 0).then_some(last_seen),
            remote: self.remote.describe(),
        }
    }

    async fn defaults(&self) -> AppData {
        self.chores.lock().await.default_state()
    }

    async fn parse(&self, value: Option<Value>) -> Result<Option<RemoteDocument>, SyncError> {
        match value {
            Some(value) => {
                let defaults = self.defaults().await;
                RemoteDocument::from_value(value, &defaults).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Establish the remote channel: adopt a timestamped remote document, or
    /// seed the remote with local state
    pub async fn connect(&self) -> Result<(), SyncError> {
        let _writer = self.writer.lock().await;
        let fetched = match self.remote.fetch().await {
            Ok(value) => value,
            Err(e) => {
                self.initialized.store(false, Ordering::SeqCst);
                warn!("Remote store {} unavailable, staying offline: {}", self.remote.describe(), e);
                return Err(e);
            }
        };
        let document = self.parse(fetched).await.inspect_err(|e| {
            warn!("Remote document unusable, staying offline: {}", e);
        })?;

        let decision = reconcile(
            SyncPhase::Connect,
            document,
            self.last_seen.load(Ordering::SeqCst),
            self.syncing.load(Ordering::SeqCst),
        );
        self.initialized.store(true, Ordering::SeqCst);
        info!("Connected to remote store {}", self.remote.describe());

        match decision {
            SyncDecision::AdoptRemote { state, last_updated } => {
                info!("Adopting remote state written at {}", last_updated);
                self.last_seen.store(last_updated, Ordering::SeqCst);
                self.chores.lock().await.replace_state(state);
                Ok(())
            }
            SyncDecision::PushLocal => {
                info!("Remote store has no stamped state, pushing local state");
                self.push_held().await
            }
            SyncDecision::Ignore => Ok(()),
        }
    }

    /// Write the service's current state to the remote store with a fresh
    /// timestamp. Concurrent calls queue behind one another.
    pub async fn push_current(&self) -> Result<(), SyncError> {
        if !self.is_connected() {
            debug!("Not connected, skipping remote push");
            return Err(SyncError::NotConnected);
        }

        let _writer = self.writer.lock().await;
        self.push_held().await
    }

    /// Caller holds the writer lock
    async fn push_held(&self) -> Result<(), SyncError> {
        self.syncing.store(true, Ordering::SeqCst);
        let result = self.push_latest().await;
        self.syncing.store(false, Ordering::SeqCst);

        match &result {
            Ok(stamp) => debug!("Pushed state to {} at {}", self.remote.describe(), stamp),
            Err(e) => warn!("Remote push failed: {}", e),
        }
        result.map(|_| ())
    }

    async fn push_latest(&self) -> Result<i64, SyncError> {
        let state = self.chores.lock().await.state().clone();

        // Never stamp a write older than something already seen
        let stamp = self
            .clock
            .epoch_millis()
            .max(self.last_seen.load(Ordering::SeqCst) + 1);
        let value = RemoteDocument::to_value(&state, stamp)?;

        self.last_seen.store(stamp, Ordering::SeqCst);
        self.remote.push(&value).await?;
        Ok(stamp)
    }

    /// Handle a change notification. Returns true when local state was
    /// replaced.
    pub async fn apply_remote_change(&self, value: Option<Value>) -> bool {
        let Ok(_writer) = self.writer.try_lock() else {
            debug!("Push in flight, dropping remote change");
            return false;
        };
        let document = match self.parse(value).await {
            Ok(document) => document,
            Err(e) => {
                warn!("Ignoring unusable remote change: {}", e);
                return false;
            }
        };

        match reconcile(
            SyncPhase::RemoteChange,
            document,
            self.last_seen.load(Ordering::SeqCst),
            self.syncing.load(Ordering::SeqCst),
        ) {
            SyncDecision::AdoptRemote { state, last_updated } => {
                info!("Received remote update written at {}", last_updated);
                self.last_seen.store(last_updated, Ordering::SeqCst);
                self.chores.lock().await.replace_state(state);
                true
            }
            _ => false,
        }
    }

    /// Fetch the remote document once and treat it as a change notification
    pub async fn poll_once(&self) -> Result<bool, SyncError> {
        match self.remote.fetch().await {
            Ok(value) => Ok(self.apply_remote_change(value).await),
            Err(e) => {
                warn!("Lost remote store {}: {}", self.remote.describe(), e);
                self.initialized.store(false, Ordering::SeqCst);
                Err(e)
            }
        }
    }

    /// Poll for remote changes every `interval`, reconnecting while offline
    pub fn spawn_watcher(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if self.is_connected() {
                    let _ = self.poll_once().await;
                } else {
                    let _ = self.connect().await;
                }
            }
        })
    }
}
