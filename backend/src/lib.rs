//! # Chore Tracker Backend
//!
//! Scoring, progression and persistence for a household chore tracker, with
//! optional multi-device sync and a REST API.
//!
//! ## Layers
//!
//! - **domain**: models, ledgers, the scoring and progression engines, and the
//!   [`ChoreService`] that owns the application state
//! - **storage**: local durable storage of the state document
//! - **sync**: last-write-wins mirroring to a remote document store
//! - **io**: the axum REST API
//! - **config**: YAML application configuration

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;
pub mod sync;

use anyhow::{Context, Result};
use axum::http::{HeaderValue, Method};
use axum::Router;
use log::info;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::domain::models::ChildProfile;
use crate::domain::{ChoreService, Clock, SystemClock};
use crate::storage::{JsonFileStorage, StateStorage};
use crate::sync::{HttpRemoteStore, RemoteStore, SyncCoordinator};

/// The chore service behind the lock every handler and the sync watcher share
pub type SharedChoreService = Arc<Mutex<ChoreService>>;

/// Shared state handed to every REST handler
#[derive(Clone)]
pub struct AppState {
    pub chores: SharedChoreService,
    /// Present only when a remote store is configured
    pub sync: Option<Arc<SyncCoordinator>>,
}

/// Initialize the backend from the application config
pub fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up storage in {:?}", config.data_directory);
    let storage = JsonFileStorage::new(&config.data_directory)
        .with_context(|| format!("Failed to prepare data directory {:?}", config.data_directory))?;

    let remote: Option<Arc<dyn RemoteStore>> = match &config.remote {
        Some(remote) => {
            info!("Setting up remote store at {}", remote.url);
            let store = HttpRemoteStore::new(
                &remote.url,
                &remote.document,
                remote.auth_token.clone(),
                remote.timeout(),
            )
            .context("Failed to build remote store client")?;
            Some(Arc::new(store) as Arc<dyn RemoteStore>)
        }
        None => {
            info!("No remote store configured, running local-only");
            None
        }
    };

    Ok(initialize_with(
        Arc::new(storage),
        Arc::new(SystemClock),
        config.children.clone(),
        remote,
    ))
}

/// Wire the service and optional sync coordinator from explicit parts
pub fn initialize_with(
    storage: Arc<dyn StateStorage>,
    clock: Arc<dyn Clock>,
    roster: Vec<ChildProfile>,
    remote: Option<Arc<dyn RemoteStore>>,
) -> AppState {
    info!("Setting up domain model");
    let chores: SharedChoreService = Arc::new(Mutex::new(ChoreService::load(storage, clock.clone(), roster)));

    let sync = remote.map(|remote| Arc::new(SyncCoordinator::new(remote, chores.clone(), clock)));

    AppState { chores, sync }
}

/// Create the axum router with every API mounted under `/api`
pub fn create_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(HeaderValue::from_static("http://localhost:8080"))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        .nest("/api", io::rest::api_router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FixedClock;
    use crate::storage::MemoryStorage;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::NaiveDate;
    use tempfile::TempDir;
    use tower::util::ServiceExt;

    #[tokio::test]
    async fn test_router_mounts_api_prefix() {
        let clock = Arc::new(FixedClock::on(NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()));
        let state = initialize_with(Arc::new(MemoryStorage::new()), clock, ChildProfile::default_roster(), None);
        let app = create_router(state);

        let request = Request::builder().uri("/api/children").body(Body::empty()).unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let request = Request::builder().uri("/children").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_initialize_backend_creates_state_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = AppConfig {
            data_directory: temp_dir.path().join("data"),
            ..AppConfig::default()
        };

        let state = initialize_backend(&config).unwrap();
        assert!(state.sync.is_none());
        assert!(temp_dir.path().join("data").join(storage::json_file::STATE_FILE_NAME).exists());
        assert_eq!(state.chores.lock().await.state().children.len(), 3);
    }
}
