//! # REST API for Remote Sync Status

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use tracing::info;

use crate::AppState;
use shared::SyncStatusResponse;

pub fn router() -> Router<AppState> {
    Router::new().route("/sync/status", get(get_sync_status))
}

/// Reports `offline` with `enabled: false` when no remote store is configured
pub async fn get_sync_status(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/sync/status");

    let response = match &state.sync {
        Some(sync) => {
            let status = sync.status();
            SyncStatusResponse {
                status: status.label().to_string(),
                enabled: true,
                syncing: status.syncing,
                last_seen: status.last_seen,
                remote: Some(status.remote),
            }
        }
        None => SyncStatusResponse {
            status: "offline".to_string(),
            enabled: false,
            syncing: false,
            last_seen: None,
            remote: None,
        },
    };
    (StatusCode::OK, Json(response)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::ChildProfile;
    use crate::domain::FixedClock;
    use crate::io::rest::test_support::{read_json, send, setup_test_state};
    use crate::storage::MemoryStorage;
    use crate::sync::MemoryRemoteStore;
    use axum::http::Method;
    use axum::Router;
    use chrono::NaiveDate;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_status_without_remote() {
        let app: Router = router().with_state(setup_test_state());
        let response = send(app, Method::GET, "/sync/status", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let status: SyncStatusResponse = read_json(response).await;
        assert!(!status.enabled);
        assert_eq!(status.status, "offline");
    }

    #[tokio::test]
    async fn test_status_after_connect() {
        let clock = Arc::new(FixedClock::on(NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()));
        let remote = Arc::new(MemoryRemoteStore::new());
        let state = crate::initialize_with(
            Arc::new(MemoryStorage::new()),
            clock,
            ChildProfile::default_roster(),
            Some(remote.clone() as Arc<dyn crate::sync::RemoteStore>),
        );
        state.sync.as_ref().unwrap().connect().await.unwrap();

        let app: Router = router().with_state(state);
        let status: SyncStatusResponse = read_json(send(app, Method::GET, "/sync/status", None).await).await;
        assert!(status.enabled);
        assert_eq!(status.status, "connected");
        assert!(!status.syncing);
        assert!(status.last_seen.is_some());
        assert_eq!(status.remote.as_deref(), Some("memory"));
        assert_eq!(remote.push_count(), 1);
    }
}
