//! # REST API Interface Layer
//!
//! HTTP endpoints over the chore service, mounted under `/api`. Handlers map
//! DTOs from the `shared` crate onto domain commands, call the service while
//! holding its lock, and translate [`ChoreError`] into status codes:
//!
//! - `Validation` is 400
//! - `NotFound` is 404
//! - anything else is 500
//!
//! Successful mutations are mirrored to the remote store in the background
//! when sync is configured.

pub mod adjustment_apis;
pub mod completion_apis;
pub mod mappers;
pub mod score_apis;
pub mod settings_apis;
pub mod sync_apis;
pub mod task_apis;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Router,
};
use chrono::NaiveDate;
use tracing::{debug, error};

use crate::domain::calendar;
use crate::domain::errors::ChoreError;
use crate::sync::SyncError;
use crate::AppState;

/// Every API router, ready to be nested under `/api`
pub fn api_router() -> Router<AppState> {
    Router::new()
        .merge(task_apis::router())
        .merge(completion_apis::router())
        .merge(score_apis::router())
        .merge(adjustment_apis::router())
        .merge(settings_apis::router())
        .merge(sync_apis::router())
}

pub fn error_status(error: &ChoreError) -> StatusCode {
    match error {
        ChoreError::Validation(_) => StatusCode::BAD_REQUEST,
        ChoreError::NotFound { .. } => StatusCode::NOT_FOUND,
        ChoreError::Persistence(_) | ChoreError::Sync(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn error_response(error: ChoreError) -> Response {
    (error_status(&error), error.to_string()).into_response()
}

pub fn parse_date_param(raw: &str) -> Result<NaiveDate, ChoreError> {
    calendar::parse_date(raw).ok_or_else(|| ChoreError::validation(format!("Invalid date '{}', expected YYYY-MM-DD", raw)))
}

/// Mirror the latest state to the remote store without blocking the
/// response. Call after releasing the service lock.
pub fn spawn_remote_push(state: &AppState) {
    let Some(sync) = state.sync.clone() else {
        return;
    };
    tokio::spawn(async move {
        match sync.push_current().await {
            Ok(()) => debug!("Mirrored change to remote store"),
            Err(SyncError::NotConnected) => debug!("Offline, change stays local until reconnect"),
            Err(e) => error!("Failed to mirror change to remote store: {}", e),
        }
    });
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::body::Body;
    use axum::http::{Method, Request, Response};
    use chrono::NaiveDate;
    use serde::de::DeserializeOwned;
    use std::sync::Arc;
    use tower::util::ServiceExt;

    use crate::domain::models::ChildProfile;
    use crate::domain::FixedClock;
    use crate::storage::MemoryStorage;
    use crate::AppState;

    /// Wednesday
    pub const TODAY: &str = "2026-10-14";

    pub fn setup_test_state() -> AppState {
        let clock = Arc::new(FixedClock::on(NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()));
        crate::initialize_with(
            Arc::new(MemoryStorage::new()),
            clock,
            ChildProfile::default_roster(),
            None,
        )
    }

    pub async fn send(app: axum::Router, method: Method, uri: &str, body: Option<serde_json::Value>) -> Response<Body> {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        app.oneshot(request).await.unwrap()
    }

    pub async fn read_json<T: DeserializeOwned>(response: Response<Body>) -> T {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }
}
