//! # REST API for Point Adjustments
//!
//! Manual bonuses and penalties. The list endpoint takes the optional
//! `child_id` and `limit` query parameters.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, get},
    Router,
};
use tracing::{error, info};

use crate::io::rest::mappers::adjustment_mapper::AdjustmentMapper;
use crate::io::rest::{error_response, spawn_remote_push};
use crate::AppState;
use shared::{AdjustmentListRequest, CreateAdjustmentRequest};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/adjustments", get(list_adjustments).post(create_adjustment))
        .route("/adjustments/:adjustment_id", delete(delete_adjustment))
}

/// Newest first
pub async fn list_adjustments(
    State(state): State<AppState>,
    Query(request): Query<AdjustmentListRequest>,
) -> impl IntoResponse {
    info!("GET /api/adjustments - request: {:?}", request);

    let chores = state.chores.lock().await;
    let adjustments = chores.list_adjustments(AdjustmentMapper::to_list_query(request));
    (StatusCode::OK, Json(AdjustmentMapper::to_list_response(&adjustments))).into_response()
}

pub async fn create_adjustment(
    State(state): State<AppState>,
    Json(request): Json<CreateAdjustmentRequest>,
) -> impl IntoResponse {
    info!("POST /api/adjustments - request: {:?}", request);

    let mut chores = state.chores.lock().await;
    match chores.add_adjustment(AdjustmentMapper::to_add_command(request)) {
        Ok(adjustment) => {
            drop(chores);
            spawn_remote_push(&state);
            (StatusCode::CREATED, Json(AdjustmentMapper::to_dto(&adjustment))).into_response()
        }
        Err(e) => {
            error!("Failed to add adjustment: {}", e);
            error_response(e)
        }
    }
}

pub async fn delete_adjustment(
    State(state): State<AppState>,
    Path(adjustment_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/adjustments/{}", adjustment_id);

    let mut chores = state.chores.lock().await;
    chores.delete_adjustment(&adjustment_id);
    drop(chores);
    spawn_remote_push(&state);
    StatusCode::NO_CONTENT.into_response()
}
