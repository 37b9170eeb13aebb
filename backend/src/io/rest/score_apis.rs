//! # REST API for Scores and Progression
//!
//! Read-only endpoints: weekly points and allowance, lifetime progression
//! and the family leaderboard.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Deserialize;
use tracing::info;

use crate::io::rest::mappers::score_mapper::ScoreMapper;
use crate::io::rest::{error_response, parse_date_param};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/children/:child_id/week", get(get_week_summary))
        .route("/children/:child_id/summary", get(get_child_summary))
        .route("/leaderboard", get(get_leaderboard))
}

#[derive(Debug, Deserialize)]
pub struct WeekParams {
    /// Start of the week to score, `YYYY-MM-DD`. Defaults to the stored week.
    pub start: Option<String>,
}

pub async fn get_week_summary(
    State(state): State<AppState>,
    Path(child_id): Path<String>,
    Query(params): Query<WeekParams>,
) -> impl IntoResponse {
    info!("GET /api/children/{}/week - params: {:?}", child_id, params);

    let start = match params.start.as_deref().map(parse_date_param).transpose() {
        Ok(start) => start,
        Err(e) => return error_response(e),
    };

    let chores = state.chores.lock().await;
    match chores.week_summary(&child_id, start) {
        Ok(summary) => (
            StatusCode::OK,
            Json(ScoreMapper::to_week_summary_response(&child_id, &summary)),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn get_child_summary(State(state): State<AppState>, Path(child_id): Path<String>) -> impl IntoResponse {
    info!("GET /api/children/{}/summary", child_id);

    let chores = state.chores.lock().await;
    match chores.child_summary(&child_id) {
        Ok(summary) => (StatusCode::OK, Json(ScoreMapper::to_child_summary_response(&summary))).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn get_leaderboard(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/leaderboard");

    let chores = state.chores.lock().await;
    let entries = chores.leaderboard();
    let response = ScoreMapper::to_leaderboard_response(chores.week_start(), &entries);
    (StatusCode::OK, Json(response)).into_response()
}
