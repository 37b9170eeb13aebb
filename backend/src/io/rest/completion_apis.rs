//! # REST API for Completions
//!
//! Toggling a task's completion for a day, and the per-day views built from
//! the completion ledger.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tracing::{error, info};

use crate::domain::calendar;
use crate::io::rest::mappers::score_mapper::ScoreMapper;
use crate::io::rest::{error_response, parse_date_param, spawn_remote_push};
use crate::AppState;
use shared::{DayViewResponse, ToggleCompletionRequest, ToggleCompletionResponse};

/// Number of days returned by the history endpoint when none is given
const DEFAULT_HISTORY_DAYS: usize = 7;
const MAX_HISTORY_DAYS: usize = 366;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/children/:child_id/tasks/:task_id/toggle", post(toggle_completion))
        .route("/children/:child_id/days", get(get_recent_days))
        .route("/children/:child_id/days/:date", get(get_day))
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub count: Option<usize>,
}

/// Flip a completion. The body is optional; without a date, today is used.
pub async fn toggle_completion(
    State(state): State<AppState>,
    Path((child_id, task_id)): Path<(String, String)>,
    request: Option<Json<ToggleCompletionRequest>>,
) -> impl IntoResponse {
    let request = request.map(|Json(request)| request).unwrap_or_default();
    info!("POST /api/children/{}/tasks/{}/toggle - request: {:?}", child_id, task_id, request);

    let date = match request.date.as_deref().map(parse_date_param).transpose() {
        Ok(date) => date,
        Err(e) => return error_response(e),
    };

    let mut chores = state.chores.lock().await;
    let date = date.unwrap_or_else(|| chores.today());
    match chores.toggle_completion(&child_id, &task_id, Some(date)) {
        Ok(completed) => {
            let response = ToggleCompletionResponse {
                child_id: child_id.clone(),
                task_id,
                date: calendar::format_date(date),
                completed,
                day_points: ScoreMapper::to_points_dto(chores.day_points(&child_id, date)),
                perfect_day: chores.is_perfect_day(&child_id, date),
            };
            drop(chores);
            spawn_remote_push(&state);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to toggle completion: {}", e);
            error_response(e)
        }
    }
}

pub async fn get_day(
    State(state): State<AppState>,
    Path((child_id, date)): Path<(String, String)>,
) -> impl IntoResponse {
    info!("GET /api/children/{}/days/{}", child_id, date);

    let date = match parse_date_param(&date) {
        Ok(date) => date,
        Err(e) => return error_response(e),
    };

    let chores = state.chores.lock().await;
    match chores.day_view(&child_id, date) {
        Ok(view) => (StatusCode::OK, Json(ScoreMapper::to_day_view_response(&view))).into_response(),
        Err(e) => error_response(e),
    }
}

/// Day views for the last `count` days ending today, oldest first
pub async fn get_recent_days(
    State(state): State<AppState>,
    Path(child_id): Path<String>,
    Query(params): Query<HistoryParams>,
) -> impl IntoResponse {
    info!("GET /api/children/{}/days - params: {:?}", child_id, params);

    let count = params.count.unwrap_or(DEFAULT_HISTORY_DAYS).min(MAX_HISTORY_DAYS);
    let chores = state.chores.lock().await;
    let mut days: Vec<DayViewResponse> = Vec::with_capacity(count);
    for date in chores.last_n_days(count) {
        match chores.day_view(&child_id, date) {
            Ok(view) => days.push(ScoreMapper::to_day_view_response(&view)),
            Err(e) => return error_response(e),
        }
    }
    (StatusCode::OK, Json(days)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::rest::test_support::{read_json, send, setup_test_state, TODAY};
    use crate::io::rest::task_apis;
    use axum::http::Method;
    use serde_json::json;
    use shared::CreateTaskResponse;

    fn app(state: AppState) -> Router {
        router().merge(task_apis::router()).with_state(state)
    }

    async fn create_task(state: &AppState, name: &str, points: u32) -> String {
        let body = json!({"child_ids": ["olive"], "name": name, "points": points});
        let created: CreateTaskResponse =
            read_json(send(app(state.clone()), Method::POST, "/tasks", Some(body)).await).await;
        created.tasks[0].id.clone()
    }

    #[tokio::test]
    async fn test_toggle_defaults_to_today() {
        let state = setup_test_state();
        let task_id = create_task(&state, "Dishes", 5).await;
        let uri = format!("/children/olive/tasks/{}/toggle", task_id);

        let response = send(app(state.clone()), Method::POST, &uri, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let toggled: ToggleCompletionResponse = read_json(response).await;
        assert!(toggled.completed);
        assert_eq!(toggled.date, TODAY);
        assert_eq!(toggled.day_points.earned, 5);
        assert!(toggled.perfect_day);

        let response = send(app(state.clone()), Method::POST, &uri, Some(json!({}))).await;
        let toggled: ToggleCompletionResponse = read_json(response).await;
        assert!(!toggled.completed);
        assert_eq!(toggled.day_points.earned, 0);
    }

    #[tokio::test]
    async fn test_toggle_explicit_date_and_day_view() {
        let state = setup_test_state();
        let dishes = create_task(&state, "Dishes", 5).await;
        create_task(&state, "Bed", 3).await;

        let uri = format!("/children/olive/tasks/{}/toggle", dishes);
        let response = send(app(state.clone()), Method::POST, &uri, Some(json!({"date": "2026-10-13"}))).await;
        let toggled: ToggleCompletionResponse = read_json(response).await;
        assert_eq!(toggled.date, "2026-10-13");
        assert!(!toggled.perfect_day);

        let response = send(app(state.clone()), Method::GET, "/children/olive/days/2026-10-13", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let view: DayViewResponse = read_json(response).await;
        assert_eq!(view.tasks.len(), 2);
        assert_eq!(view.points.earned, 5);
        assert_eq!(view.points.possible, 8);
        assert!(view.tasks.iter().any(|t| t.task.id == dishes && t.completed));
    }

    #[tokio::test]
    async fn test_toggle_errors() {
        let state = setup_test_state();
        let task_id = create_task(&state, "Dishes", 5).await;

        let uri = format!("/children/miles/tasks/{}/toggle", task_id);
        let response = send(app(state.clone()), Method::POST, &uri, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let uri = format!("/children/olive/tasks/{}/toggle", task_id);
        let response = send(app(state.clone()), Method::POST, &uri, Some(json!({"date": "14/10/2026"}))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_recent_days_end_today() {
        let state = setup_test_state();
        let response = send(app(state), Method::GET, "/children/zander/days?count=3", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let days: Vec<DayViewResponse> = read_json(response).await;
        let dates: Vec<&str> = days.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec!["2026-10-12", "2026-10-13", TODAY]);
    }

    #[tokio::test]
    async fn test_day_view_bad_date_and_unknown_child() {
        let state = setup_test_state();
        let response = send(app(state.clone()), Method::GET, "/children/olive/days/yesterday", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(app(state), Method::GET, "/children/nobody/days/2026-10-14", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
