//! # REST API for Settings and the Scored Week

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post, put},
    Router,
};
use tracing::{error, info};

use crate::domain::calendar;
use crate::domain::commands::settings::UpdateAllowancesCommand;
use crate::domain::ChoreService;
use crate::io::rest::{error_response, spawn_remote_push};
use crate::AppState;
use shared::{NewWeekResponse, SettingsResponse, UpdateAllowancesRequest};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/state", get(get_state))
        .route("/settings", get(get_settings))
        .route("/settings/allowances", put(update_allowances))
        .route("/week/new", post(start_new_week))
}

fn settings_response(chores: &ChoreService) -> SettingsResponse {
    SettingsResponse {
        allowances: chores.state().settings.allowances.clone(),
        week_start: calendar::format_date(chores.week_start()),
    }
}

/// The whole application state in its stored shape
pub async fn get_state(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/state");

    let chores = state.chores.lock().await;
    (StatusCode::OK, Json(chores.state().clone())).into_response()
}

pub async fn get_settings(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/settings");

    let chores = state.chores.lock().await;
    (StatusCode::OK, Json(settings_response(&chores))).into_response()
}

pub async fn update_allowances(
    State(state): State<AppState>,
    Json(request): Json<UpdateAllowancesRequest>,
) -> impl IntoResponse {
    info!("PUT /api/settings/allowances - request: {:?}", request);

    let command = UpdateAllowancesCommand {
        allowances: request.allowances,
    };
    let mut chores = state.chores.lock().await;
    match chores.update_allowances(command) {
        Ok(()) => {
            let response = settings_response(&chores);
            drop(chores);
            spawn_remote_push(&state);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to update allowances: {}", e);
            error_response(e)
        }
    }
}

/// Move scoring to the current Monday; history is kept
pub async fn start_new_week(State(state): State<AppState>) -> impl IntoResponse {
    info!("POST /api/week/new");

    let mut chores = state.chores.lock().await;
    let monday = chores.start_new_week();
    drop(chores);
    spawn_remote_push(&state);

    let response = NewWeekResponse {
        week_start: calendar::format_date(monday),
        success_message: format!("New week started on {}", calendar::format_date(monday)),
    };
    (StatusCode::OK, Json(response)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::rest::test_support::{read_json, send, setup_test_state};
    use axum::http::Method;
    use chrono::NaiveDate;
    use serde_json::{json, Value};

    fn app(state: AppState) -> Router {
        router().with_state(state)
    }

    #[tokio::test]
    async fn test_update_allowances() {
        let state = setup_test_state();
        let body = json!({"allowances": {"olive": 60.0, "zander": 25.5}});
        let response = send(app(state.clone()), Method::PUT, "/settings/allowances", Some(body)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let settings: SettingsResponse = read_json(response).await;
        assert_eq!(settings.allowances["olive"], 60.0);
        assert_eq!(settings.allowances["miles"], 30.0);
        assert_eq!(settings.allowances["zander"], 25.5);
    }

    #[tokio::test]
    async fn test_invalid_allowances_change_nothing() {
        let state = setup_test_state();

        let body = json!({"allowances": {"olive": 60.0, "miles": -1.0}});
        let response = send(app(state.clone()), Method::PUT, "/settings/allowances", Some(body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = json!({"allowances": {"nobody": 10.0}});
        let response = send(app(state.clone()), Method::PUT, "/settings/allowances", Some(body)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(app(state), Method::GET, "/settings", None).await;
        let settings: SettingsResponse = read_json(response).await;
        assert_eq!(settings.allowances["olive"], 50.0);
    }

    #[tokio::test]
    async fn test_start_new_week_moves_week_start() {
        let state = setup_test_state();
        {
            let mut chores = state.chores.lock().await;
            let mut data = chores.state().clone();
            data.settings.week_start = NaiveDate::from_ymd_opt(2026, 9, 28);
            chores.replace_state(data);
        }

        let response = send(app(state.clone()), Method::POST, "/week/new", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let new_week: NewWeekResponse = read_json(response).await;
        assert_eq!(new_week.week_start, "2026-10-12");

        let response = send(app(state), Method::GET, "/settings", None).await;
        let settings: SettingsResponse = read_json(response).await;
        assert_eq!(settings.week_start, "2026-10-12");
    }

    #[tokio::test]
    async fn test_state_is_the_stored_shape() {
        let state = setup_test_state();
        let response = send(app(state), Method::GET, "/state", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let document: Value = read_json(response).await;
        assert!(document["children"]["olive"].is_object());
        assert_eq!(document["settings"]["weekStart"], "2026-10-12");
        assert!(document["pointAdjustments"].as_array().unwrap().is_empty());
    }
}
