//! # REST API for Children and Tasks
//!
//! Endpoints for listing children and managing each child's recurring tasks.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post, put},
    Router,
};
use tracing::{error, info};

use crate::domain::errors::ChoreError;
use crate::io::rest::mappers::child_mapper::ChildMapper;
use crate::io::rest::mappers::task_mapper::TaskMapper;
use crate::io::rest::{error_response, spawn_remote_push};
use crate::AppState;
use shared::{CreateTaskRequest, UpdateTaskRequest};

/// Create a router for child and task APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/children", get(list_children))
        .route("/children/:child_id", get(get_child))
        .route("/tasks", post(create_task))
        .route("/children/:child_id/tasks/:task_id", put(update_task).delete(delete_task))
}

/// List every child with their tasks and allowance
pub async fn list_children(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/children");

    let chores = state.chores.lock().await;
    let response = ChildMapper::to_child_list_dto(chores.state());
    (StatusCode::OK, Json(response)).into_response()
}

pub async fn get_child(State(state): State<AppState>, Path(child_id): Path<String>) -> impl IntoResponse {
    info!("GET /api/children/{}", child_id);

    let chores = state.chores.lock().await;
    match ChildMapper::to_dto(chores.state(), &child_id) {
        Some(child) => (StatusCode::OK, Json(child)).into_response(),
        None => error_response(ChoreError::child_not_found(&child_id)),
    }
}

/// Add a task to one or more children
pub async fn create_task(State(state): State<AppState>, Json(request): Json<CreateTaskRequest>) -> impl IntoResponse {
    info!("POST /api/tasks - request: {:?}", request);

    let command = match TaskMapper::to_add_command(request) {
        Ok(command) => command,
        Err(e) => return error_response(e),
    };

    let mut chores = state.chores.lock().await;
    match chores.add_task(command) {
        Ok(tasks) => {
            drop(chores);
            spawn_remote_push(&state);
            (StatusCode::CREATED, Json(TaskMapper::to_create_response(&tasks))).into_response()
        }
        Err(e) => {
            error!("Failed to create task: {}", e);
            error_response(e)
        }
    }
}

/// Apply a partial update and return the task as stored
pub async fn update_task(
    State(state): State<AppState>,
    Path((child_id, task_id)): Path<(String, String)>,
    Json(request): Json<UpdateTaskRequest>,
) -> impl IntoResponse {
    info!("PUT /api/children/{}/tasks/{} - request: {:?}", child_id, task_id, request);

    let patch = match TaskMapper::to_patch(request) {
        Ok(patch) => patch,
        Err(e) => return error_response(e),
    };

    let mut chores = state.chores.lock().await;
    if let Err(e) = chores.update_task(&child_id, &task_id, patch) {
        error!("Failed to update task {}: {}", task_id, e);
        return error_response(e);
    }

    let Some(task) = chores.state().child(&child_id).and_then(|child| child.task(&task_id)) else {
        return error_response(ChoreError::task_not_found(&task_id));
    };
    let response = TaskMapper::to_dto(task);
    drop(chores);
    spawn_remote_push(&state);
    (StatusCode::OK, Json(response)).into_response()
}

/// Delete a task and its completion history. Unknown ids succeed quietly.
pub async fn delete_task(
    State(state): State<AppState>,
    Path((child_id, task_id)): Path<(String, String)>,
) -> impl IntoResponse {
    info!("DELETE /api/children/{}/tasks/{}", child_id, task_id);

    let mut chores = state.chores.lock().await;
    chores.delete_task(&child_id, &task_id);
    drop(chores);
    spawn_remote_push(&state);
    StatusCode::NO_CONTENT.into_response()
}
