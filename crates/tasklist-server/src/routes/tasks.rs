use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tasklist_core::task::{CreateTask, UpdateTask};
use tasklist_service::TaskService;

use super::AppState;
use crate::error::{ApiError, ApiJson};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route(
            "/api/tasks/{id}",
            get(get_task).patch(update_task).delete(delete_task),
        )
}

async fn list_tasks(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let tasks = state.service.list_tasks().await?;
    Ok(Json(json!(tasks)))
}

async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let task = state.service.get_task(&id).await?;
    Ok(Json(json!(task)))
}

async fn create_task(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateTask>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let task = state.service.create_task(&input).await?;
    Ok((StatusCode::CREATED, Json(json!(task))))
}

async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<UpdateTask>,
) -> Result<Json<Value>, ApiError> {
    state.service.update_task(&id, &input).await?;
    Ok(Json(json!({ "message": "Task updated successfully" })))
}

async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.service.delete_task(&id).await?;
    Ok(Json(json!({ "message": "Task deleted successfully" })))
}
