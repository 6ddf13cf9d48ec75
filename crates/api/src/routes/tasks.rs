//! Public task-status query endpoint.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use stylecast_core::task::{Task, TaskStatus};

use crate::error::AppResult;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/task-status", get(task_status))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskStatusParams {
    task_id: String,
}

/// Public view of a task record.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TaskStatusResponse {
    task_id: String,
    status: TaskStatus,
    prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    result_urls: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<Task> for TaskStatusResponse {
    fn from(task: Task) -> Self {
        let result_urls = if task.result_refs.is_empty() {
            None
        } else {
            Some(task.result_refs)
        };
        Self {
            task_id: task.id,
            status: task.status,
            prompt: task.prompt,
            result_urls,
            error: task.error,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

/// GET /api/v1/task-status?taskId=<id>
///
/// Read-only view of the durable task record; safe to poll from
/// clients. 404 when the id is unknown.
async fn task_status(
    State(state): State<AppState>,
    Query(params): Query<TaskStatusParams>,
) -> AppResult<impl IntoResponse> {
    match state.tasks.get(&params.task_id).await? {
        Some(task) => Ok(Json(TaskStatusResponse::from(task)).into_response()),
        None => Ok((
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "Task not found",
                "taskId": params.task_id,
            })),
        )
            .into_response()),
    }
}
