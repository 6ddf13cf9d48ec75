//! Provider webhook endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;
use stylecast_pipeline::CallbackOutcome;
use stylecast_render::RenderCallback;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/callback", post(receive_callback))
}

/// POST /api/v1/callback
///
/// Receives the provider's completion push and reconciles it into the
/// task store. Replays are harmless: processing overwrites the record
/// with an equivalent result. A callback for an id we never submitted
/// gets 404 and writes nothing.
async fn receive_callback(
    State(state): State<AppState>,
    Json(payload): Json<RenderCallback>,
) -> AppResult<impl IntoResponse> {
    let task_id = payload.data.task_id.clone();
    let outcome = state.callbacks.process(payload.data).await?;

    let status_label = match outcome {
        CallbackOutcome::Completed { materialized } => {
            tracing::info!(task_id, materialized, "Callback reconciled");
            "completed"
        }
        CallbackOutcome::Failed => "failed",
        CallbackOutcome::Ignored => "ignored",
        CallbackOutcome::UnknownTask => {
            return Ok((
                StatusCode::NOT_FOUND,
                Json(json!({
                    "error": format!("Task {task_id} not found"),
                    "code": "NOT_FOUND",
                })),
            )
                .into_response());
        }
    };

    Ok((
        StatusCode::OK,
        Json(DataResponse {
            data: json!({ "taskId": task_id, "status": status_label }),
        }),
    )
        .into_response())
}
