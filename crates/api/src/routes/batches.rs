//! Batch generation endpoint.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use stylecast_pipeline::{Artifact, BatchFailure};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/batches", post(run_batch))
}

#[derive(Debug, Deserialize)]
struct BatchRequest {
    character: String,
    references: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchResponse {
    success: bool,
    artifacts: Vec<Artifact>,
    failures: Vec<BatchFailure>,
}

/// POST /api/v1/batches
///
/// Runs the generation pipeline over every reference for one character.
/// Only structurally invalid requests are rejected with 4xx; once the
/// batch starts, the response is always 200 with a per-item
/// success/failure breakdown; item errors never surface as an HTTP
/// error.
async fn run_batch(
    State(state): State<AppState>,
    Json(input): Json<BatchRequest>,
) -> AppResult<impl IntoResponse> {
    if input.character.trim().is_empty() {
        return Err(AppError::BadRequest("character must not be empty".into()));
    }
    if input.references.is_empty() {
        return Err(AppError::BadRequest(
            "references must contain at least one image".into(),
        ));
    }
    if input.references.iter().any(|r| r.trim().is_empty()) {
        return Err(AppError::BadRequest(
            "references must not contain empty entries".into(),
        ));
    }

    tracing::info!(
        character = %input.character,
        references = input.references.len(),
        "Batch run requested",
    );

    let outcome = state
        .pipeline
        .run(input.character.trim(), &input.references)
        .await;

    Ok(Json(BatchResponse {
        success: outcome.success(),
        artifacts: outcome.artifacts,
        failures: outcome.failures,
    }))
}
