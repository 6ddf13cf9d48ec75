//! Integration tests for the public task-status endpoint.

mod common;

use axum::http::StatusCode;
use common::{body_json, get};
use stylecast_core::task::Task;

#[tokio::test]
async fn unknown_task_returns_404_with_task_id() {
    let harness = common::build_test_app();

    let response = get(harness.app, "/api/v1/task-status?taskId=missing").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["taskId"], "missing");
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn pending_task_omits_results_and_error() {
    let harness = common::build_test_app();
    harness
        .tasks
        .save(&Task::pending(
            "t1".into(),
            "a portrait".into(),
            "https://refs/a.png".into(),
            Some("aurora".into()),
        ))
        .await
        .unwrap();

    let response = get(harness.app, "/api/v1/task-status?taskId=t1").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["taskId"], "t1");
    assert_eq!(json["status"], "pending");
    assert_eq!(json["prompt"], "a portrait");
    assert!(json.get("resultUrls").is_none());
    assert!(json.get("error").is_none());
    assert!(json["createdAt"].is_string());
    assert!(json["updatedAt"].is_string());
}

#[tokio::test]
async fn missing_query_parameter_is_a_client_error() {
    let harness = common::build_test_app();

    let response = get(harness.app, "/api/v1/task-status").await;
    assert!(
        response.status().is_client_error(),
        "expected 4xx, got {}",
        response.status()
    );
}
