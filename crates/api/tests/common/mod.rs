//! Shared test harness for HTTP-level integration tests.
//!
//! Builds the full application router with the same middleware stack as
//! `main.rs` (CORS, request ID, timeout, panic recovery, tracing) so
//! tests exercise what production runs, with an in-memory object store
//! and scripted provider/collaborator fakes in place of the network.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, Response, StatusCode};
use axum::Router;
use bytes::Bytes;
use http_body_util::BodyExt;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use stylecast_api::collaborators::{TemplateDescriber, TemplateTitles};
use stylecast_api::config::ServerConfig;
use stylecast_api::routes;
use stylecast_api::state::AppState;
use stylecast_core::task::{TaskStatus, TaskUpdate};
use stylecast_pipeline::{
    ArtifactPersister, BatchPipeline, CallbackProcessor, Fetcher, PollBudget,
};
use stylecast_render::{AspectRatio, JobClient, RenderApiError};
use stylecast_store::{MemoryObjectStore, TaskStore};

/// Handles into the app under test.
pub struct TestApp {
    pub app: Router,
    pub tasks: TaskStore,
    pub blobs: Arc<MemoryObjectStore>,
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
    }
}

/// Fetcher that serves fixed bytes for any URL.
pub struct StaticFetcher;

#[async_trait]
impl Fetcher for StaticFetcher {
    async fn fetch(&self, _url: &str) -> anyhow::Result<Bytes> {
        Ok(Bytes::from_static(b"png-bytes"))
    }
}

/// Job client that simulates the provider: assigns sequential task ids
/// and lands a webhook-equivalent `completed` write shortly after
/// submission.
pub struct CompletingJobClient {
    tasks: TaskStore,
    counter: AtomicUsize,
}

impl CompletingJobClient {
    pub fn new(tasks: TaskStore) -> Self {
        Self {
            tasks,
            counter: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl JobClient for CompletingJobClient {
    async fn submit(
        &self,
        _prompt: &str,
        _image_refs: &[String],
        _aspect_ratio: AspectRatio,
    ) -> Result<String, RenderApiError> {
        let task_id = format!("task-{}", self.counter.fetch_add(1, Ordering::SeqCst));
        let tasks = self.tasks.clone();
        let id = task_id.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            let _ = tasks
                .update(
                    &id,
                    TaskUpdate {
                        status: Some(TaskStatus::Completed),
                        result_refs: Some(vec!["https://cdn.test/out.png".into()]),
                        ..Default::default()
                    },
                )
                .await;
        });
        Ok(task_id)
    }
}

/// Build the app with the default scripted provider.
pub fn build_test_app() -> TestApp {
    build_test_app_with(|tasks| Arc::new(CompletingJobClient::new(tasks)))
}

/// Build the app with a custom job client, sharing the test task store.
pub fn build_test_app_with<F>(make_jobs: F) -> TestApp
where
    F: FnOnce(TaskStore) -> Arc<dyn JobClient>,
{
    let config = test_config();
    let blobs = Arc::new(MemoryObjectStore::new());
    let tasks = TaskStore::new(blobs.clone());

    let fetcher = Arc::new(StaticFetcher);
    let callbacks = CallbackProcessor::new(tasks.clone(), blobs.clone(), fetcher.clone());
    let pipeline = Arc::new(BatchPipeline::new(
        make_jobs(tasks.clone()),
        tasks.clone(),
        ArtifactPersister::new(blobs.clone()),
        fetcher,
        Arc::new(TemplateDescriber::new("outfit from {ref}".into())),
        Arc::new(TemplateTitles::new("{character}'s look".into())),
        PollBudget {
            max_attempts: 10,
            interval: Duration::from_millis(10),
        },
    ));

    let state = AppState {
        config: Arc::new(config),
        tasks: tasks.clone(),
        blobs: blobs.clone(),
        callbacks,
        pipeline,
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    let api = routes::api_routes()
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .merge(routes::batches::router());

    let app = Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", api)
        .layer(CatchPanicLayer::new())
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state);

    TestApp { app, tasks, blobs }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a GET request to the app.
pub async fn get(app: Router, uri: &str) -> Response<axum::body::Body> {
    app.oneshot(
        Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a POST request with a JSON body.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: serde_json::Value,
) -> Response<axum::body::Body> {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response<axum::body::Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
