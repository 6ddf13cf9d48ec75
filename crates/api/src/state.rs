use std::sync::Arc;

use stylecast_pipeline::{BatchPipeline, CallbackProcessor};
use stylecast_store::{ObjectStore, TaskStore};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable (everything is behind `Arc` or is already `Clone`).
/// There is deliberately no other shared mutable state between request
/// handlers; the task store is the only rendezvous point between the
/// callback receiver and waiting reconcilers.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Durable task records.
    pub tasks: TaskStore,
    /// Blob storage for materialized results and artifacts.
    pub blobs: Arc<dyn ObjectStore>,
    /// Webhook payload processing.
    pub callbacks: CallbackProcessor,
    /// Per-reference batch orchestration.
    pub pipeline: Arc<BatchPipeline>,
}
