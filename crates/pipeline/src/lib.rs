//! Orchestration of asynchronous render jobs.
//!
//! The hard coordination problem lives here: a job's completion arrives
//! on a separate HTTP request (the provider webhook) with no guaranteed
//! delivery, while the submitting pipeline waits on the durable task
//! store as the only rendezvous point. [`reconciler`] polls that store,
//! [`callback`] writes the terminal record the reconciler is waiting to
//! observe, and [`batch`] drives the per-reference pipeline with failure
//! isolation at each item boundary.

pub mod artifact;
pub mod batch;
pub mod callback;
pub mod fetch;
pub mod reconciler;

use stylecast_core::error::CoreError;
use stylecast_render::RenderApiError;
use stylecast_store::StoreError;

pub use artifact::{Artifact, ArtifactPersister};
pub use batch::{BatchFailure, BatchOutcome, BatchPipeline, ReferenceDescriber, TitleWriter};
pub use callback::{CallbackOutcome, CallbackProcessor};
pub use fetch::{resolve_result_ref, Fetcher, HttpFetcher};
pub use reconciler::{await_completion, PollBudget};

/// Errors raised while driving a render job to completion.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The provider reported the job as failed.
    #[error("Render job failed: {0}")]
    JobFailed(String),

    /// The poll budget was exhausted without a terminal status, or a
    /// previous reconciler attempt already stamped the task `timeout`.
    #[error("Timed out waiting for render callback on task {0}")]
    Timeout(String),

    /// The task completed but carried no usable result reference.
    #[error("Task {0} completed with no usable result")]
    EmptyResult(String),

    /// A result reference was neither an inline data-URI nor an HTTPS URL.
    #[error("Unsupported result format: {0}")]
    UnsupportedResultFormat(String),

    /// One result URL failed to download. Isolated per URL inside the
    /// callback path; fatal only when the pipeline resolves its chosen
    /// artifact bytes.
    #[error("Failed to download result from {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: anyhow::Error,
    },

    /// Error from the render provider client.
    #[error(transparent)]
    Render(#[from] RenderApiError),

    /// Error from the task/blob store.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Domain-level error (result-reference decoding and friends).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// An external collaborator (describer, titler) failed.
    #[error("Collaborator call failed: {0}")]
    Collaborator(#[from] anyhow::Error),
}
