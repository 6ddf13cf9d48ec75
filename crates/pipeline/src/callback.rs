//! Processing of provider completion webhooks.
//!
//! The webhook write is the authoritative completion signal: it turns a
//! `pending` task record terminal so that any reconciler polling the
//! store observes the outcome. Processing is idempotent: replaying an
//! identical payload re-runs materialization and overwrites the record
//! with an equivalent result.

use std::sync::Arc;

use bytes::Bytes;
use stylecast_core::task::{TaskStatus, TaskUpdate};
use stylecast_render::types::parse_result_json;
use stylecast_render::{CallbackData, JobState, RenderApiError};
use stylecast_store::{ObjectStore, StoreError, TaskStore};

use crate::fetch::Fetcher;
use crate::PipelineError;

/// What processing a callback amounted to.
#[derive(Debug, PartialEq, Eq)]
pub enum CallbackOutcome {
    /// Task marked `completed`; `materialized` result URLs were fetched
    /// and persisted (possibly zero).
    Completed { materialized: usize },
    /// Task marked `failed` with the provider's message.
    Failed,
    /// No record exists for the task id. Nothing is fabricated; the
    /// HTTP layer answers not-found.
    UnknownTask,
    /// The payload reported a non-terminal state; ignored.
    Ignored,
}

/// Applies webhook payloads to the task store.
#[derive(Clone)]
pub struct CallbackProcessor {
    tasks: TaskStore,
    blobs: Arc<dyn ObjectStore>,
    fetcher: Arc<dyn Fetcher>,
}

impl CallbackProcessor {
    pub fn new(tasks: TaskStore, blobs: Arc<dyn ObjectStore>, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            tasks,
            blobs,
            fetcher,
        }
    }

    /// Apply one webhook payload.
    ///
    /// On success payloads, each result URL is fetched and persisted
    /// independently; a failed fetch drops that URL from the final list
    /// without failing the callback. Zero surviving URLs still mark the
    /// task `completed` with an empty list; the store stays an honest
    /// record of the provider's verdict, and waiting callers surface
    /// that as an empty-result error.
    pub async fn process(&self, payload: CallbackData) -> Result<CallbackOutcome, PipelineError> {
        let task_id = payload.task_id.as_str();

        if self.tasks.get(task_id).await?.is_none() {
            tracing::warn!(task_id, "Callback for unknown task, ignoring");
            return Ok(CallbackOutcome::UnknownTask);
        }

        match payload.state {
            JobState::Success => self.complete(task_id, &payload).await,
            JobState::Failed => self.fail(task_id, &payload).await,
            JobState::InProgress => {
                tracing::warn!(task_id, "Callback carried a non-terminal state, ignoring");
                Ok(CallbackOutcome::Ignored)
            }
        }
    }

    async fn complete(
        &self,
        task_id: &str,
        payload: &CallbackData,
    ) -> Result<CallbackOutcome, PipelineError> {
        let urls = match payload.result_json.as_deref() {
            Some(raw) => parse_result_json(raw).map_err(|e| {
                RenderApiError::Protocol(format!("undecodable resultJson in callback: {e}"))
            })?,
            None => Vec::new(),
        };

        let mut survivors = Vec::with_capacity(urls.len());
        for (index, url) in urls.iter().enumerate() {
            match self.materialize(task_id, index, url).await {
                Ok(()) => survivors.push(url.clone()),
                Err(e) => {
                    tracing::warn!(task_id, url = %url, error = %e, "Dropping result URL that failed to materialize");
                }
            }
        }

        let update = TaskUpdate {
            status: Some(TaskStatus::Completed),
            result_refs: Some(survivors.clone()),
            consume_credits: payload.consume_credits,
            cost_time: payload.cost_time,
            ..Default::default()
        };

        match self.tasks.update(task_id, update).await {
            Ok(_) => {
                tracing::info!(task_id, materialized = survivors.len(), "Task completed via callback");
                Ok(CallbackOutcome::Completed {
                    materialized: survivors.len(),
                })
            }
            // Record vanished between the existence check and the write.
            Err(StoreError::NotFound(_)) => Ok(CallbackOutcome::UnknownTask),
            Err(e) => Err(e.into()),
        }
    }

    async fn fail(
        &self,
        task_id: &str,
        payload: &CallbackData,
    ) -> Result<CallbackOutcome, PipelineError> {
        let message = payload
            .fail_msg
            .clone()
            .unwrap_or_else(|| "render job failed with no message".to_string());

        let update = TaskUpdate {
            status: Some(TaskStatus::Failed),
            error: Some(message.clone()),
            ..Default::default()
        };

        match self.tasks.update(task_id, update).await {
            Ok(_) => {
                tracing::info!(task_id, error = %message, "Task failed via callback");
                Ok(CallbackOutcome::Failed)
            }
            Err(StoreError::NotFound(_)) => Ok(CallbackOutcome::UnknownTask),
            Err(e) => Err(e.into()),
        }
    }

    /// Fetch one result URL and persist its bytes to blob storage.
    async fn materialize(&self, task_id: &str, index: usize, url: &str) -> Result<(), PipelineError> {
        let bytes: Bytes = self
            .fetcher
            .fetch(url)
            .await
            .map_err(|source| PipelineError::Download {
                url: url.to_string(),
                source,
            })?;

        let key = format!("artifacts/{task_id}/{index}.png");
        self.blobs.put(&key, bytes).await?;
        Ok(())
    }
}
