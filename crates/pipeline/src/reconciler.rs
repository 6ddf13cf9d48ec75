//! Bounded polling against the durable task store.
//!
//! Completion is detected by re-reading *local* durable state on a fixed
//! interval, never by re-querying the provider: the webhook is the sole
//! authoritative completion signal. If the webhook never lands, this
//! loop alone drives the task to `timeout`.

use std::time::Duration;

use stylecast_core::task::{TaskStatus, TaskUpdate};
use stylecast_store::TaskStore;

use crate::PipelineError;

/// Attempt count and sleep interval for one reconciliation wait.
///
/// The caller is committed to the full `max_attempts * interval` budget
/// in the worst case; there is no cancellation and no event-driven
/// wake-up.
#[derive(Debug, Clone, Copy)]
pub struct PollBudget {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for PollBudget {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            interval: Duration::from_millis(2000),
        }
    }
}

impl PollBudget {
    /// Total wall-clock seconds this budget can wait.
    fn total_secs(self) -> u64 {
        (u128::from(self.max_attempts) * self.interval.as_millis() / 1000) as u64
    }
}

/// Wait for a task to reach a terminal status and return its result refs.
///
/// Each attempt reads the task record once:
/// - absent record: keep waiting (the submission write may not have
///   landed yet on this read path);
/// - `completed`: return `result_refs`, or [`PipelineError::EmptyResult`]
///   when the list is empty;
/// - `failed`: [`PipelineError::JobFailed`] with the stored error;
/// - `timeout` (stamped by a previous attempt that already gave up):
///   [`PipelineError::Timeout`] immediately;
/// - otherwise sleep `budget.interval` and retry.
///
/// On budget exhaustion the task is best-effort stamped `timeout` (a
/// failed stamp is logged, not raised) and [`PipelineError::Timeout`] is
/// returned.
pub async fn await_completion(
    store: &TaskStore,
    task_id: &str,
    budget: PollBudget,
) -> Result<Vec<String>, PipelineError> {
    for attempt in 1..=budget.max_attempts {
        match store.get(task_id).await? {
            None => {
                tracing::debug!(task_id, attempt, "No task record visible yet, still waiting");
            }
            Some(task) => match task.status {
                TaskStatus::Completed => {
                    if task.result_refs.is_empty() {
                        return Err(PipelineError::EmptyResult(task_id.to_string()));
                    }
                    tracing::info!(
                        task_id,
                        attempt,
                        results = task.result_refs.len(),
                        "Task completed",
                    );
                    return Ok(task.result_refs);
                }
                TaskStatus::Failed => {
                    return Err(PipelineError::JobFailed(
                        task.error
                            .unwrap_or_else(|| "render job failed with no message".to_string()),
                    ));
                }
                TaskStatus::Timeout => {
                    return Err(PipelineError::Timeout(task_id.to_string()));
                }
                TaskStatus::Pending | TaskStatus::Processing => {
                    tracing::trace!(task_id, attempt, status = ?task.status, "Task not terminal yet");
                }
            },
        }

        tokio::time::sleep(budget.interval).await;
    }

    let waited_secs = budget.total_secs();
    tracing::warn!(task_id, waited_secs, "Poll budget exhausted, stamping timeout");

    let stamp = TaskUpdate {
        status: Some(TaskStatus::Timeout),
        error: Some(format!("waited {waited_secs}s")),
        ..Default::default()
    };
    if let Err(e) = store.update(task_id, stamp).await {
        tracing::warn!(task_id, error = %e, "Failed to record timeout status");
    }

    Err(PipelineError::Timeout(task_id.to_string()))
}
