//! Task lifecycle model for asynchronous render jobs.
//!
//! A [`Task`] is created in `pending` when a job is submitted to the
//! render provider and moves into exactly one terminal state: `completed`
//! or `failed` (written by the callback receiver) or `timeout` (written by
//! a reconciler that exhausted its poll budget). Transitions are
//! forward-only; the store itself is last-write-wins, so the state machine
//! is a contract for callers, not a lock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle status of a render task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Submitted to the provider, no completion signal yet.
    Pending,
    /// The provider has reported work in progress.
    Processing,
    /// The provider reported success via the callback.
    Completed,
    /// The provider reported failure via the callback.
    Failed,
    /// A reconciler exhausted its poll budget waiting for a signal.
    Timeout,
}

impl TaskStatus {
    /// Whether this status is terminal (no further transitions expected).
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Timeout)
    }
}

/// Whether `from -> to` is a well-formed status transition.
///
/// Non-terminal states may move forward to any other state; terminal
/// states absorb everything except a rewrite to the same value (callback
/// replays overwrite with an equivalent record).
pub fn can_transition(from: TaskStatus, to: TaskStatus) -> bool {
    if from.is_terminal() {
        from == to
    } else {
        true
    }
}

// ---------------------------------------------------------------------------
// Task entity
// ---------------------------------------------------------------------------

/// One unit of asynchronous work submitted to the render provider.
///
/// Serialized field names match the persisted JSON document layout
/// (`tasks/<id>.json`) and the public task-status response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Provider-assigned task id.
    pub id: String,
    pub status: TaskStatus,
    /// The prompt the job was submitted with.
    pub prompt: String,
    /// Reference image this task renders from.
    pub input_ref: String,
    /// Provider result URLs that were successfully materialized.
    #[serde(default)]
    pub result_refs: Vec<String>,
    /// Character the batch was run for, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Provider-supplied failure message, verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Credits the provider billed for this job.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consume_credits: Option<i64>,
    /// Wall-clock milliseconds the provider spent on this job.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_time: Option<i64>,
}

impl Task {
    /// Create a fresh `pending` task record at submission time.
    pub fn pending(id: String, prompt: String, input_ref: String, character: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            status: TaskStatus::Pending,
            prompt,
            input_ref,
            result_refs: Vec::new(),
            character,
            created_at: now,
            updated_at: now,
            error: None,
            consume_credits: None,
            cost_time: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Partial update
// ---------------------------------------------------------------------------

/// Partial field set merged into an existing [`Task`] by the store.
///
/// `None` fields are left untouched; the store stamps `updated_at` on
/// every merge.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub status: Option<TaskStatus>,
    pub result_refs: Option<Vec<String>>,
    pub error: Option<String>,
    pub consume_credits: Option<i64>,
    pub cost_time: Option<i64>,
}

impl TaskUpdate {
    /// Merge this partial into `task`, stamping `updated_at`.
    pub fn apply(self, task: &mut Task) {
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(result_refs) = self.result_refs {
            task.result_refs = result_refs;
        }
        if let Some(error) = self.error {
            task.error = Some(error);
        }
        if let Some(credits) = self.consume_credits {
            task.consume_credits = Some(credits);
        }
        if let Some(cost_time) = self.cost_time {
            task.cost_time = Some(cost_time);
        }
        task.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // Status transitions
    // -----------------------------------------------------------------------

    #[test]
    fn pending_to_completed_is_valid() {
        assert!(can_transition(TaskStatus::Pending, TaskStatus::Completed));
    }

    #[test]
    fn pending_to_failed_is_valid() {
        assert!(can_transition(TaskStatus::Pending, TaskStatus::Failed));
    }

    #[test]
    fn pending_to_timeout_is_valid() {
        assert!(can_transition(TaskStatus::Pending, TaskStatus::Timeout));
    }

    #[test]
    fn processing_to_completed_is_valid() {
        assert!(can_transition(TaskStatus::Processing, TaskStatus::Completed));
    }

    #[test]
    fn completed_does_not_leave_terminal() {
        assert!(!can_transition(TaskStatus::Completed, TaskStatus::Pending));
        assert!(!can_transition(TaskStatus::Completed, TaskStatus::Failed));
        assert!(!can_transition(TaskStatus::Completed, TaskStatus::Timeout));
    }

    #[test]
    fn failed_does_not_leave_terminal() {
        assert!(!can_transition(TaskStatus::Failed, TaskStatus::Completed));
    }

    #[test]
    fn terminal_rewrite_to_same_value_is_allowed() {
        // Callback replays overwrite with an equivalent record.
        assert!(can_transition(TaskStatus::Completed, TaskStatus::Completed));
        assert!(can_transition(TaskStatus::Failed, TaskStatus::Failed));
    }

    #[test]
    fn terminal_statuses_report_terminal() {
        assert!(TaskStatus::Completed.is_terminal());
        assert!(TaskStatus::Failed.is_terminal());
        assert!(TaskStatus::Timeout.is_terminal());
        assert!(!TaskStatus::Pending.is_terminal());
        assert!(!TaskStatus::Processing.is_terminal());
    }

    // -----------------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------------

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::Completed).unwrap(),
            "\"completed\""
        );
        assert_eq!(
            serde_json::from_str::<TaskStatus>("\"timeout\"").unwrap(),
            TaskStatus::Timeout
        );
    }

    #[test]
    fn task_round_trips_with_camel_case_fields() {
        let task = Task::pending(
            "abc123".into(),
            "a portrait".into(),
            "https://example.com/ref.png".into(),
            Some("aurora".into()),
        );
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["id"], "abc123");
        assert_eq!(json["status"], "pending");
        assert_eq!(json["inputRef"], "https://example.com/ref.png");
        assert!(json["resultRefs"].as_array().unwrap().is_empty());
        assert!(json.get("error").is_none());

        let back: Task = serde_json::from_value(json).unwrap();
        assert_eq!(back.status, TaskStatus::Pending);
        assert_eq!(back.character.as_deref(), Some("aurora"));
    }

    // -----------------------------------------------------------------------
    // Partial update
    // -----------------------------------------------------------------------

    #[test]
    fn update_merges_only_supplied_fields() {
        let mut task = Task::pending("t1".into(), "p".into(), "r".into(), None);
        let before = task.updated_at;

        TaskUpdate {
            status: Some(TaskStatus::Completed),
            result_refs: Some(vec!["https://x/y.png".into()]),
            consume_credits: Some(4),
            ..Default::default()
        }
        .apply(&mut task);

        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.result_refs, vec!["https://x/y.png".to_string()]);
        assert_eq!(task.consume_credits, Some(4));
        assert_eq!(task.error, None);
        assert_eq!(task.prompt, "p");
        assert!(task.updated_at >= before);
    }
}
