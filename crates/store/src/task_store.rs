//! Task record persistence over an [`ObjectStore`].

use std::sync::Arc;

use bytes::Bytes;
use stylecast_core::task::{Task, TaskUpdate};

use crate::{ObjectStore, StoreError};

/// Key prefix under which task records are stored.
const TASK_PREFIX: &str = "tasks/";

/// Durable record of task lifecycle, keyed by task id.
///
/// Each task is one JSON document at `tasks/<id>.json`. `update` is a
/// read-modify-write with no locking; the documented access pattern is
/// one webhook writer plus zero-or-more reconciler timeout writers, so
/// last-write-wins is accepted.
#[derive(Clone)]
pub struct TaskStore {
    store: Arc<dyn ObjectStore>,
}

/// Deterministic storage key for a task id.
fn task_key(id: &str) -> String {
    format!("{TASK_PREFIX}{id}.json")
}

impl TaskStore {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Full upsert of a task record.
    pub async fn save(&self, task: &Task) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(task)?;
        self.store.put(&task_key(&task.id), Bytes::from(bytes)).await
    }

    /// Fetch a task record, or `None` if the id is unknown.
    pub async fn get(&self, id: &str) -> Result<Option<Task>, StoreError> {
        match self.store.get(&task_key(id)).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Merge `update` into the existing record and stamp `updated_at`.
    ///
    /// Returns [`StoreError::NotFound`] when the id has no record; callers
    /// log this rather than treating it as fatal.
    pub async fn update(&self, id: &str, update: TaskUpdate) -> Result<Task, StoreError> {
        let mut task = self
            .get(id)
            .await?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        update.apply(&mut task);
        self.save(&task).await?;
        Ok(task)
    }

    /// List ids of all persisted tasks.
    pub async fn list_ids(&self) -> Result<Vec<String>, StoreError> {
        let keys = self.store.list(TASK_PREFIX).await?;
        Ok(keys
            .into_iter()
            .filter_map(|k| {
                k.strip_prefix(TASK_PREFIX)
                    .and_then(|rest| rest.strip_suffix(".json"))
                    .map(str::to_string)
            })
            .collect())
    }
}
