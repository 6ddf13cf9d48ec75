//! Durable task persistence for Stylecast.
//!
//! The blob/object backend is an external collaborator reached through the
//! [`ObjectStore`] trait (put/get/list by key). [`TaskStore`] layers the
//! task-record lifecycle on top of it: one JSON document per task id, no
//! transactions, last-write-wins between concurrent writers. This store is
//! the only rendezvous point between the webhook receiver and reconcilers
//! waiting on a task.

pub mod object_store;
pub mod task_store;

pub use object_store::{MemoryObjectStore, ObjectStore};
pub use task_store::TaskStore;

/// Errors from the storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An update targeted a task id with no persisted record. Callers
    /// treat this as a soft failure to log, not a fatal error.
    #[error("Task not found: {0}")]
    NotFound(String),

    /// The object-store backend rejected or failed the operation.
    #[error("Storage backend error: {0}")]
    Backend(String),

    /// A persisted record could not be encoded or decoded.
    #[error("Task record serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
