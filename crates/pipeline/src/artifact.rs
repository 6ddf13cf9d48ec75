//! Persistence of completed batch outputs.

use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use stylecast_store::ObjectStore;

use crate::PipelineError;

/// Durable output of one successful batch item: image bytes plus a
/// metadata record, written once and immutable afterward.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    /// Blob key holding the image bytes.
    pub image_key: String,
    /// Blob key holding the metadata JSON record.
    pub metadata_key: String,
    pub task_id: String,
    /// Reference image the artifact was generated from.
    pub source_ref: String,
    pub character: Option<String>,
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Metadata document stored beside the image bytes.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ArtifactRecord<'a> {
    task_id: &'a str,
    source_ref: &'a str,
    character: Option<&'a str>,
    prompt: &'a str,
    title: Option<&'a str>,
    created_at: DateTime<Utc>,
}

/// Writes artifacts (bytes + metadata) to blob storage.
#[derive(Clone)]
pub struct ArtifactPersister {
    blobs: Arc<dyn ObjectStore>,
}

impl ArtifactPersister {
    pub fn new(blobs: Arc<dyn ObjectStore>) -> Self {
        Self { blobs }
    }

    /// Persist one artifact under a fresh gallery id.
    pub async fn persist(
        &self,
        task_id: &str,
        source_ref: &str,
        character: Option<&str>,
        prompt: &str,
        title: Option<&str>,
        bytes: Bytes,
    ) -> Result<Artifact, PipelineError> {
        let gallery_id = uuid::Uuid::new_v4();
        let image_key = format!("gallery/{gallery_id}.png");
        let metadata_key = format!("gallery/{gallery_id}.json");
        let created_at = Utc::now();

        let record = ArtifactRecord {
            task_id,
            source_ref,
            character,
            prompt,
            title,
            created_at,
        };
        let metadata =
            serde_json::to_vec(&record).map_err(stylecast_store::StoreError::Serialization)?;

        self.blobs.put(&image_key, bytes).await?;
        self.blobs.put(&metadata_key, Bytes::from(metadata)).await?;

        tracing::info!(task_id, %image_key, "Artifact persisted");

        Ok(Artifact {
            image_key,
            metadata_key,
            task_id: task_id.to_string(),
            source_ref: source_ref.to_string(),
            character: character.map(str::to_string),
            title: title.map(str::to_string),
            created_at,
        })
    }
}
