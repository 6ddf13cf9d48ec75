//! Per-reference batch pipeline with item-level failure isolation.
//!
//! References are processed sequentially, not fanned out: that bounds
//! the number of outstanding provider jobs and keeps provider-side rate
//! limits simple. Every error inside one item is caught at the item
//! boundary and recorded; a batch run never fails as a whole.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use stylecast_core::task::Task;
use stylecast_render::{AspectRatio, JobClient};
use stylecast_store::TaskStore;

use crate::artifact::{Artifact, ArtifactPersister};
use crate::fetch::{resolve_result_ref, Fetcher};
use crate::reconciler::{await_completion, PollBudget};
use crate::PipelineError;

// ---------------------------------------------------------------------------
// Collaborator seams
// ---------------------------------------------------------------------------

/// Produces a textual description of a reference image.
///
/// The vision prompt text and its business rules live outside this
/// crate; the pipeline only needs the resulting description.
#[async_trait]
pub trait ReferenceDescriber: Send + Sync {
    async fn describe(&self, image_ref: &str) -> anyhow::Result<String>;
}

/// Generates auxiliary display text for a finished artifact.
///
/// Failures here are logged and swallowed; a missing title never fails
/// the item.
#[async_trait]
pub trait TitleWriter: Send + Sync {
    async fn title(&self, character: &str, description: &str) -> anyhow::Result<String>;
}

// ---------------------------------------------------------------------------
// Outcome types
// ---------------------------------------------------------------------------

/// One reference that failed somewhere in the pipeline.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchFailure {
    /// The reference image the failure is scoped to.
    pub source_ref: String,
    pub error: String,
}

/// Combined result of a batch run. `artifacts.len() + failures.len()`
/// always equals the number of input references.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    pub artifacts: Vec<Artifact>,
    pub failures: Vec<BatchFailure>,
}

impl BatchOutcome {
    /// A batch is successful iff no item failed.
    pub fn success(&self) -> bool {
        self.failures.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Drives describe → submit → await → materialize for each reference.
pub struct BatchPipeline {
    jobs: Arc<dyn JobClient>,
    tasks: TaskStore,
    persister: ArtifactPersister,
    fetcher: Arc<dyn Fetcher>,
    describer: Arc<dyn ReferenceDescriber>,
    titles: Arc<dyn TitleWriter>,
    budget: PollBudget,
}

impl BatchPipeline {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        jobs: Arc<dyn JobClient>,
        tasks: TaskStore,
        persister: ArtifactPersister,
        fetcher: Arc<dyn Fetcher>,
        describer: Arc<dyn ReferenceDescriber>,
        titles: Arc<dyn TitleWriter>,
        budget: PollBudget,
    ) -> Self {
        Self {
            jobs,
            tasks,
            persister,
            fetcher,
            describer,
            titles,
            budget,
        }
    }

    /// Run the pipeline over every reference for one character.
    ///
    /// Never errors past its own boundary: each item's failure is
    /// recorded and iteration continues with the next reference.
    pub async fn run(&self, character: &str, references: &[String]) -> BatchOutcome {
        let mut artifacts = Vec::new();
        let mut failures = Vec::new();

        for reference in references {
            match self.run_item(character, reference).await {
                Ok(artifact) => artifacts.push(artifact),
                Err(e) => {
                    tracing::warn!(character, source_ref = %reference, error = %e, "Batch item failed");
                    failures.push(BatchFailure {
                        source_ref: reference.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            character,
            total = references.len(),
            succeeded = artifacts.len(),
            failed = failures.len(),
            "Batch run finished",
        );

        BatchOutcome {
            artifacts,
            failures,
        }
    }

    /// Process a single reference end to end.
    async fn run_item(&self, character: &str, reference: &str) -> Result<Artifact, PipelineError> {
        // 1. Describe the reference image.
        let description = self.describer.describe(reference).await?;

        // 2. Compose the prompt and submit the job. Prompt business
        //    rules live with the describer collaborator; this is only
        //    the assembly.
        let prompt = compose_prompt(character, &description);
        let image_refs = [reference.to_string()];
        let task_id = self
            .jobs
            .submit(&prompt, &image_refs, AspectRatio::Portrait)
            .await?;

        // 3. Write the initial pending record the webhook will complete.
        let task = Task::pending(
            task_id.clone(),
            prompt.clone(),
            reference.to_string(),
            Some(character.to_string()),
        );
        self.tasks.save(&task).await?;

        // 4. Wait for the callback to land in the store.
        let result_refs = await_completion(&self.tasks, &task_id, self.budget).await?;

        // 5. Resolve the first result to raw bytes.
        let bytes = resolve_result_ref(self.fetcher.as_ref(), &result_refs[0]).await?;

        // 6. Auxiliary title; logged and swallowed on failure.
        let title = match self.titles.title(character, &description).await {
            Ok(title) => Some(title),
            Err(e) => {
                tracing::warn!(task_id, error = %e, "Title generation failed, continuing without");
                None
            }
        };

        // 7. Persist the artifact.
        self.persister
            .persist(
                &task_id,
                reference,
                Some(character),
                &prompt,
                title.as_deref(),
                bytes,
            )
            .await
    }
}

/// Assemble the generation prompt from the character and the reference
/// description.
fn compose_prompt(character: &str, description: &str) -> String {
    format!("Full-body portrait of {character}. {description}")
}
