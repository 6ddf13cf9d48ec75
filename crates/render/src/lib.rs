//! HTTP client for the external render provider.
//!
//! The provider runs image-generation jobs asynchronously: a job is
//! submitted with `createTask`, completion is pushed to a configured
//! callback URL, and `getTask` exists as a secondary query path. All
//! provider payloads are validated against the typed shapes in
//! [`types`]; anything off-shape is a protocol error, never coerced.

pub mod api;
pub mod types;

pub use api::{RenderApi, RenderApiError, RenderConfig};
pub use types::{AspectRatio, CallbackData, JobState, RecordInfo, RenderCallback};

/// Job submission seam for components that queue render work.
///
/// [`RenderApi`] is the production implementation; tests substitute
/// fakes that skip the network.
#[async_trait::async_trait]
pub trait JobClient: Send + Sync {
    /// Submit a job and return the provider-assigned task id.
    async fn submit(
        &self,
        prompt: &str,
        image_refs: &[String],
        aspect_ratio: AspectRatio,
    ) -> Result<String, RenderApiError>;
}

#[async_trait::async_trait]
impl JobClient for RenderApi {
    async fn submit(
        &self,
        prompt: &str,
        image_refs: &[String],
        aspect_ratio: AspectRatio,
    ) -> Result<String, RenderApiError> {
        RenderApi::submit(self, prompt, image_refs, aspect_ratio).await
    }
}
