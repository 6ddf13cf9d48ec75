//! REST client for the render provider's job endpoints.
//!
//! Wraps `createTask` (submission) and `getTask` (status query) using
//! [`reqwest`]. The client is stateless beyond the pooled HTTP
//! connection; task lifecycle lives in the task store, not here.

use serde::de::DeserializeOwned;

use crate::types::{ApiEnvelope, AspectRatio, CreatedTask, RecordInfo};

/// Connection settings for one render provider account.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Base HTTP URL of the job API, e.g. `https://api.provider.example/v1/jobs`.
    pub base_url: String,
    /// Bearer token for the provider account.
    pub api_key: String,
    /// Model name submitted with every job.
    pub model: String,
    /// Public URL the provider pushes completion webhooks to.
    pub callback_url: String,
}

/// HTTP client for the render provider's job API.
pub struct RenderApi {
    client: reqwest::Client,
    config: RenderConfig,
}

/// Errors from the render API layer.
#[derive(Debug, thiserror::Error)]
pub enum RenderApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider rejected the request: non-2xx HTTP status, or a 2xx
    /// response whose envelope `code` is not 200.
    #[error("Render API error ({status}): {body}")]
    Api {
        /// HTTP status code, or the envelope `code` when HTTP was 2xx.
        status: u16,
        /// Raw response body or provider message for debugging.
        body: String,
    },

    /// The response body did not match the expected success shape.
    #[error("Unexpected render API response: {0}")]
    Protocol(String),

    /// The submission itself was malformed before any network call.
    #[error("Invalid job submission: {0}")]
    InvalidSubmission(String),
}

impl RenderApi {
    /// Create a new client for the configured provider account.
    pub fn new(config: RenderConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Create a client reusing an existing [`reqwest::Client`]
    /// (connection pooling across collaborators).
    pub fn with_client(client: reqwest::Client, config: RenderConfig) -> Self {
        Self { client, config }
    }

    /// Submit a generation job and return the provider-assigned task id.
    ///
    /// Jobs take one or two reference image URLs. The provider pushes the
    /// completion signal to the configured callback URL; this call only
    /// queues the work.
    pub async fn submit(
        &self,
        prompt: &str,
        image_refs: &[String],
        aspect_ratio: AspectRatio,
    ) -> Result<String, RenderApiError> {
        if image_refs.is_empty() || image_refs.len() > 2 {
            return Err(RenderApiError::InvalidSubmission(format!(
                "expected 1..=2 reference images, got {}",
                image_refs.len()
            )));
        }

        let body = serde_json::json!({
            "model": self.config.model,
            "callBackUrl": self.config.callback_url,
            "input": {
                "prompt": prompt,
                "image_urls": image_refs,
                "output_format": "png",
                "image_size": aspect_ratio.as_str(),
            },
        });

        let response = self
            .client
            .post(format!("{}/createTask", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let envelope: ApiEnvelope<CreatedTask> = Self::parse_response(response).await?;
        let created = Self::unwrap_envelope(envelope)?;

        if created.task_id.is_empty() {
            return Err(RenderApiError::Protocol(
                "createTask response carried an empty taskId".into(),
            ));
        }

        tracing::info!(task_id = %created.task_id, "Render job submitted");
        Ok(created.task_id)
    }

    /// Query the provider-side state of a task.
    ///
    /// Secondary path only: the default completion signal is the webhook
    /// landing in the task store, and reconcilers never call this.
    pub async fn query_status(&self, task_id: &str) -> Result<RecordInfo, RenderApiError> {
        let response = self
            .client
            .get(format!("{}/getTask", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .query(&[("taskId", task_id)])
            .send()
            .await?;

        let envelope: ApiEnvelope<RecordInfo> = Self::parse_response(response).await?;
        Self::unwrap_envelope(envelope)
    }

    // ---- private helpers ----

    /// Parse a response body into the expected envelope, mapping non-2xx
    /// HTTP statuses to [`RenderApiError::Api`] and undecodable bodies to
    /// [`RenderApiError::Protocol`].
    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<ApiEnvelope<T>, RenderApiError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());

        if !status.is_success() {
            return Err(RenderApiError::Api {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| RenderApiError::Protocol(format!("undecodable response body: {e}")))
    }

    /// Check the envelope `code` and extract its `data` payload.
    fn unwrap_envelope<T>(envelope: ApiEnvelope<T>) -> Result<T, RenderApiError> {
        if envelope.code != 200 {
            return Err(RenderApiError::Api {
                status: envelope.code as u16,
                body: envelope.msg.unwrap_or_else(|| "<no message>".to_string()),
            });
        }
        envelope
            .data
            .ok_or_else(|| RenderApiError::Protocol("success envelope without data".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn config() -> RenderConfig {
        RenderConfig {
            base_url: "https://provider.test/api/v1/jobs".into(),
            api_key: "key".into(),
            model: "portrait-v1".into(),
            callback_url: "https://stylecast.test/api/v1/callback".into(),
        }
    }

    #[tokio::test]
    async fn submit_rejects_zero_reference_images() {
        let api = RenderApi::new(config());
        let err = api
            .submit("prompt", &[], AspectRatio::Portrait)
            .await
            .unwrap_err();
        assert_matches!(err, RenderApiError::InvalidSubmission(_));
    }

    #[tokio::test]
    async fn submit_rejects_more_than_two_reference_images() {
        let api = RenderApi::new(config());
        let refs: Vec<String> = (0..3).map(|i| format!("https://r/{i}.png")).collect();
        let err = api
            .submit("prompt", &refs, AspectRatio::Square)
            .await
            .unwrap_err();
        assert_matches!(err, RenderApiError::InvalidSubmission(_));
    }

    #[test]
    fn non_200_envelope_code_is_an_api_error() {
        let envelope = ApiEnvelope::<CreatedTask> {
            code: 501,
            msg: Some("model offline".into()),
            data: None,
        };
        let err = RenderApi::unwrap_envelope(envelope).unwrap_err();
        assert_matches!(err, RenderApiError::Api { status: 501, body } if body == "model offline");
    }

    #[test]
    fn success_envelope_without_data_is_a_protocol_error() {
        let envelope = ApiEnvelope::<CreatedTask> {
            code: 200,
            msg: None,
            data: None,
        };
        let err = RenderApi::unwrap_envelope(envelope).unwrap_err();
        assert_matches!(err, RenderApiError::Protocol(_));
    }
}
