//! Typed provider payloads.

use serde::{Deserialize, Serialize};

/// Output aspect ratio accepted by the provider's `image_size` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AspectRatio {
    /// `9:16`, the default for character portraits.
    Portrait,
    /// `1:1`.
    Square,
}

impl AspectRatio {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Portrait => "9:16",
            Self::Square => "1:1",
        }
    }
}

/// Envelope wrapping every provider response: `{ code, msg?, data? }`.
///
/// `code == 200` signals success; any other value is a provider-side
/// rejection even when the HTTP status is 2xx.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    pub code: i64,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}

/// `data` payload of a successful `createTask` response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedTask {
    pub task_id: String,
}

/// Remote job state as reported by `getTask` and the webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Success,
    Failed,
    /// Any pending-ish state the provider reports while the job runs
    /// (`waiting`, `queuing`, `generating`, ...).
    #[serde(other)]
    InProgress,
}

/// `data` payload of a `getTask` response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordInfo {
    pub task_id: String,
    pub state: JobState,
    /// JSON-encoded result blob (`{"resultUrls": [...]}`), present once
    /// the job has succeeded.
    #[serde(default)]
    pub result_json: Option<String>,
    #[serde(default)]
    pub fail_msg: Option<String>,
    #[serde(default)]
    pub consume_credits: Option<i64>,
    #[serde(default)]
    pub cost_time: Option<i64>,
}

/// Webhook body pushed by the provider on job completion or failure.
#[derive(Debug, Deserialize)]
pub struct RenderCallback {
    pub data: CallbackData,
}

/// `data` payload of a webhook notification.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackData {
    pub task_id: String,
    pub state: JobState,
    #[serde(default)]
    pub result_json: Option<String>,
    #[serde(default)]
    pub fail_msg: Option<String>,
    #[serde(default)]
    pub consume_credits: Option<i64>,
    #[serde(default)]
    pub cost_time: Option<i64>,
}

/// Decoded form of the `resultJson` blob.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultPayload {
    #[serde(default)]
    pub result_urls: Vec<String>,
}

/// Parse the JSON-encoded `resultJson` blob into its result URL list.
pub fn parse_result_json(raw: &str) -> Result<Vec<String>, serde_json::Error> {
    let payload: ResultPayload = serde_json::from_str(raw)?;
    Ok(payload.result_urls)
}
