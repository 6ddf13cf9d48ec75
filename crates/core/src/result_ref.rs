//! Classification and decoding of render result references.
//!
//! A completed task carries result references that are either inline
//! base64 data-URIs or remote HTTPS URLs. Anything else is unsupported
//! and must be rejected, never guessed at.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::error::CoreError;

/// Prefix of an inline data-URI result.
const DATA_URI_PREFIX: &str = "data:";
/// Prefix of a remote HTTPS result.
const HTTPS_PREFIX: &str = "https://";

/// The form a result reference takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultRefKind {
    /// Inline `data:<mime>;base64,<payload>` URI.
    DataUri,
    /// Remote `https://` URL to be downloaded.
    HttpsUrl,
    /// Neither of the supported forms.
    Other,
}

/// Classify a result reference without decoding it.
pub fn classify_result_ref(reference: &str) -> ResultRefKind {
    if reference.starts_with(DATA_URI_PREFIX) {
        ResultRefKind::DataUri
    } else if reference.starts_with(HTTPS_PREFIX) {
        ResultRefKind::HttpsUrl
    } else {
        ResultRefKind::Other
    }
}

/// Decode the base64 payload of a `data:` URI into raw bytes.
///
/// Accepts only the `;base64,` form; a data-URI without a base64 payload
/// marker is a validation error.
pub fn decode_data_uri(reference: &str) -> Result<Vec<u8>, CoreError> {
    let payload = reference
        .split_once(";base64,")
        .map(|(_, payload)| payload)
        .ok_or_else(|| {
            CoreError::Validation("data URI is missing a ';base64,' payload marker".into())
        })?;

    BASE64
        .decode(payload)
        .map_err(|e| CoreError::Validation(format!("Invalid base64 payload in data URI: {e}")))
}
