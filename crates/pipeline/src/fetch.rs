//! Download seam for result URLs.

use async_trait::async_trait;
use bytes::Bytes;
use stylecast_core::result_ref::{classify_result_ref, decode_data_uri, ResultRefKind};

use crate::PipelineError;

/// Fetches raw bytes from a remote URL.
///
/// Trait seam so callback processing and artifact resolution can be
/// tested without a network.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> anyhow::Result<Bytes>;
}

/// [`Fetcher`] backed by a pooled [`reqwest::Client`].
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> anyhow::Result<Bytes> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.bytes().await?)
    }
}

/// Resolve a result reference to raw image bytes.
///
/// Inline base64 data-URIs are decoded locally; HTTPS URLs are fetched
/// through the given [`Fetcher`]; any other form is rejected.
pub async fn resolve_result_ref(
    fetcher: &dyn Fetcher,
    reference: &str,
) -> Result<Bytes, PipelineError> {
    match classify_result_ref(reference) {
        ResultRefKind::DataUri => Ok(Bytes::from(decode_data_uri(reference)?)),
        ResultRefKind::HttpsUrl => {
            fetcher
                .fetch(reference)
                .await
                .map_err(|source| PipelineError::Download {
                    url: reference.to_string(),
                    source,
                })
        }
        ResultRefKind::Other => Err(PipelineError::UnsupportedResultFormat(
            reference.to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    struct StaticFetcher(&'static [u8]);

    #[async_trait]
    impl Fetcher for StaticFetcher {
        async fn fetch(&self, _url: &str) -> anyhow::Result<Bytes> {
            Ok(Bytes::from_static(self.0))
        }
    }

    struct FailingFetcher;

    #[async_trait]
    impl Fetcher for FailingFetcher {
        async fn fetch(&self, url: &str) -> anyhow::Result<Bytes> {
            anyhow::bail!("connection refused fetching {url}")
        }
    }

    #[tokio::test]
    async fn resolves_data_uri_without_touching_fetcher() {
        let bytes = resolve_result_ref(&FailingFetcher, "data:image/png;base64,aGVsbG8=")
            .await
            .unwrap();
        assert_eq!(bytes.as_ref(), b"hello");
    }

    #[tokio::test]
    async fn resolves_https_url_through_fetcher() {
        let bytes = resolve_result_ref(&StaticFetcher(b"png-bytes"), "https://cdn/x.png")
            .await
            .unwrap();
        assert_eq!(bytes.as_ref(), b"png-bytes");
    }

    #[tokio::test]
    async fn download_failure_is_a_download_error() {
        let err = resolve_result_ref(&FailingFetcher, "https://cdn/x.png")
            .await
            .unwrap_err();
        assert_matches!(err, PipelineError::Download { url, .. } if url == "https://cdn/x.png");
    }

    #[tokio::test]
    async fn other_schemes_are_unsupported() {
        let err = resolve_result_ref(&StaticFetcher(b""), "ftp://cdn/x.png")
            .await
            .unwrap_err();
        assert_matches!(err, PipelineError::UnsupportedResultFormat(_));
    }
}
