//! HTTP transport capability for the feed fetcher.
//!
//! The pipeline only ever issues GET requests with a Referer header, so the
//! request envelope is deliberately minimal. Tests substitute scripted
//! transports; production wires in [`ReqwestTransport`].

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use crate::error::CrawlError;

/// One GET against the feed endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRequest {
    pub url: String,
    pub referer: Option<String>,
    pub timeout_ms: u64,
}

impl FeedRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            referer: None,
            timeout_ms: 10_000,
        }
    }

    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

/// Transport contract: fetch a feed body or fail with a transport error.
///
/// Transport failures are terminal for the current day; the fetcher never
/// retries them. Only body validation failures are retried, upstream of
/// this trait.
pub trait Transport: Send + Sync {
    fn get<'a>(
        &'a self,
        request: FeedRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>, CrawlError>> + Send + 'a>>;
}

/// Production transport backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Arc<reqwest::Client>,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: Arc::new(
                reqwest::Client::builder()
                    .user_agent("closetick/0.1.0")
                    .build()
                    .unwrap_or_else(|_| reqwest::Client::new()),
            ),
        }
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for ReqwestTransport {
    fn get<'a>(
        &'a self,
        request: FeedRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>, CrawlError>> + Send + 'a>> {
        Box::pin(async move {
            let mut builder = self
                .client
                .get(&request.url)
                .timeout(Duration::from_millis(request.timeout_ms));

            if let Some(referer) = &request.referer {
                builder = builder.header(reqwest::header::REFERER, referer);
            }

            let response = builder.send().await.map_err(|e| {
                if e.is_timeout() {
                    CrawlError::Transport(format!("request timeout: {e}"))
                } else if e.is_connect() {
                    CrawlError::Transport(format!("connection failed: {e}"))
                } else {
                    CrawlError::Transport(format!("request failed: {e}"))
                }
            })?;

            let status = response.status();
            if !status.is_success() {
                return Err(CrawlError::Transport(format!(
                    "feed returned HTTP {status}"
                )));
            }

            let body = response
                .bytes()
                .await
                .map_err(|e| CrawlError::Transport(format!("failed to read body: {e}")))?;

            Ok(body.to_vec())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_builder_sets_referer_and_timeout() {
        let request = FeedRequest::get("https://example.test/feed")
            .with_referer("https://example.test/")
            .with_timeout_ms(2_500);

        assert_eq!(request.url, "https://example.test/feed");
        assert_eq!(request.referer.as_deref(), Some("https://example.test/"));
        assert_eq!(request.timeout_ms, 2_500);
    }

    #[test]
    fn request_defaults_have_no_referer() {
        let request = FeedRequest::get("https://example.test/feed");
        assert_eq!(request.referer, None);
        assert_eq!(request.timeout_ms, 10_000);
    }
}
