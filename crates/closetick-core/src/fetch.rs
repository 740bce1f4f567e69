//! Feed fetcher: bounded-retry GET against the exchange's daily-close feed.

use std::sync::Arc;

use tracing::{debug, info};

use crate::clock::Clock;
use crate::config::FeedConfig;
use crate::error::CrawlError;
use crate::transport::{FeedRequest, Transport};

/// Placeholder in the feed URL template replaced with the trading day's
/// `YYYY-MM-DD` date string.
pub const DATE_PLACEHOLDER: &str = "{date}";
/// Placeholder replaced with the current Unix-millisecond wall clock, a
/// cache-busting parameter the exchange endpoint expects.
pub const CACHE_BUST_PLACEHOLDER: &str = "{ts}";

/// Validation-retry policy. Retries cover malformed/empty bodies only,
/// modeling transient upstream incompleteness around market close;
/// transport errors abort immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPolicy {
    /// Total attempts per trading day, valid-body check included.
    pub max_attempts: u32,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self { max_attempts: 3 }
    }
}

/// Fetches and validates one trading day's feed payload.
pub struct Fetcher {
    transport: Arc<dyn Transport>,
    clock: Arc<dyn Clock>,
    feed: FeedConfig,
    policy: FetchPolicy,
}

impl Fetcher {
    pub fn new(
        transport: Arc<dyn Transport>,
        clock: Arc<dyn Clock>,
        feed: FeedConfig,
        policy: FetchPolicy,
    ) -> Self {
        Self {
            transport,
            clock,
            feed,
            policy,
        }
    }

    /// Retrieve the feed body for one trading day.
    ///
    /// # Errors
    ///
    /// - [`CrawlError::Transport`] if the GET itself fails; surfaced
    ///   immediately, never retried.
    /// - [`CrawlError::DataUnavailable`] if every attempt yielded a body
    ///   that is not well-formed JSON.
    pub async fn fetch(&self, date_string: &str) -> Result<Vec<u8>, CrawlError> {
        let attempts = self.policy.max_attempts.max(1);

        for attempt in 1..=attempts {
            let request = FeedRequest::get(self.build_url(date_string))
                .with_referer(&self.feed.referer)
                .with_timeout_ms(self.feed.timeout_ms);

            let body = self.transport.get(request).await?;

            if is_well_formed_json(&body) {
                info!(date = date_string, attempt, bytes = body.len(), "feed fetched");
                return Ok(body);
            }

            debug!(date = date_string, attempt, "feed body failed validation");
        }

        Err(CrawlError::DataUnavailable { attempts })
    }

    fn build_url(&self, date_string: &str) -> String {
        let cache_bust = self.clock.now().timestamp_millis().to_string();
        self.feed
            .url
            .replace(DATE_PLACEHOLDER, date_string)
            .replace(CACHE_BUST_PLACEHOLDER, &cache_bust)
    }
}

/// A payload is valid when it is non-empty and parses as JSON. The document
/// itself stays opaque; the pipeline persists the raw bytes untouched.
fn is_well_formed_json(body: &[u8]) -> bool {
    !body.is_empty() && serde_json::from_slice::<serde::de::IgnoredAny>(body).is_ok()
}
