//! Outbound processor event: the stable wire contract with the downstream
//! processing pipeline.
//!
//! One event is published per trading day processed. This per-day shape is
//! the versioned protocol decision for this repository; there is no
//! per-run summary variant. Timestamps are Unix milliseconds.

use serde::{Deserialize, Serialize};

use crate::error::CrawlError;

/// Exchange code carried on every event.
pub const EXCHANGE: &str = "TWSE";
/// Period granularity carried on every event: one record per trading day.
pub const PERIOD_ONE_DAY: &str = "1d";

/// Record published downstream for one fetched trading day.
///
/// Immutable once built; ownership transfers to the sink on produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessorEvent {
    /// Exchange code, always [`EXCHANGE`].
    pub exchange: String,
    /// Period granularity, always [`PERIOD_ONE_DAY`].
    pub period: String,
    /// This day's close instant, Unix milliseconds.
    pub close_ts: i64,
    /// Path of the persisted artifact for this day.
    pub path: String,
    /// Whether this day is the last one in the run.
    pub last: bool,
    /// The run's first day's close instant, Unix milliseconds.
    pub first_close_ts: i64,
}

impl ProcessorEvent {
    pub fn new(
        close_ts: i64,
        path: impl Into<String>,
        last: bool,
        first_close_ts: i64,
    ) -> Self {
        Self {
            exchange: String::from(EXCHANGE),
            period: String::from(PERIOD_ONE_DAY),
            close_ts,
            path: path.into(),
            last,
            first_close_ts,
        }
    }

    /// Encode for the message sink.
    ///
    /// # Errors
    ///
    /// Returns [`CrawlError::Serialization`] when encoding fails.
    pub fn encode(&self) -> Result<Vec<u8>, CrawlError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decode a sink payload back into an event. Used by tests and by
    /// downstream consumers that share this crate.
    pub fn decode(payload: &[u8]) -> Result<Self, CrawlError> {
        Ok(serde_json::from_slice(payload)?)
    }
}
