//! Core crawl-and-publish pipeline for the TWSE daily-close feed.
//!
//! This crate contains:
//! - Trading calendar: civil date to exchange close instant
//! - Feed fetcher: bounded-retry GET with body validation
//! - Artifact store: atomic per-day persistence
//! - Processor event: the downstream wire contract
//! - Sink and clock capability traits with production implementations
//! - The orchestrator driving all of the above per run

pub mod calendar;
pub mod clock;
pub mod config;
pub mod error;
pub mod event;
pub mod fetch;
pub mod pipeline;
pub mod sink;
pub mod store;
pub mod transport;

pub use calendar::{ExchangeCalendar, DEFAULT_TIMEZONE};
pub use clock::{Clock, SystemClock};
pub use config::{
    BatchConfig, CalendarConfig, CrawlerConfig, DaemonConfig, Environment, FeedConfig,
    PacingConfig,
};
pub use error::CrawlError;
pub use event::{ProcessorEvent, EXCHANGE, PERIOD_ONE_DAY};
pub use fetch::{FetchPolicy, Fetcher};
pub use pipeline::{
    Crawler, FetchKind, PacingPolicy, RunMode, RunReport, RunRequest, PARTITION_KEY,
};
pub use sink::{EventSink, MemorySink, NdjsonFileSink, ProducedRecord};
pub use store::{ArtifactStore, FileStore};
pub use transport::{FeedRequest, ReqwestTransport, Transport};
