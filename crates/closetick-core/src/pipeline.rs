//! Crawl-and-publish orchestrator.
//!
//! Resolves a run request into a close-timestamp range, then walks it one
//! trading day at a time: fetch, persist, publish, pace, advance. Strictly
//! sequential; the inter-day delay is the only throttle against the
//! exchange, and no day is started before the previous day's event has
//! been acknowledged by the sink.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{info, warn};

use crate::calendar::ExchangeCalendar;
use crate::clock::Clock;
use crate::error::CrawlError;
use crate::event::ProcessorEvent;
use crate::fetch::Fetcher;
use crate::sink::EventSink;
use crate::store::ArtifactStore;

/// Fixed partition key: all events for a topic land on one partition,
/// which is what guarantees downstream ordering.
pub const PARTITION_KEY: i32 = 0;

/// How a run was triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// One-shot run over an explicit date range.
    Batch,
    /// Recurring run that always targets today's close.
    Daemon,
}

impl FromStr for RunMode {
    type Err = CrawlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "batch" => Ok(Self::Batch),
            "daemon" => Ok(Self::Daemon),
            other => Err(CrawlError::InvalidMode(String::from(other))),
        }
    }
}

/// Whether a day is actually fetched or only re-announced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchKind {
    /// Fetch the feed and persist the payload.
    Real,
    /// Skip fetch and store; publish the event for an artifact assumed to
    /// exist already (re-emission for days fetched out-of-band).
    Virtual,
}

impl FromStr for FetchKind {
    type Err = CrawlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "real" => Ok(Self::Real),
            "virtual" => Ok(Self::Virtual),
            other => Err(CrawlError::InvalidKind(String::from(other))),
        }
    }
}

/// Inputs to one pipeline execution. Constructed by the entry point from
/// resolved configuration, consumed once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunRequest {
    pub mode: RunMode,
    pub kind: FetchKind,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl RunRequest {
    pub fn batch(kind: FetchKind, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            mode: RunMode::Batch,
            kind,
            start,
            end,
        }
    }

    /// A daemon run always targets today in the exchange timezone and
    /// always fetches for real, whatever kind the configuration asked for.
    pub fn daemon(calendar: &ExchangeCalendar, clock: &dyn Clock) -> Self {
        let today = calendar.today(clock.now());
        Self {
            mode: RunMode::Daemon,
            kind: FetchKind::Real,
            start: today,
            end: today,
        }
    }
}

/// Inter-day pacing. A courtesy delay toward the exchange server, applied
/// after every published day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingPolicy {
    pub inter_day_delay: Duration,
}

impl Default for PacingPolicy {
    fn default() -> Self {
        Self {
            inter_day_delay: Duration::from_secs(10),
        }
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunReport {
    /// Trading days processed and published.
    pub days: u32,
    /// Close instant of the first processed day, Unix milliseconds.
    pub first_close_ts: Option<i64>,
    /// Close instant of the last processed day, Unix milliseconds.
    pub last_close_ts: Option<i64>,
}

/// The crawl pipeline: calendar + fetcher + store + sink, driven day by day.
pub struct Crawler {
    calendar: ExchangeCalendar,
    fetcher: Fetcher,
    store: Arc<dyn ArtifactStore>,
    sink: Arc<dyn EventSink>,
    clock: Arc<dyn Clock>,
    topic: String,
    pacing: PacingPolicy,
}

impl Crawler {
    pub fn new(
        calendar: ExchangeCalendar,
        fetcher: Fetcher,
        store: Arc<dyn ArtifactStore>,
        sink: Arc<dyn EventSink>,
        clock: Arc<dyn Clock>,
        topic: impl Into<String>,
        pacing: PacingPolicy,
    ) -> Self {
        Self {
            calendar,
            fetcher,
            store,
            sink,
            clock,
            topic: topic.into(),
            pacing,
        }
    }

    /// Execute one run.
    ///
    /// The first failing day aborts the run; files persisted and events
    /// published for earlier days stay in place (no rollback). An inverted
    /// range (`start > end`) is an explicit no-op.
    ///
    /// # Errors
    ///
    /// Any [`CrawlError`] from the calendar, fetcher, store, encoder, or
    /// sink, surfaced unchanged.
    pub async fn run(&self, request: RunRequest) -> Result<RunReport, CrawlError> {
        // Daemon runs fetch for real regardless of the requested kind.
        let kind = match request.mode {
            RunMode::Daemon => FetchKind::Real,
            RunMode::Batch => request.kind,
        };

        let start = self.calendar.close_instant(request.start)?;
        let end = self.calendar.close_instant(request.end)?;

        if start > end {
            warn!(
                start = %request.start,
                end = %request.end,
                "inverted date range, nothing to do"
            );
            return Ok(RunReport::default());
        }

        info!(
            mode = ?request.mode,
            kind = ?kind,
            start = %request.start,
            end = %request.end,
            topic = %self.topic,
            "starting crawl run"
        );

        let first_close_ts = start.timestamp_millis();
        let end_ts = end.timestamp_millis();
        let mut current = start;
        let mut report = RunReport::default();

        loop {
            let close_ts = current.timestamp_millis();
            if close_ts > end_ts {
                break;
            }

            let date_string = ExchangeCalendar::date_string(current.date_naive());

            let path = match kind {
                FetchKind::Real => {
                    let payload = self.fetcher.fetch(&date_string).await?;
                    self.store.persist(&date_string, &payload)?
                }
                FetchKind::Virtual => self.store.path_for(&date_string),
            };

            let event = ProcessorEvent::new(
                close_ts,
                path.to_string_lossy(),
                close_ts == end_ts,
                first_close_ts,
            );
            let payload = event.encode()?;

            // Block for acknowledgment before counting the day as done.
            self.sink
                .produce(&self.topic, PARTITION_KEY, payload)
                .await?;

            report.days += 1;
            report.first_close_ts.get_or_insert(close_ts);
            report.last_close_ts = Some(close_ts);

            info!(date = %date_string, days = report.days, "trading day published");

            self.clock.sleep(self.pacing.inter_day_delay).await;
            current = self.calendar.next_close(current)?;
        }

        self.sink.flush().await?;

        info!(days = report.days, "crawl run finished");
        Ok(report)
    }
}
