//! Behavior tests for failure propagation: every failure aborts the run,
//! nothing is rolled back, nothing is swallowed.

use std::sync::Arc;

use chrono::NaiveDate;
use closetick_core::{
    CrawlError, Crawler, ExchangeCalendar, FetchKind, FetchPolicy, Fetcher, FeedConfig,
    FileStore, MemorySink, PacingPolicy, ProcessorEvent, RunRequest, Transport,
    DEFAULT_TIMEZONE,
};
use closetick_tests::{shared, CountingTransport, FailingStore, FixedClock, RejectingSink, ScriptedTransport};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn feed_config() -> FeedConfig {
    FeedConfig {
        url: String::from("https://exchange.test/close?date={date}&_={ts}"),
        referer: String::from("https://exchange.test/"),
        timeout_ms: 1_000,
    }
}

fn fetcher(transport: Arc<dyn Transport>, clock: Arc<FixedClock>) -> Fetcher {
    Fetcher::new(transport, clock, feed_config(), FetchPolicy::default())
}

#[tokio::test]
async fn store_failure_on_day_two_keeps_day_one_and_never_reaches_day_three() {
    // Given: a 3-day batch where persistence fails on the second day
    let calendar = ExchangeCalendar::new(DEFAULT_TIMEZONE).unwrap();
    let clock = shared(FixedClock::new_year_evening());
    let transport = shared(CountingTransport::new());
    let sink = shared(MemorySink::new());
    let data_dir = tempfile::tempdir().unwrap();
    let store = shared(FailingStore::new(FileStore::new(data_dir.path()), 2));

    let crawler = Crawler::new(
        calendar,
        fetcher(transport.clone(), clock.clone()),
        store,
        sink.clone(),
        clock,
        "processor_test",
        PacingPolicy::default(),
    );

    // When: the run executes
    let err = crawler
        .run(RunRequest::batch(FetchKind::Real, date(2024, 1, 2), date(2024, 1, 4)))
        .await
        .unwrap_err();

    // Then: the failure surfaces as an io error
    assert!(matches!(err, CrawlError::Io(_)));

    // And: day 1's artifact and event survive untouched
    assert!(data_dir.path().join("2024-01-02.json").exists());
    let records = sink.records();
    assert_eq!(records.len(), 1);
    let event = ProcessorEvent::decode(&records[0].payload).unwrap();
    assert!(event.path.ends_with("2024-01-02.json"));
    assert!(!event.last);

    // And: day 2's event was never published, day 3 never fetched
    assert!(!data_dir.path().join("2024-01-03.json").exists());
    assert_eq!(transport.calls(), 2);
}

#[tokio::test]
async fn transport_failure_aborts_the_run_with_no_output() {
    let calendar = ExchangeCalendar::new(DEFAULT_TIMEZONE).unwrap();
    let clock = shared(FixedClock::new_year_evening());
    let transport = shared(ScriptedTransport::new(vec![Err(CrawlError::Transport(
        String::from("connection refused"),
    ))]));
    let sink = shared(MemorySink::new());
    let data_dir = tempfile::tempdir().unwrap();

    let crawler = Crawler::new(
        calendar,
        fetcher(transport, clock.clone()),
        FileStore::shared(data_dir.path()),
        sink.clone(),
        clock,
        "processor_test",
        PacingPolicy::default(),
    );

    let err = crawler
        .run(RunRequest::batch(FetchKind::Real, date(2024, 1, 2), date(2024, 1, 3)))
        .await
        .unwrap_err();

    assert!(matches!(err, CrawlError::Transport(_)));
    assert!(sink.records().is_empty());
    assert_eq!(std::fs::read_dir(data_dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn persistent_feed_garbage_surfaces_as_data_unavailable() {
    let calendar = ExchangeCalendar::new(DEFAULT_TIMEZONE).unwrap();
    let clock = shared(FixedClock::new_year_evening());
    // Three malformed bodies exhaust the validation budget for day 1.
    let transport = shared(ScriptedTransport::new(vec![
        Ok(b"<html>maintenance</html>".to_vec()),
        Ok(Vec::new()),
        Ok(b"not json".to_vec()),
    ]));
    let sink = shared(MemorySink::new());
    let data_dir = tempfile::tempdir().unwrap();

    let crawler = Crawler::new(
        calendar,
        fetcher(transport, clock.clone()),
        FileStore::shared(data_dir.path()),
        sink.clone(),
        clock,
        "processor_test",
        PacingPolicy::default(),
    );

    let err = crawler
        .run(RunRequest::batch(FetchKind::Real, date(2024, 1, 2), date(2024, 1, 2)))
        .await
        .unwrap_err();

    assert!(matches!(err, CrawlError::DataUnavailable { attempts: 3 }));
    assert!(sink.records().is_empty());
}

#[tokio::test]
async fn sink_rejection_aborts_after_the_artifact_is_persisted() {
    let calendar = ExchangeCalendar::new(DEFAULT_TIMEZONE).unwrap();
    let clock = shared(FixedClock::new_year_evening());
    let transport = shared(CountingTransport::new());
    let data_dir = tempfile::tempdir().unwrap();

    let crawler = Crawler::new(
        calendar,
        fetcher(transport, clock.clone()),
        FileStore::shared(data_dir.path()),
        shared(RejectingSink),
        clock,
        "processor_test",
        PacingPolicy::default(),
    );

    let err = crawler
        .run(RunRequest::batch(FetchKind::Real, date(2024, 1, 2), date(2024, 1, 3)))
        .await
        .unwrap_err();

    assert!(matches!(err, CrawlError::Sink(_)));
    // Partial progress is retained: the fetch and persist for day 1 stand.
    assert!(data_dir.path().join("2024-01-02.json").exists());
    // Day 2 was never started.
    assert!(!data_dir.path().join("2024-01-03.json").exists());
}
