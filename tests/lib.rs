// Test doubles shared by the behavior tests: a fixed clock that records
// sleeps, scripted/counting transports, and stores/sinks with injectable
// failures.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use closetick_core::{
    ArtifactStore, Clock, CrawlError, EventSink, FeedRequest, FileStore, Transport,
};

/// Clock pinned to a fixed instant; sleeps return immediately and are
/// recorded so tests can assert the pacing policy was observed.
pub struct FixedClock {
    now: DateTime<Utc>,
    sleeps: Mutex<Vec<Duration>>,
}

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now,
            sleeps: Mutex::new(Vec::new()),
        }
    }

    /// 2024-01-01T20:00Z, which is already 2024-01-02 in Taipei.
    pub fn new_year_evening() -> Self {
        Self::at(Utc.with_ymd_and_hms(2024, 1, 1, 20, 0, 0).unwrap())
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn sleep<'a>(
        &'a self,
        duration: Duration,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        self.sleeps.lock().unwrap().push(duration);
        Box::pin(async {})
    }
}

/// Transport that always returns a valid JSON body and counts calls.
#[derive(Default)]
pub struct CountingTransport {
    calls: AtomicU32,
}

impl CountingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Transport for CountingTransport {
    fn get<'a>(
        &'a self,
        _request: FeedRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>, CrawlError>> + Send + 'a>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(async { Ok(b"{\"stat\":\"OK\"}".to_vec()) })
    }
}

/// Transport that replays a fixed script of responses, then fails.
pub struct ScriptedTransport {
    script: Mutex<Vec<Result<Vec<u8>, CrawlError>>>,
}

impl ScriptedTransport {
    pub fn new(script: Vec<Result<Vec<u8>, CrawlError>>) -> Self {
        Self {
            script: Mutex::new(script),
        }
    }
}

impl Transport for ScriptedTransport {
    fn get<'a>(
        &'a self,
        _request: FeedRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>, CrawlError>> + Send + 'a>> {
        let mut script = self.script.lock().unwrap();
        let next = if script.is_empty() {
            Err(CrawlError::Transport(String::from("script exhausted")))
        } else {
            script.remove(0)
        };
        Box::pin(async move { next })
    }
}

/// Store wrapper that fails on the nth persist call (1-based).
pub struct FailingStore {
    inner: FileStore,
    fail_on_call: u32,
    calls: AtomicU32,
}

impl FailingStore {
    pub fn new(inner: FileStore, fail_on_call: u32) -> Self {
        Self {
            inner,
            fail_on_call,
            calls: AtomicU32::new(0),
        }
    }
}

impl ArtifactStore for FailingStore {
    fn path_for(&self, date_string: &str) -> PathBuf {
        self.inner.path_for(date_string)
    }

    fn persist(&self, date_string: &str, payload: &[u8]) -> Result<PathBuf, CrawlError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call == self.fail_on_call {
            return Err(CrawlError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disk full",
            )));
        }
        self.inner.persist(date_string, payload)
    }
}

/// Sink that rejects every produce.
#[derive(Default)]
pub struct RejectingSink;

impl EventSink for RejectingSink {
    fn produce<'a>(
        &'a self,
        _topic: &'a str,
        _partition_key: i32,
        _payload: Vec<u8>,
    ) -> Pin<Box<dyn Future<Output = Result<(), CrawlError>> + Send + 'a>> {
        Box::pin(async { Err(CrawlError::Sink(String::from("broker unreachable"))) })
    }

    fn flush<'a>(&'a self) -> Pin<Box<dyn Future<Output = Result<(), CrawlError>> + Send + 'a>> {
        Box::pin(async { Ok(()) })
    }
}

pub fn shared<T>(value: T) -> Arc<T> {
    Arc::new(value)
}
