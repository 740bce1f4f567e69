//! Wall-clock and sleep capability, injectable for deterministic tests.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use chrono::{DateTime, Utc};

/// Time source used by the pipeline for "today" resolution, cache-busting
/// timestamps, and inter-day pacing. Production code uses [`SystemClock`];
/// tests inject a fixed clock that records sleeps instead of waiting.
pub trait Clock: Send + Sync {
    /// Current instant in UTC.
    fn now(&self) -> DateTime<Utc>;

    /// Suspend the current task for `duration`.
    fn sleep<'a>(&'a self, duration: Duration)
        -> Pin<Box<dyn Future<Output = ()> + Send + 'a>>;
}

/// Real wall clock backed by `chrono` and the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn sleep<'a>(
        &'a self,
        duration: Duration,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(tokio::time::sleep(duration))
    }
}
