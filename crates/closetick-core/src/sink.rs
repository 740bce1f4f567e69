//! Message sink capability: where processor events go.
//!
//! The pipeline requires a produce-and-acknowledge contract plus an
//! explicit flush so delivery is guaranteed before process exit. Every
//! event for a topic uses a fixed partition key, which funnels the topic
//! to a single partition and guarantees per-topic ordering.

use std::future::Future;
use std::io::Write;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Mutex;

use tracing::debug;

use crate::error::CrawlError;

/// Message producer capability.
///
/// `produce` must not resolve until the sink has accepted the record;
/// the pipeline awaits it before advancing to the next day, which is what
/// makes delivery at-least-once with respect to run progress.
pub trait EventSink: Send + Sync {
    fn produce<'a>(
        &'a self,
        topic: &'a str,
        partition_key: i32,
        payload: Vec<u8>,
    ) -> Pin<Box<dyn Future<Output = Result<(), CrawlError>> + Send + 'a>>;

    /// Drain anything buffered. Called at the end of every run and before
    /// process exit.
    fn flush<'a>(&'a self) -> Pin<Box<dyn Future<Output = Result<(), CrawlError>> + Send + 'a>>;
}

/// Local spool sink: one NDJSON file per topic under a spool directory.
///
/// Each produced payload (already an encoded JSON document) becomes one
/// line of `<spool_dir>/<topic>.ndjson`. A broker-backed producer can drain
/// the spool out-of-band; the pipeline itself stays broker-agnostic.
pub struct NdjsonFileSink {
    spool_dir: PathBuf,
    // Serializes appends so interleaved produces cannot tear lines.
    write_lock: Mutex<()>,
}

impl NdjsonFileSink {
    pub fn new(spool_dir: impl Into<PathBuf>) -> Self {
        Self {
            spool_dir: spool_dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn append(&self, topic: &str, payload: &[u8]) -> Result<(), CrawlError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| CrawlError::Sink(String::from("spool write lock poisoned")))?;

        std::fs::create_dir_all(&self.spool_dir)?;
        let path = self.spool_dir.join(format!("{topic}.ndjson"));
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?;
        file.write_all(payload)?;
        file.write_all(b"\n")?;
        file.sync_all()?;
        Ok(())
    }
}

impl EventSink for NdjsonFileSink {
    fn produce<'a>(
        &'a self,
        topic: &'a str,
        partition_key: i32,
        payload: Vec<u8>,
    ) -> Pin<Box<dyn Future<Output = Result<(), CrawlError>> + Send + 'a>> {
        Box::pin(async move {
            debug!(topic, partition_key, bytes = payload.len(), "producing event");
            self.append(topic, &payload)
        })
    }

    fn flush<'a>(&'a self) -> Pin<Box<dyn Future<Output = Result<(), CrawlError>> + Send + 'a>> {
        // Appends are synced per record; nothing is buffered here.
        Box::pin(async { Ok(()) })
    }
}

/// Produced record captured by [`MemorySink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProducedRecord {
    pub topic: String,
    pub partition_key: i32,
    pub payload: Vec<u8>,
}

/// In-memory sink for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<ProducedRecord>>,
    flushes: Mutex<u32>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<ProducedRecord> {
        self.records.lock().expect("memory sink lock").clone()
    }

    pub fn flush_count(&self) -> u32 {
        *self.flushes.lock().expect("memory sink lock")
    }
}

impl EventSink for MemorySink {
    fn produce<'a>(
        &'a self,
        topic: &'a str,
        partition_key: i32,
        payload: Vec<u8>,
    ) -> Pin<Box<dyn Future<Output = Result<(), CrawlError>> + Send + 'a>> {
        self.records.lock().expect("memory sink lock").push(ProducedRecord {
            topic: String::from(topic),
            partition_key,
            payload,
        });
        Box::pin(async { Ok(()) })
    }

    fn flush<'a>(&'a self) -> Pin<Box<dyn Future<Output = Result<(), CrawlError>> + Send + 'a>> {
        *self.flushes.lock().expect("memory sink lock") += 1;
        Box::pin(async { Ok(()) })
    }
}
