//! Crawler configuration loaded from a TOML file.
//!
//! The core consumes these as already-resolved values; nothing here reaches
//! back into the environment at run time. Policy constants (pacing, retry
//! budget) keep their historical defaults but are tunable per deployment.

use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::calendar::DEFAULT_TIMEZONE;
use crate::error::CrawlError;
use crate::fetch::FetchPolicy;
use crate::pipeline::{FetchKind, PacingPolicy};

/// Deployment environment. Suffixes the processor topic so environments
/// never share a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Dev,
    Test,
    Stg,
    Prod,
}

impl Environment {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dev => "dev",
            Self::Test => "test",
            Self::Stg => "stg",
            Self::Prod => "prod",
        }
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = CrawlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dev" => Ok(Self::Dev),
            "test" => Ok(Self::Test),
            "stg" => Ok(Self::Stg),
            "prod" => Ok(Self::Prod),
            other => Err(CrawlError::Configuration(format!(
                "unknown environment '{other}', expected one of dev, test, stg, prod"
            ))),
        }
    }
}

/// Upstream feed endpoint settings.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// URL template with `{date}` and `{ts}` placeholders.
    pub url: String,
    /// Referer header value the exchange endpoint expects.
    pub referer: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    10_000
}

/// Exchange calendar settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarConfig {
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
        }
    }
}

fn default_timezone() -> String {
    String::from(DEFAULT_TIMEZONE)
}

/// Pacing and retry policy knobs. Defaults match the historical behavior:
/// 10 seconds between days, 3 validation attempts, no backoff.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PacingConfig {
    #[serde(default = "default_inter_day_delay_secs")]
    pub inter_day_delay_secs: u64,
    #[serde(default = "default_fetch_attempts")]
    pub fetch_attempts: u32,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            inter_day_delay_secs: default_inter_day_delay_secs(),
            fetch_attempts: default_fetch_attempts(),
        }
    }
}

impl PacingConfig {
    pub fn pacing_policy(&self) -> PacingPolicy {
        PacingPolicy {
            inter_day_delay: Duration::from_secs(self.inter_day_delay_secs),
        }
    }

    pub fn fetch_policy(&self) -> FetchPolicy {
        FetchPolicy {
            max_attempts: self.fetch_attempts,
        }
    }
}

fn default_inter_day_delay_secs() -> u64 {
    10
}

fn default_fetch_attempts() -> u32 {
    3
}

/// Explicit date range for batch runs.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BatchConfig {
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(default = "default_kind")]
    pub kind: FetchKind,
}

fn default_kind() -> FetchKind {
    FetchKind::Real
}

/// Daemon cadence. A 24-hour tick matches the once-per-trading-day feed.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DaemonConfig {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
        }
    }
}

impl DaemonConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

fn default_interval_secs() -> u64 {
    86_400
}

/// Root configuration document.
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    pub environment: Environment,
    pub data_dir: PathBuf,
    pub spool_dir: PathBuf,
    #[serde(default = "default_topic")]
    pub topic: String,
    pub feed: FeedConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub pacing: PacingConfig,
    #[serde(default)]
    pub batch: Option<BatchConfig>,
    #[serde(default)]
    pub daemon: DaemonConfig,
}

fn default_topic() -> String {
    String::from("processor")
}

impl CrawlerConfig {
    /// Read and parse a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`CrawlError::Configuration`] for an unreadable file or an
    /// invalid document. Startup-fatal by policy.
    pub fn load(path: &Path) -> Result<Self, CrawlError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            CrawlError::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Result<Self, CrawlError> {
        toml::from_str(raw)
            .map_err(|e| CrawlError::Configuration(format!("invalid config: {e}")))
    }

    /// Fully qualified processor topic: `<topic>_<environment>`.
    pub fn processor_topic(&self) -> String {
        format!("{}_{}", self.topic, self.environment)
    }
}
