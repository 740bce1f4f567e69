//! CLI argument definitions for closetick.
//!
//! Two commands map to the two run modes:
//!
//! | Command  | Description |
//! |----------|-------------|
//! | `batch`  | One-shot crawl over an explicit date range |
//! | `daemon` | Recurring crawl of today's close on a fixed cadence |
//!
//! Date-range and kind flags override the `[batch]` section of the config
//! file; everything else comes from the config.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use closetick_core::FetchKind;

/// TWSE daily-close feed crawler.
///
/// Fetches the exchange's market-close JSON feed per trading day, persists
/// the raw payload, and publishes one ordered processor event per day.
#[derive(Debug, Parser)]
#[command(name = "closetick", version, about = "TWSE daily-close feed crawler")]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = "closetick.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// One-shot crawl over an explicit date range; any failure exits non-zero.
    Batch(BatchArgs),
    /// Long-running loop crawling today's close once per cadence tick.
    ///
    /// A failed run is logged and the next tick stays armed; the process
    /// does not exit on per-run failures.
    Daemon,
}

#[derive(Debug, Args)]
pub struct BatchArgs {
    /// First trading day (YYYY-MM-DD). Overrides `[batch] start`.
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Last trading day, inclusive (YYYY-MM-DD). Overrides `[batch] end`.
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Fetch kind. Overrides `[batch] kind`.
    #[arg(long, value_enum)]
    pub kind: Option<KindArg>,
}

/// clap-facing mirror of [`FetchKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    /// Fetch the feed and persist the payload.
    Real,
    /// Re-emit events only; no fetch, no store.
    Virtual,
}

impl From<KindArg> for FetchKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Real => FetchKind::Real,
            KindArg::Virtual => FetchKind::Virtual,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_flags_parse_dates() {
        let cli = Cli::parse_from([
            "closetick",
            "--config",
            "conf.toml",
            "batch",
            "--start",
            "2024-01-02",
            "--end",
            "2024-01-04",
            "--kind",
            "virtual",
        ]);

        assert_eq!(cli.config, PathBuf::from("conf.toml"));
        let Command::Batch(args) = cli.command else {
            panic!("expected batch command");
        };
        assert_eq!(args.start, NaiveDate::from_ymd_opt(2024, 1, 2));
        assert_eq!(args.end, NaiveDate::from_ymd_opt(2024, 1, 4));
        assert_eq!(args.kind.map(FetchKind::from), Some(FetchKind::Virtual));
    }

    #[test]
    fn daemon_takes_no_range_flags() {
        let cli = Cli::parse_from(["closetick", "daemon"]);
        assert!(matches!(cli.command, Command::Daemon));
    }
}
