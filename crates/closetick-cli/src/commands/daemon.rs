use closetick_core::{Clock, CrawlerConfig, ExchangeCalendar, RunRequest, SystemClock};
use tracing::{error, info};

use crate::error::CliError;

use super::build_crawler;

/// Recurring daemon loop: one run targeting today's close per cadence tick.
///
/// Runs are serialized by construction: each run is awaited before the next
/// tick is scheduled, so re-entrancy is impossible. A failed run is logged
/// and the loop keeps going; only startup (config/timezone) errors abort
/// the process.
pub async fn run_daemon(config: &CrawlerConfig) -> Result<(), CliError> {
    let calendar = ExchangeCalendar::new(&config.calendar.timezone)?;
    let crawler = build_crawler(config)?;
    let clock = SystemClock;
    let interval = config.daemon.interval();

    info!(interval_secs = interval.as_secs(), "daemon started");

    loop {
        let request = RunRequest::daemon(&calendar, &clock);
        match crawler.run(request).await {
            Ok(report) => {
                info!(days = report.days, "daemon run completed");
            }
            Err(err) => {
                // Per-run isolation: one bad upstream day must not take
                // down a service meant to run indefinitely.
                error!(%err, "daemon run failed, next tick stays armed");
            }
        }
        clock.sleep(interval).await;
    }
}
