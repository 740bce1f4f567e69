mod batch;
mod daemon;

use std::sync::Arc;

use closetick_core::{
    Crawler, CrawlerConfig, ExchangeCalendar, FileStore, Fetcher, NdjsonFileSink,
    ReqwestTransport, SystemClock,
};

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub use batch::run_batch;
pub use daemon::run_daemon;

pub async fn run(cli: &Cli) -> Result<(), CliError> {
    let config = CrawlerConfig::load(&cli.config)?;

    match &cli.command {
        Command::Batch(args) => run_batch(&config, args).await,
        Command::Daemon => run_daemon(&config).await,
    }
}

/// Wire the production pipeline from resolved configuration.
pub(crate) fn build_crawler(config: &CrawlerConfig) -> Result<Crawler, CliError> {
    let calendar = ExchangeCalendar::new(&config.calendar.timezone)?;
    let clock = Arc::new(SystemClock);

    let fetcher = Fetcher::new(
        Arc::new(ReqwestTransport::new()),
        clock.clone(),
        config.feed.clone(),
        config.pacing.fetch_policy(),
    );

    Ok(Crawler::new(
        calendar,
        fetcher,
        FileStore::shared(&config.data_dir),
        Arc::new(NdjsonFileSink::new(&config.spool_dir)),
        clock,
        config.processor_topic(),
        config.pacing.pacing_policy(),
    ))
}
