use closetick_core::{CrawlerConfig, FetchKind, RunRequest};
use tracing::info;

use crate::cli::BatchArgs;
use crate::error::CliError;

use super::build_crawler;

/// One-shot run over an explicit date range. Flags override the `[batch]`
/// config section; the range must come from one of the two.
pub async fn run_batch(config: &CrawlerConfig, args: &BatchArgs) -> Result<(), CliError> {
    let batch = config.batch.as_ref();

    let start = args
        .start
        .or(batch.map(|b| b.start))
        .ok_or_else(|| CliError::Command(String::from("batch needs --start or [batch] start")))?;
    let end = args
        .end
        .or(batch.map(|b| b.end))
        .ok_or_else(|| CliError::Command(String::from("batch needs --end or [batch] end")))?;
    let kind = args
        .kind
        .map(FetchKind::from)
        .or(batch.map(|b| b.kind))
        .unwrap_or(FetchKind::Real);

    let crawler = build_crawler(config)?;
    let report = crawler.run(RunRequest::batch(kind, start, end)).await?;

    info!(days = report.days, "batch run completed");
    Ok(())
}
