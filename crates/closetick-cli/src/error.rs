use closetick_core::CrawlError;
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Crawl(#[from] CrawlError),

    #[error("command error: {0}")]
    Command(String),
}

impl CliError {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Crawl(err) => match err {
                CrawlError::Configuration(_)
                | CrawlError::InvalidMode(_)
                | CrawlError::InvalidKind(_) => 2,
                CrawlError::Transport(_) => 3,
                CrawlError::DataUnavailable { .. } => 4,
                CrawlError::Serialization(_) => 5,
                CrawlError::Sink(_) => 6,
                CrawlError::Io(_) => 10,
            },
            Self::Command(_) => 2,
        }
    }
}
