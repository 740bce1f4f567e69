use thiserror::Error;

/// Top-level error taxonomy for the crawl pipeline.
///
/// No variant is ever swallowed: every failure aborts the current run and
/// bubbles up to the entry point, which decides whether the process exits
/// (batch) or the recurring trigger stays armed (daemon).
#[derive(Debug, Error)]
pub enum CrawlError {
    /// Startup-fatal configuration problem: unreadable config file,
    /// unresolvable timezone name, unknown environment.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Network/HTTP failure talking to the upstream feed. Never retried.
    #[error("transport error: {0}")]
    Transport(String),

    /// The feed kept returning a malformed or empty body after every
    /// validation attempt.
    #[error("feed data unavailable after {attempts} attempts")]
    DataUnavailable { attempts: u32 },

    /// Local persistence failure (disk full, permissions, path not creatable).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Outbound event could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Message sink rejected a produce or flush.
    #[error("sink error: {0}")]
    Sink(String),

    /// Unrecognized run mode string.
    #[error("unknown run mode '{0}', expected one of batch, daemon")]
    InvalidMode(String),

    /// Unrecognized fetch kind string.
    #[error("unknown fetch kind '{0}', expected one of real, virtual")]
    InvalidKind(String),
}
