//! Per-day artifact persistence.
//!
//! One file per trading day at `<data_dir>/<YYYY-MM-DD>.json`. The path is
//! a pure function of the data directory and the date string, so re-running
//! a day overwrites the same artifact. Writes go through a temporary file
//! followed by an atomic rename, so a reader never observes a truncated
//! payload.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::error::CrawlError;

/// Persistence capability for validated feed payloads.
pub trait ArtifactStore: Send + Sync {
    /// Deterministic artifact path for a trading day's date string.
    fn path_for(&self, date_string: &str) -> PathBuf;

    /// Write a payload for a trading day, returning the final path.
    ///
    /// # Errors
    ///
    /// Returns [`CrawlError::Io`] on any filesystem failure; the current
    /// day's processing aborts and earlier days are left in place.
    fn persist(&self, date_string: &str, payload: &[u8]) -> Result<PathBuf, CrawlError>;
}

/// Filesystem-backed store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn shared(data_dir: impl Into<PathBuf>) -> Arc<dyn ArtifactStore> {
        Arc::new(Self::new(data_dir))
    }
}

impl ArtifactStore for FileStore {
    fn path_for(&self, date_string: &str) -> PathBuf {
        self.data_dir.join(format!("{date_string}.json"))
    }

    fn persist(&self, date_string: &str, payload: &[u8]) -> Result<PathBuf, CrawlError> {
        std::fs::create_dir_all(&self.data_dir)?;

        // Stage in the same directory so the rename stays on one filesystem.
        let mut staged = tempfile::NamedTempFile::new_in(&self.data_dir)?;
        staged.write_all(payload)?;
        staged.as_file().sync_all()?;

        let path = self.path_for(date_string);
        staged.persist(&path).map_err(|e| CrawlError::Io(e.error))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644))?;
        }

        info!(path = %path.display(), bytes = payload.len(), "artifact persisted");
        Ok(path)
    }
}
