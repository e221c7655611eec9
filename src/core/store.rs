//! Snapshot persistence keyed by a fixed identifier

use crate::core::selection::Snapshot;
use crate::{debug, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while writing or clearing a snapshot
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure
    #[error("failed to write snapshot {path}: {source}")]
    Io {
        /// Snapshot file
        path: String,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// Serialization failure
    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
}

/// JSON snapshot file `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// Store the snapshot for `key` inside `dir`
    #[must_use]
    pub fn new(dir: &Path, key: &str) -> Self {
        Self {
            path: dir.join(format!("{key}.json")),
        }
    }

    /// The snapshot file location
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted snapshot.
    ///
    /// Absent, unreadable or malformed data all mean "no prior state"; the
    /// latter two are logged.
    #[must_use]
    pub fn load(&self) -> Option<Snapshot> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No snapshot at {}", self.path.display());
                return None;
            }
            Err(e) => {
                warn!("Failed to read snapshot {}: {e}", self.path.display());
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!(
                    "Ignoring unparsable snapshot {}: {e}",
                    self.path.display()
                );
                None
            }
        }
    }

    /// Overwrite the persisted snapshot
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created or the file cannot be written.
    pub fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(snapshot)?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        fs::write(&self.path, json).map_err(|e| self.io_error(e))?;
        debug!("Snapshot written to {}", self.path.display());
        Ok(())
    }

    /// Delete the persisted snapshot; returns `false` when there was none
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be removed.
    pub fn clear(&self) -> Result<bool, StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}
