//! Builder for the snapshot collections.
//!
//! Chooses between in-memory collections and append-only logs in a data
//! directory, either explicitly or from a [`Config`].

use crate::config::Config;
use crate::error::Result;
use crate::storage::Snapshots;
use std::path::PathBuf;

/// Builder for [`Snapshots`] with an optional persistence directory.
#[derive(Debug)]
pub struct SnapshotsBuilder {
    path: Option<PathBuf>,
    in_memory: bool,
}

impl SnapshotsBuilder {
    /// Create a new builder with default in-memory configuration.
    pub fn new() -> Self {
        Self {
            path: None,
            in_memory: true,
        }
    }

    /// Directory for `stations.jsonl` and `weather.jsonl`.
    pub fn path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.path = Some(path.into());
        self.in_memory = false;
        self
    }

    /// Configure for in-memory storage with no persistence.
    pub fn in_memory(mut self) -> Self {
        self.in_memory = true;
        self.path = None;
        self
    }

    /// Take the persistence settings from `config`.
    pub fn config(self, config: &Config) -> Self {
        match &config.persistence.data_dir {
            Some(dir) => self.path(dir.clone()),
            None => self.in_memory(),
        }
    }

    pub fn build(self) -> Result<Snapshots> {
        match self.path {
            Some(path) if !self.in_memory => {
                log::info!("Persisting snapshots under {}", path.display());
                Ok(Snapshots::open(path)?)
            }
            _ => {
                log::info!("Keeping snapshots in memory");
                Ok(Snapshots::memory())
            }
        }
    }
}

impl Default for SnapshotsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
