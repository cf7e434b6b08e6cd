//! User settings for Peridot
//!
//! Optional JSON settings file; every field has a default, so a missing
//! file or missing fields are fine.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PeridotError;
use crate::pipeline::{DEFAULT_QUEUE_CAPACITY, DEFAULT_WORKERS};
use crate::storage::file_io::read_json_optional;

/// User settings for Peridot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Number of encryption worker threads
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Bound on files queued ahead of the workers
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Hidden top-level names never backed up by default (e.g. ".cache")
    #[serde(default)]
    pub exclude: Vec<String>,
}

fn default_workers() -> usize {
    DEFAULT_WORKERS
}

fn default_queue_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            queue_capacity: default_queue_capacity(),
            exclude: Vec::new(),
        }
    }
}

impl Settings {
    /// Load settings from `path`, or defaults if the file doesn't exist
    pub fn load_or_default(path: &Path) -> Result<Self, PeridotError> {
        let settings: Settings = read_json_optional(path)
            .map_err(|e| PeridotError::Config(format!("Failed to load settings: {}", e)))?
            .unwrap_or_default();

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), PeridotError> {
        if self.workers == 0 {
            return Err(PeridotError::Config("workers must be at least 1".into()));
        }
        if self.queue_capacity == 0 {
            return Err(PeridotError::Config(
                "queue_capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
