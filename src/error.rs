//! Custom error types for Peridot
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// The main error type for Peridot operations
#[derive(Error, Debug)]
pub enum PeridotError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Archive file errors (unreadable, malformed, failed write)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Encryption and decryption errors
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// A path that cannot be stored in or restored from the archive
    #[error("Path error: {0}")]
    Path(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// No key file to decrypt with
    #[error("Encryption key not found at {}", .0.display())]
    KeyMissing(PathBuf),

    /// A batch finished but some items failed
    #[error("{failed} of {total} entries failed")]
    Partial { failed: usize, total: usize },
}

impl PeridotError {
    /// Create a "not found" error for groups
    pub fn group_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Group",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for the archive file itself
    pub fn archive_not_found(path: &Path) -> Self {
        Self::NotFound {
            entity_type: "Archive",
            identifier: path.display().to_string(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<std::io::Error> for PeridotError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result type alias for Peridot operations
pub type PeridotResult<T> = Result<T, PeridotError>;

/// A failure confined to a single file or archive entry
///
/// Batch operations collect these instead of aborting.
#[derive(Debug)]
pub struct ItemFailure {
    /// The file (or home-relative archive key) that failed
    pub path: PathBuf,
    /// What went wrong
    pub error: PeridotError,
}

impl ItemFailure {
    pub fn new(path: impl Into<PathBuf>, error: PeridotError) -> Self {
        Self {
            path: path.into(),
            error,
        }
    }
}
