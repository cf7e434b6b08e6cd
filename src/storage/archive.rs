//! Archive repository for JSON storage
//!
//! Loads and saves the whole archive file. Every save rewrites the entire
//! document through a temp file and rename, so an interrupted save leaves
//! the previous archive intact.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{PeridotError, PeridotResult};
use crate::models::Archive;

use super::file_io::{read_json_optional, write_json_atomic};

/// Repository for archive persistence
#[derive(Debug, Clone)]
pub struct ArchiveStore {
    path: PathBuf,
}

impl ArchiveStore {
    /// Create a store for the archive at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the archive file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the archive file exists yet
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the archive, treating a missing file as an empty archive
    ///
    /// A malformed archive is a [`PeridotError::Storage`] error.
    pub fn load(&self) -> PeridotResult<Archive> {
        Ok(self.load_existing()?.unwrap_or_default())
    }

    /// Load the archive, or `None` if the file does not exist
    pub fn load_existing(&self) -> PeridotResult<Option<Archive>> {
        let archive: Option<Archive> = read_json_optional(&self.path)?;
        if let Some(archive) = &archive {
            debug!(path = %self.path.display(), groups = archive.len(), "loaded archive");
        }
        Ok(archive)
    }

    /// Like [`load_existing`](Self::load_existing), but a missing file is an error
    pub fn load_required(&self) -> PeridotResult<Archive> {
        self.load_existing()?
            .ok_or_else(|| PeridotError::archive_not_found(&self.path))
    }

    /// Save the whole archive, replacing the previous file
    pub fn save(&self, archive: &Archive) -> PeridotResult<()> {
        write_json_atomic(&self.path, archive)?;
        info!(path = %self.path.display(), groups = archive.len(), "saved archive");
        Ok(())
    }

    /// Delete the archive file
    pub fn delete(&self) -> PeridotResult<()> {
        if !self.exists() {
            return Err(PeridotError::archive_not_found(&self.path));
        }
        fs::remove_file(&self.path).map_err(|e| {
            PeridotError::Storage(format!(
                "Failed to delete {}: {}",
                self.path.display(),
                e
            ))
        })?;
        info!(path = %self.path.display(), "deleted archive");
        Ok(())
    }
}
