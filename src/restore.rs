//! Group restoration
//!
//! Decrypts every entry of a group and writes it back to its home-relative
//! location, overwriting whatever is there. Missing parent directories are
//! not created: entries come from files that lived there before. Newly
//! created files are readable by the owner only.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::crypto::{decrypt, ArchiveKey};
use crate::error::{ItemFailure, PeridotError, PeridotResult};
use crate::models::{from_archive_key, Archive};

/// Result of a restore operation
#[derive(Debug, Default)]
pub struct RestoreReport {
    /// Files written, in archive key order
    pub restored: Vec<PathBuf>,
    /// Entries that could not be decrypted or written, keyed by archive key
    pub failures: Vec<ItemFailure>,
}

impl RestoreReport {
    /// Whether every entry was restored
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Get a summary of what was restored
    pub fn summary(&self) -> String {
        format!(
            "Restored {} file(s), {} failed",
            self.restored.len(),
            self.failures.len()
        )
    }
}

/// Writes decrypted group entries under a home directory
pub struct RestoreEngine<'a> {
    key: &'a ArchiveKey,
    home: &'a Path,
}

impl<'a> RestoreEngine<'a> {
    /// Create a new RestoreEngine
    pub fn new(key: &'a ArchiveKey, home: &'a Path) -> Self {
        Self { key, home }
    }

    /// Restore every entry of `group`
    ///
    /// A missing group is an error and nothing is written. Per-entry
    /// failures are collected and the remaining entries still restored.
    pub fn restore(&self, archive: &Archive, group: &str) -> PeridotResult<RestoreReport> {
        let entries = archive
            .group(group)
            .ok_or_else(|| PeridotError::group_not_found(group))?;

        info!(group, entries = entries.len(), "restoring group");

        let mut report = RestoreReport::default();
        for (archive_key, token) in entries {
            match self.restore_entry(archive_key, token) {
                Ok(path) => {
                    debug!(path = %path.display(), "restored file");
                    report.restored.push(path);
                }
                Err(error) => {
                    warn!(path = %archive_key, %error, "failed to restore entry");
                    report.failures.push(ItemFailure::new(archive_key, error));
                }
            }
        }

        info!(
            restored = report.restored.len(),
            failed = report.failures.len(),
            "restore finished"
        );
        Ok(report)
    }

    fn restore_entry(&self, archive_key: &str, token: &str) -> PeridotResult<PathBuf> {
        let target = from_archive_key(self.home, archive_key)?;
        let plaintext = decrypt(token, self.key)?;

        write_private(&target, &plaintext).map_err(|e| {
            PeridotError::Io(format!("Failed to write {}: {}", target.display(), e))
        })?;

        Ok(target)
    }
}

/// Overwrite `path`; a file that does not exist yet is created owner-only
fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(contents)
}
