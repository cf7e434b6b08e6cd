//! Path management for Peridot
//!
//! Every component receives its paths from a [`PeridotPaths`] value instead
//! of looking up the home directory itself.
//!
//! ## Path Resolution Order
//!
//! 1. Home: `--home` / `PERIDOT_HOME` if given, otherwise the user's home
//!    directory as reported by the platform
//! 2. Archive: `--archive` / `PERIDOT_ARCHIVE`, default `<home>/dotfiles.peridot`
//! 3. Key: `--key-file` / `PERIDOT_KEY_FILE`, default `<home>/peridot_key.key`
//!
//! Relative values are resolved against the current directory.

use std::path::{Path, PathBuf};

use directories::{BaseDirs, ProjectDirs};

use crate::error::PeridotError;

/// Default archive file name inside the home directory
pub const ARCHIVE_FILE_NAME: &str = "dotfiles.peridot";

/// Default key file name inside the home directory
pub const KEY_FILE_NAME: &str = "peridot_key.key";

/// Manages all paths used by Peridot
#[derive(Debug, Clone)]
pub struct PeridotPaths {
    home_dir: PathBuf,
    archive_file: PathBuf,
    key_file: PathBuf,
}

impl PeridotPaths {
    /// Resolve paths, filling in anything not given explicitly
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory was given and none can be determined.
    pub fn resolve(
        home: Option<PathBuf>,
        archive: Option<PathBuf>,
        key: Option<PathBuf>,
    ) -> Result<Self, PeridotError> {
        let home_dir = match home {
            Some(home) => absolute(home)?,
            None => BaseDirs::new()
                .map(|dirs| dirs.home_dir().to_path_buf())
                .ok_or_else(|| {
                    PeridotError::Config("Could not determine home directory".into())
                })?,
        };

        let mut paths = Self::with_home(home_dir);
        if let Some(archive) = archive {
            paths.archive_file = absolute(archive)?;
        }
        if let Some(key) = key {
            paths.key_file = absolute(key)?;
        }
        Ok(paths)
    }

    /// Create PeridotPaths rooted at `home` with default file names
    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        let home_dir = home.into();
        Self {
            archive_file: home_dir.join(ARCHIVE_FILE_NAME),
            key_file: home_dir.join(KEY_FILE_NAME),
            home_dir,
        }
    }

    /// Directory whose hidden entries are backed up and restored into
    pub fn home_dir(&self) -> &Path {
        &self.home_dir
    }

    /// Get the path to the archive file
    pub fn archive_file(&self) -> &Path {
        &self.archive_file
    }

    /// Get the path to the key file
    pub fn key_file(&self) -> &Path {
        &self.key_file
    }

    /// Files Peridot itself owns, never backed up
    pub fn own_files(&self) -> [&Path; 2] {
        [&self.archive_file, &self.key_file]
    }
}

/// Relative paths are taken from the current directory
fn absolute(path: PathBuf) -> Result<PathBuf, PeridotError> {
    if path.is_absolute() {
        return Ok(path);
    }
    let cwd = std::env::current_dir().map_err(|e| {
        PeridotError::Config(format!("Could not determine current directory: {}", e))
    })?;
    Ok(cwd.join(path))
}

/// Default location of the settings file
///
/// `$XDG_CONFIG_HOME/peridot/config.json` on Linux, the platform equivalent
/// elsewhere.
pub fn default_settings_file() -> Option<PathBuf> {
    ProjectDirs::from("", "", "peridot").map(|dirs| dirs.config_dir().join("config.json"))
}
