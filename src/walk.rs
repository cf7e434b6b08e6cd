//! Backup path enumeration
//!
//! Expands a set of root paths into the exact list of regular files to back
//! up. Symbolic links are never followed or yielded, and sockets, FIFOs and
//! device nodes are skipped. The full list is built before any encryption
//! starts so the pipeline knows its total up front.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{ItemFailure, PeridotError, PeridotResult};

/// Files found under a set of roots
#[derive(Debug, Default)]
pub struct Enumeration {
    /// Regular files, in walk order
    pub files: Vec<PathBuf>,
    /// Roots or subtrees that could not be read
    pub failures: Vec<ItemFailure>,
}

impl Enumeration {
    /// Number of files to process
    pub fn total(&self) -> usize {
        self.files.len()
    }

    /// Drop any file that is the same file as one of `paths`
    ///
    /// Paths are compared after canonicalization, so relative or
    /// non-normalized spellings still match. Paths that do not exist
    /// cannot have been enumerated and are ignored.
    pub fn exclude(&mut self, paths: &[&Path]) {
        let excluded: Vec<PathBuf> = paths
            .iter()
            .filter_map(|path| fs::canonicalize(path).ok())
            .collect();
        if excluded.is_empty() {
            return;
        }

        self.files.retain(|file| match fs::canonicalize(file) {
            Ok(real) => {
                let keep = !excluded.contains(&real);
                if !keep {
                    debug!(path = %file.display(), "excluding peridot's own file");
                }
                keep
            }
            // Left in; the pipeline reports it if it is really unreadable
            Err(_) => true,
        });
    }
}

/// Top-level hidden entries of a home directory
#[derive(Debug, Default)]
pub struct HomeEntries {
    /// Hidden files and directories, sorted by name
    pub roots: Vec<PathBuf>,
    /// Entries that could not be inspected
    pub failures: Vec<ItemFailure>,
}

/// Expand `roots` into the regular files they contain
///
/// A root that is a regular file is yielded as-is; a directory root is
/// walked recursively without following symlinks. Symlinked roots are
/// skipped entirely. Unreadable subtrees are recorded as failures and the
/// walk continues with the rest.
pub fn enumerate<I, P>(roots: I) -> Enumeration
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut result = Enumeration::default();
    let mut seen = HashSet::new();

    for root in roots {
        let root = root.as_ref();
        let file_type = match fs::symlink_metadata(root) {
            Ok(meta) => meta.file_type(),
            Err(e) => {
                result.failures.push(ItemFailure::new(
                    root,
                    PeridotError::Io(format!("Failed to stat: {}", e)),
                ));
                continue;
            }
        };

        if file_type.is_file() {
            if seen.insert(root.to_path_buf()) {
                result.files.push(root.to_path_buf());
            }
        } else if file_type.is_dir() {
            walk_dir(root, &mut seen, &mut result);
        } else {
            debug!(path = %root.display(), "skipping root: not a regular file or directory");
        }
    }

    info!(
        files = result.files.len(),
        failures = result.failures.len(),
        "enumerated backup paths"
    );
    result
}

fn walk_dir(root: &Path, seen: &mut HashSet<PathBuf>, result: &mut Enumeration) {
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name();

    for entry in walker {
        match entry {
            // Only regular files; this drops symlinks, sockets, fifos and devices.
            Ok(entry) if entry.file_type().is_file() => {
                let path = entry.into_path();
                if seen.insert(path.clone()) {
                    result.files.push(path);
                }
            }
            Ok(_) => {}
            Err(e) => {
                let path = e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf());
                result
                    .failures
                    .push(ItemFailure::new(path, PeridotError::Io(e.to_string())));
            }
        }
    }
}

/// Hidden (`.`-prefixed) entries directly under `home`, sorted by name
///
/// Symlinks and special files are left out, as is any name in `skip`.
/// Only an unreadable home directory is an error; a bad entry is recorded
/// as a failure and skipped.
pub fn hidden_entries(home: &Path, skip: &[String]) -> PeridotResult<HomeEntries> {
    let dir = fs::read_dir(home).map_err(|e| {
        PeridotError::Io(format!(
            "Failed to read home directory {}: {}",
            home.display(),
            e
        ))
    })?;

    let mut result = HomeEntries::default();
    for entry in dir {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                result.failures.push(ItemFailure::new(
                    home,
                    PeridotError::Io(format!("Failed to read directory entry: {}", e)),
                ));
                continue;
            }
        };

        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            debug!(name = ?name, "skipping non UTF-8 home entry");
            continue;
        };
        if !name.starts_with('.') || skip.iter().any(|s| s == name) {
            continue;
        }

        // DirEntry::file_type does not follow symlinks
        match entry.file_type() {
            Ok(file_type) if file_type.is_file() || file_type.is_dir() => {
                result.roots.push(entry.path());
            }
            Ok(_) => {}
            Err(e) => result.failures.push(ItemFailure::new(
                entry.path(),
                PeridotError::Io(format!("Failed to stat: {}", e)),
            )),
        }
    }

    result.roots.sort();
    Ok(result)
}
