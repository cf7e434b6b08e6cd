//! Restore CLI command
//!
//! `decrypt <group>`: write a group's files back under the home directory.

use crate::config::PeridotPaths;
use crate::crypto::ArchiveKey;
use crate::display::format_failures;
use crate::error::{PeridotError, PeridotResult};
use crate::restore::RestoreEngine;
use crate::storage::ArchiveStore;

/// Handle `decrypt <group>`
///
/// The key file and the archive must both exist before anything is written.
pub fn handle_decrypt(paths: &PeridotPaths, group: &str) -> PeridotResult<()> {
    let key = ArchiveKey::load(paths.key_file())?;
    let archive = ArchiveStore::new(paths.archive_file()).load_required()?;

    let engine = RestoreEngine::new(&key, paths.home_dir());
    let report = engine.restore(&archive, group)?;

    println!(
        "Group '{}' restored to {}",
        group,
        paths.home_dir().display()
    );
    println!("{}", report.summary());

    if report.is_complete() {
        return Ok(());
    }

    print!("{}", format_failures("Could not restore", &report.failures));
    Err(PeridotError::Partial {
        failed: report.failures.len(),
        total: report.failures.len() + report.restored.len(),
    })
}
