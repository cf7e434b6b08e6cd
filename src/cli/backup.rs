//! Backup CLI commands
//!
//! `encrypt` and `update`: enumerate files, run the encryption pipeline into
//! a group, and save the archive.

use std::path::{Path, PathBuf};

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::{PeridotPaths, Settings};
use crate::crypto::ArchiveKey;
use crate::display::format_failures;
use crate::error::{PeridotError, PeridotResult};
use crate::groups;
use crate::pipeline::EncryptionPipeline;
use crate::storage::ArchiveStore;
use crate::walk;

/// Arguments for `encrypt`
#[derive(Args, Debug)]
pub struct EncryptArgs {
    /// Group to create or add to
    pub group: String,

    /// Files or directories to back up instead of the hidden home entries
    pub paths: Vec<PathBuf>,

    /// Generate a fresh key (only allowed while the archive is empty)
    #[arg(long)]
    pub new_key: bool,
}

/// Arguments for `update`
#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Group to refresh
    pub group: String,

    /// Files or directories to back up instead of the hidden home entries
    pub paths: Vec<PathBuf>,
}

/// How the key for a backup run is obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyPolicy {
    /// Reuse the key file, creating it if absent
    Reuse,
    /// Replace the key file with a new key
    Fresh,
}

/// Handle `encrypt <group> [paths...]`
pub fn handle_encrypt(
    paths: &PeridotPaths,
    settings: &Settings,
    args: EncryptArgs,
) -> PeridotResult<()> {
    let policy = if args.new_key {
        KeyPolicy::Fresh
    } else {
        KeyPolicy::Reuse
    };
    run_backup(paths, settings, &args.group, &args.paths, policy)
}

/// Handle `update <group> [paths...]`
pub fn handle_update(
    paths: &PeridotPaths,
    settings: &Settings,
    args: UpdateArgs,
) -> PeridotResult<()> {
    run_backup(paths, settings, &args.group, &args.paths, KeyPolicy::Reuse)
}

fn run_backup(
    paths: &PeridotPaths,
    settings: &Settings,
    group: &str,
    explicit: &[PathBuf],
    policy: KeyPolicy,
) -> PeridotResult<()> {
    if group == groups::ALL_GROUPS {
        return Err(PeridotError::Config(format!(
            "'{}' is reserved and cannot be used as a group name",
            groups::ALL_GROUPS
        )));
    }

    let store = ArchiveStore::new(paths.archive_file());
    let mut archive = store.load()?;

    let key = obtain_key(paths.key_file(), policy, archive.is_empty())?;

    let home_entries = if explicit.is_empty() {
        walk::hidden_entries(paths.home_dir(), &settings.exclude)?
    } else {
        walk::HomeEntries {
            roots: explicit
                .iter()
                .map(|p| paths.home_dir().join(p))
                .collect(),
            failures: Vec::new(),
        }
    };

    let mut enumeration = walk::enumerate(&home_entries.roots);
    enumeration.failures.extend(home_entries.failures);
    enumeration.exclude(&paths.own_files());

    let total = enumeration.total();
    println!("Files to process: {}", total);

    let progress = ProgressBar::new(total as u64);
    if let Ok(style) =
        ProgressStyle::with_template("{bar:40} {pos}/{len} Encrypting: {percent}%")
    {
        progress.set_style(style);
    }

    let pipeline = EncryptionPipeline::new(&key, paths.home_dir())
        .with_workers(settings.workers)
        .with_queue_capacity(settings.queue_capacity)
        .with_progress(progress.clone());

    let existed = archive.contains_group(group);
    let report = groups::upsert(&mut archive, group, &pipeline, enumeration.files);
    progress.finish_and_clear();

    // Partial results are saved; failures are reported below.
    store.save(&archive)?;

    println!(
        "{} group '{}': {} of {} file(s) encrypted, {} entries stored in {}",
        if existed { "Updated" } else { "Created" },
        group,
        report.encrypted(),
        report.total,
        report.entries.len(),
        store.path().display()
    );
    print!("{}", format_failures("Skipped paths", &enumeration.failures));
    print!("{}", format_failures("Failed to encrypt", &report.failures));

    Ok(())
}

fn obtain_key(
    key_file: &Path,
    policy: KeyPolicy,
    archive_empty: bool,
) -> PeridotResult<ArchiveKey> {
    match policy {
        KeyPolicy::Fresh => {
            if !archive_empty {
                return Err(PeridotError::Config(
                    "The archive already holds groups encrypted with the current key; \
                     remove them first ('rm *') before generating a new key"
                        .into(),
                ));
            }
            let key = ArchiveKey::generate();
            key.save(key_file)?;
            println!("Generated a new key at {}", key_file.display());
            Ok(key)
        }
        KeyPolicy::Reuse => {
            let (key, generated) = ArchiveKey::load_or_generate(key_file)?;
            if generated {
                println!("Generated a new key at {}", key_file.display());
            }
            Ok(key)
        }
    }
}
