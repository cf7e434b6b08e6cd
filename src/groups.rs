//! Group-level operations on an archive
//!
//! Upserting a group from pipeline output, listing groups, and removing a
//! single group or (with the `*` wildcard) the whole archive.

use std::collections::BTreeSet;
use std::path::PathBuf;

use tracing::info;

use crate::error::{PeridotError, PeridotResult};
use crate::models::{top_level_segment, Archive};
use crate::pipeline::{EncryptionPipeline, PipelineReport};
use crate::storage::ArchiveStore;

/// Group name that stands for "every group" in [`remove`]
pub const ALL_GROUPS: &str = "*";

/// Encrypt `files` into `group`, merging with what the group already holds
///
/// The group is seeded from its persisted entries so repeated runs only add
/// or overwrite keys. Entries for files that no longer exist are kept.
pub fn upsert(
    archive: &mut Archive,
    group: &str,
    pipeline: &EncryptionPipeline<'_>,
    files: Vec<PathBuf>,
) -> PipelineReport {
    let seed = archive.group(group).cloned().unwrap_or_default();
    let report = pipeline.run(seed, files);
    archive.insert_group(group, report.entries.clone());
    report
}

/// How much of each group to list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListMode {
    /// Distinct top-level names (`.ssh`, `.bashrc`, ...)
    #[default]
    TopLevel,
    /// Every stored path
    Detailed,
}

/// One group's listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupListing {
    pub name: String,
    /// Sorted, without duplicates
    pub items: Vec<String>,
}

/// List every group in name order
pub fn list(archive: &Archive, mode: ListMode) -> Vec<GroupListing> {
    archive
        .groups()
        .map(|(name, entries)| {
            let items = match mode {
                ListMode::Detailed => entries.keys().cloned().collect(),
                ListMode::TopLevel => entries
                    .keys()
                    .map(|key| top_level_segment(key))
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .map(String::from)
                    .collect(),
            };
            GroupListing {
                name: name.clone(),
                items,
            }
        })
        .collect()
}

/// Asks the user before a destructive action
pub trait Confirm {
    /// Returns true only on an explicit affirmative answer
    fn confirm(&mut self, prompt: &str) -> PeridotResult<bool>;
}

/// Answers every prompt the same way without asking
#[derive(Debug, Clone, Copy)]
pub struct Preconfirmed(pub bool);

impl Confirm for Preconfirmed {
    fn confirm(&mut self, _prompt: &str) -> PeridotResult<bool> {
        Ok(self.0)
    }
}

/// What [`remove`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The named group was removed and the archive saved
    GroupRemoved(String),
    /// The wildcard was given and the archive file deleted
    ArchiveDeleted,
    /// The user declined; nothing changed
    Cancelled,
}

/// Remove `group` from the archive, or delete the archive for [`ALL_GROUPS`]
///
/// Fails without prompting when the archive or the group does not exist.
/// Other groups are written back unchanged.
pub fn remove(
    store: &ArchiveStore,
    group: &str,
    confirm: &mut dyn Confirm,
) -> PeridotResult<RemoveOutcome> {
    if !store.exists() {
        return Err(PeridotError::archive_not_found(store.path()));
    }

    if group == ALL_GROUPS {
        let prompt = format!(
            "Delete ALL groups and the archive file {}?",
            store.path().display()
        );
        if !confirm.confirm(&prompt)? {
            return Ok(RemoveOutcome::Cancelled);
        }
        store.delete()?;
        return Ok(RemoveOutcome::ArchiveDeleted);
    }

    let mut archive = store.load_required()?;
    if !archive.contains_group(group) {
        return Err(PeridotError::group_not_found(group));
    }

    let prompt = format!("Are you sure you want to remove the group '{}'?", group);
    if !confirm.confirm(&prompt)? {
        return Ok(RemoveOutcome::Cancelled);
    }

    archive.remove_group(group);
    store.save(&archive)?;
    info!(group, "removed group");

    Ok(RemoveOutcome::GroupRemoved(group.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::ArchiveKey;
    use crate::models::GroupEntries;
    use std::fs;
    use tempfile::TempDir;

    fn entries(keys: &[&str]) -> GroupEntries {
        keys.iter()
            .map(|k| (k.to_string(), format!("token-{}", k)))
            .collect()
    }

    fn sample_archive() -> Archive {
        let mut archive = Archive::new();
        archive.insert_group(
            "work",
            entries(&[".ssh/id_rsa", ".bashrc", ".ssh/config", ".config/git/config"]),
        );
        archive.insert_group("home", entries(&[".zshrc"]));
        archive
    }

    /// Records prompts and answers from a script
    struct Scripted {
        answer: bool,
        prompts: Vec<String>,
    }

    impl Confirm for Scripted {
        fn confirm(&mut self, prompt: &str) -> PeridotResult<bool> {
            self.prompts.push(prompt.to_string());
            Ok(self.answer)
        }
    }

    #[test]
    fn test_list_top_level() {
        let listing = list(&sample_archive(), ListMode::TopLevel);

        assert_eq!(listing.len(), 2);
        assert_eq!(listing[0].name, "home");
        assert_eq!(listing[1].name, "work");
        assert_eq!(listing[1].items, vec![".bashrc", ".config", ".ssh"]);
    }

    #[test]
    fn test_list_detailed() {
        let listing = list(&sample_archive(), ListMode::Detailed);

        assert_eq!(
            listing[1].items,
            vec![".bashrc", ".config/git/config", ".ssh/config", ".ssh/id_rsa"]
        );
    }

    #[test]
    fn test_list_is_stable() {
        let archive = sample_archive();
        assert_eq!(
            list(&archive, ListMode::TopLevel),
            list(&archive, ListMode::TopLevel)
        );
    }

    #[test]
    fn test_upsert_merges_runs() {
        let temp = TempDir::new().unwrap();
        let home = temp.path();
        let key = ArchiveKey::generate();
        let pipeline = EncryptionPipeline::new(&key, home).with_workers(2);

        fs::write(home.join(".a"), "a1").unwrap();
        fs::write(home.join(".b"), "b1").unwrap();
        let mut archive = Archive::new();
        upsert(&mut archive, "g", &pipeline, vec![home.join(".a"), home.join(".b")]);

        fs::remove_file(home.join(".a")).unwrap();
        fs::write(home.join(".b"), "b2").unwrap();
        fs::write(home.join(".c"), "c1").unwrap();
        let report = upsert(&mut archive, "g", &pipeline, vec![home.join(".b"), home.join(".c")]);

        let group = archive.group("g").unwrap();
        assert_eq!(group.keys().collect::<Vec<_>>(), vec![".a", ".b", ".c"]);
        assert_eq!(crate::crypto::decrypt(&group[".b"], &key).unwrap(), b"b2");
        assert_eq!(report.encrypted(), 2);
    }

    #[test]
    fn test_remove_group_leaves_others_untouched() {
        let temp = TempDir::new().unwrap();
        let store = ArchiveStore::new(temp.path().join("dotfiles.peridot"));
        let archive = sample_archive();
        store.save(&archive).unwrap();

        let mut confirm = Scripted {
            answer: true,
            prompts: vec![],
        };
        let outcome = remove(&store, "work", &mut confirm).unwrap();

        assert_eq!(outcome, RemoveOutcome::GroupRemoved("work".into()));
        assert_eq!(confirm.prompts.len(), 1);
        let reloaded = store.load().unwrap();
        assert!(!reloaded.contains_group("work"));
        assert_eq!(reloaded.group("home"), archive.group("home"));
    }

    #[test]
    fn test_remove_cancelled() {
        let temp = TempDir::new().unwrap();
        let store = ArchiveStore::new(temp.path().join("dotfiles.peridot"));
        store.save(&sample_archive()).unwrap();
        let before = fs::read(store.path()).unwrap();

        let outcome = remove(&store, "work", &mut Preconfirmed(false)).unwrap();
        assert_eq!(outcome, RemoveOutcome::Cancelled);

        let outcome = remove(&store, ALL_GROUPS, &mut Preconfirmed(false)).unwrap();
        assert_eq!(outcome, RemoveOutcome::Cancelled);

        assert_eq!(fs::read(store.path()).unwrap(), before);
    }

    #[test]
    fn test_remove_missing_group_does_not_prompt() {
        let temp = TempDir::new().unwrap();
        let store = ArchiveStore::new(temp.path().join("dotfiles.peridot"));
        store.save(&sample_archive()).unwrap();

        let mut confirm = Scripted {
            answer: true,
            prompts: vec![],
        };
        let err = remove(&store, "nope", &mut confirm).unwrap_err();

        assert!(err.is_not_found());
        assert!(confirm.prompts.is_empty());
    }

    #[test]
    fn test_remove_all_deletes_archive() {
        let temp = TempDir::new().unwrap();
        let store = ArchiveStore::new(temp.path().join("dotfiles.peridot"));
        store.save(&sample_archive()).unwrap();

        let outcome = remove(&store, ALL_GROUPS, &mut Preconfirmed(true)).unwrap();

        assert_eq!(outcome, RemoveOutcome::ArchiveDeleted);
        assert!(!store.exists());
        assert!(store.load_existing().unwrap().is_none());
    }

    #[test]
    fn test_remove_without_archive() {
        let temp = TempDir::new().unwrap();
        let store = ArchiveStore::new(temp.path().join("dotfiles.peridot"));

        let err = remove(&store, "work", &mut Preconfirmed(true)).unwrap_err();
        assert!(err.is_not_found());
    }
}
