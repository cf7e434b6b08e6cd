//! Archive data model
//!
//! An archive maps group names to the encrypted files of that group. It is
//! persisted as a single JSON object:
//!
//! ```json
//! { "work": { ".bashrc": "<token>", ".ssh/id_rsa": "<token>" } }
//! ```
//!
//! Both levels use ordered maps so a saved archive is byte-for-byte
//! reproducible for the same contents.

use std::collections::btree_map::{self, BTreeMap};

use serde::{Deserialize, Serialize};

/// Home-relative path (`/`-separated) to ciphertext token
pub type GroupEntries = BTreeMap<String, String>;

/// All groups in an archive
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Archive {
    groups: BTreeMap<String, GroupEntries>,
}

impl Archive {
    /// Create an empty archive
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a group's entries
    pub fn group(&self, name: &str) -> Option<&GroupEntries> {
        self.groups.get(name)
    }

    /// Check whether a group exists
    pub fn contains_group(&self, name: &str) -> bool {
        self.groups.contains_key(name)
    }

    /// Replace a group's entries wholesale
    pub fn insert_group(&mut self, name: impl Into<String>, entries: GroupEntries) {
        self.groups.insert(name.into(), entries);
    }

    /// Remove a group, returning its entries
    pub fn remove_group(&mut self, name: &str) -> Option<GroupEntries> {
        self.groups.remove(name)
    }

    /// Iterate groups in name order
    pub fn groups(&self) -> btree_map::Iter<'_, String, GroupEntries> {
        self.groups.iter()
    }

    /// Number of groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Check if there are no groups
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
