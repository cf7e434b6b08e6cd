//! Peridot - encrypted dotfiles backup and restore
//!
//! Peridot walks the hidden entries of a home directory, encrypts every
//! regular file it finds, and stores the ciphertexts under a named group in
//! a single JSON archive. A group can later be decrypted back into place,
//! listed, or removed.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Home, archive and key paths; user settings
//! - `error`: Custom error types
//! - `crypto`: Archive key and AES-256-GCM encryption
//! - `models`: The archive structure and archive keys
//! - `storage`: JSON file storage with atomic writes
//! - `walk`: Selection of the files to back up
//! - `pipeline`: Concurrent encryption of files into a group
//! - `groups`: Upsert, list and remove groups
//! - `restore`: Decrypt a group back to disk
//! - `display`: Text output for listings and failure reports
//! - `cli`: Command handlers for the `peridot` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use peridot::config::PeridotPaths;
//! use peridot::crypto::ArchiveKey;
//! use peridot::pipeline::EncryptionPipeline;
//! use peridot::storage::ArchiveStore;
//! use peridot::{groups, walk};
//!
//! let paths = PeridotPaths::resolve(None, None, None)?;
//! let (key, _) = ArchiveKey::load_or_generate(paths.key_file())?;
//! let store = ArchiveStore::new(paths.archive_file());
//! let mut archive = store.load()?;
//!
//! let home = walk::hidden_entries(paths.home_dir(), &[])?;
//! let mut enumeration = walk::enumerate(&home.roots);
//! enumeration.exclude(&paths.own_files());
//! let files = enumeration.files;
//! let pipeline = EncryptionPipeline::new(&key, paths.home_dir()).with_workers(4);
//! let report = groups::upsert(&mut archive, "laptop", &pipeline, files);
//! store.save(&archive)?;
//! ```

pub mod cli;
pub mod config;
pub mod crypto;
pub mod display;
pub mod error;
pub mod groups;
pub mod models;
pub mod pipeline;
pub mod restore;
pub mod storage;
pub mod walk;

pub use error::{PeridotError, PeridotResult};
