//! Core data models for Peridot
//!
//! The archive structure and the mapping between files on disk and the
//! keys they are stored under.

pub mod archive;
pub mod relative_path;

pub use archive::{Archive, GroupEntries};
pub use relative_path::{from_archive_key, to_archive_key, top_level_segment};
