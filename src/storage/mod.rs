//! Storage layer for Peridot
//!
//! Provides JSON file storage with atomic writes and the archive repository.

pub mod archive;
pub mod file_io;

pub use archive::ArchiveStore;
pub use file_io::{read_json_optional, write_json_atomic};
