//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the core operations.

pub mod backup;
pub mod group;
pub mod prompt;
pub mod restore;

pub use backup::{handle_encrypt, handle_update, EncryptArgs, UpdateArgs};
pub use group::{handle_list, handle_remove};
pub use prompt::Prompt;
pub use restore::handle_decrypt;
