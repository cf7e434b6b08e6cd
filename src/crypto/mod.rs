//! Cryptographic functions for Peridot
//!
//! Provides AES-256-GCM authenticated encryption of file contents under a
//! single randomly generated archive key.

pub mod encryption;
pub mod key;

pub use encryption::{decrypt, encrypt};
pub use key::{ArchiveKey, KEY_SIZE};
