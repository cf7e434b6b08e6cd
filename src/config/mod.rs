//! Configuration module for Peridot
//!
//! This module provides configuration management including:
//! - Home, archive and key file path resolution
//! - Optional user settings (worker count, exclusions)

pub mod paths;
pub mod settings;

pub use paths::PeridotPaths;
pub use settings::Settings;
