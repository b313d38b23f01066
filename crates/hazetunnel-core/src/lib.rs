//! # hazetunnel-core
//!
//! Core library for hazetunnel providing:
//! - The error taxonomy shared by the updater, the control bridge and the CLI
//! - Dotted version parsing with numeric ordering
//! - Host platform identification for artifact selection
//! - Runtime configuration with hierarchical loading

pub mod config;
pub mod error;
pub mod types;
pub mod utils;
pub mod version;

pub use config::HierarchicalConfigLoader;
pub use error::{Error, Result};
pub use types::{PlatformTag, RuntimeConfig};
pub use utils::{get_home_dir, get_install_dir};
pub use version::Version;
