//! Shared utility functions for hazetunnel crates

use crate::error::{Error, Result};
use crate::types::ComponentConfig;
use std::path::PathBuf;

/// Get the user's home directory
///
/// Prefers the HOME environment variable over dirs::home_dir() so that
/// container setups overriding HOME are respected.
pub fn get_home_dir() -> Result<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        return Ok(PathBuf::from(home));
    }

    dirs::home_dir().ok_or_else(|| Error::invalid_config("Could not determine home directory"))
}

/// Get the install directory for native artifacts
///
/// Uses the configured directory when set, otherwise `~/.hazetunnel/bin`.
pub fn get_install_dir(component: &ComponentConfig) -> Result<PathBuf> {
    match &component.install_dir {
        Some(dir) => Ok(dir.clone()),
        None => Ok(get_home_dir()?.join(".hazetunnel").join("bin")),
    }
}
