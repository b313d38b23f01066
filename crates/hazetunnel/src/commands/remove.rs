//! Remove command

use anyhow::Result;
use camino::Utf8Path;
use hazetunnel_core::{get_install_dir, RuntimeConfig};
use hazetunnel_update::{remove_artifacts, ArtifactNaming, RemovalReport};

use crate::commands::load_config;
use crate::output;

pub fn run(install_dir: Option<&Utf8Path>) -> Result<()> {
    let config = load_config(install_dir)?;
    let report = remove_installed(&config)?;

    for path in &report.key_material {
        output::success(&format!("Removed {}", path.display()));
    }
    for path in &report.artifacts {
        output::success(&format!("Removed {}", path.display()));
    }
    for (path, reason) in &report.failures {
        output::error(&format!("Could not remove {}: {}", path.display(), reason));
    }

    if report.artifacts.is_empty() {
        output::warning("Library is not downloaded.");
    } else {
        output::info("Library files have been removed.");
    }
    Ok(())
}

/// Clear the install directory without detecting the host platform
fn remove_installed(config: &RuntimeConfig) -> Result<RemovalReport> {
    let dir = get_install_dir(&config.component)?;
    let naming = ArtifactNaming::from_config(&config.component)?;
    Ok(remove_artifacts(&dir, &naming)?)
}
