//! CLI command implementations

pub mod fetch;
pub mod remove;
pub mod run;
pub mod version;

use anyhow::{Context, Result};
use camino::Utf8Path;
use hazetunnel_core::{HierarchicalConfigLoader, PlatformTag, RuntimeConfig};
use hazetunnel_update::{ArtifactInstaller, ComponentUpdater};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Runtime config with CLI overrides applied
pub fn load_config(install_dir: Option<&Utf8Path>) -> Result<RuntimeConfig> {
    let loader = HierarchicalConfigLoader::new().context("Failed to locate config directory")?;
    let mut config = loader
        .load_runtime_config()
        .context("Failed to load runtime configuration")?;

    if let Some(dir) = install_dir {
        config.component.install_dir = Some(dir.as_std_path().to_path_buf());
    }
    Ok(config)
}

/// Updater for the host platform, with a progress bar unless `quiet`
pub fn updater(config: &RuntimeConfig, quiet: bool) -> Result<ComponentUpdater> {
    let platform = PlatformTag::detect()?;
    debug!("Host platform: {}", platform);

    let updater = ComponentUpdater::from_config(config, platform)?;
    let installer = ArtifactInstaller::new(updater.store().dir(), &config.network)?.with_progress(!quiet);
    Ok(updater.with_installer(installer))
}

/// Token cancelled on the first Ctrl-C
pub fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => trigger.cancel(),
            Err(e) => warn!("Failed to listen for Ctrl-C: {}", e),
        }
    });
    token
}
