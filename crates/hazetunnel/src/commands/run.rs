//! Run command

use anyhow::{Context, Result};
use camino::Utf8Path;
use hazetunnel_bridge::{ControlBridge, KeyPair, SessionConfig, SessionRegistry};
use std::sync::Arc;
use tracing::info;

use crate::cli::RunArgs;
use crate::commands::{cancel_on_ctrl_c, load_config, updater};
use crate::output;

pub async fn run(args: RunArgs, install_dir: Option<&Utf8Path>, quiet: bool) -> Result<()> {
    let config = load_config(install_dir)?;
    let updater = updater(&config, quiet)?;

    let cancel = cancel_on_ctrl_c();
    let artifact = updater.ensure_installed(&cancel).await?;
    info!("Using {}", artifact.file_name);

    let session = session_config(&args);
    let registry = tokio::task::spawn_blocking(move || start(artifact, args, session))
        .await
        .context("Proxy start task panicked")??;

    cancel.cancelled().await;
    println!();

    tokio::task::spawn_blocking(move || registry.stop_all())
        .await
        .context("Proxy stop task panicked")?;
    output::info("Proxy stopped");
    Ok(())
}

fn session_config(args: &RunArgs) -> SessionConfig {
    let mut session = SessionConfig::new().port(args.port).verbose(args.verbose);
    session.payload = args.payload.clone();
    session.user_agent = args.user_agent.clone();
    session.upstream_proxy = args.upstream_proxy.clone();
    session.bind_address = args.addr.clone();
    session
}

/// Load the library, apply process-wide settings and launch one session
fn start(
    artifact: hazetunnel_update::InstalledArtifact,
    args: RunArgs,
    session: SessionConfig,
) -> Result<Arc<SessionRegistry>> {
    let bridge = ControlBridge::load(&artifact)?;

    if args.cert.is_some() || args.key.is_some() {
        let default = bridge.key_pair();
        bridge.set_key_pair(KeyPair {
            cert: args.cert.unwrap_or(default.cert),
            key: args.key.unwrap_or(default.key),
        })?;
    }
    if args.verbose {
        bridge.set_verbose(true)?;
    }

    let registry = Arc::new(SessionRegistry::single(Arc::new(bridge)));
    let id = registry.create(session)?;
    let handle = registry.launch(&id)?;

    output::success(&format!("Proxy running at {}", handle.url));
    output::kv("Certificate", &handle.cert.display().to_string());
    output::kv("Key", &handle.key.display().to_string());
    output::info("Press Ctrl-C to stop");
    Ok(registry)
}
