//! Fetch command

use anyhow::Result;
use hazetunnel_update::UpdateResult;

use crate::cli::FetchArgs;
use crate::commands::{cancel_on_ctrl_c, load_config, updater};
use crate::output;
use camino::Utf8Path;

pub async fn run(args: FetchArgs, install_dir: Option<&Utf8Path>, quiet: bool) -> Result<()> {
    let config = load_config(install_dir)?;
    let updater = updater(&config, quiet)?;

    if args.check {
        return check(&updater).await;
    }

    let cancel = cancel_on_ctrl_c();
    match updater.update(&cancel).await? {
        UpdateResult::Installed(artifact) => {
            output::success(&format!(
                "Successfully downloaded {} v{}!",
                config.component.name, artifact.version
            ));
        }
        UpdateResult::AlreadyUpToDate(artifact) => {
            output::success(&format!("{} library up to date!", config.component.name));
            output::kv("Current version", &format!("v{}", artifact.version));
        }
        UpdateResult::Updated {
            from,
            to,
            stale_removed,
        } => {
            output::success(&format!(
                "Updated {} from v{} to v{}",
                config.component.name, from.version, to.version
            ));
            if !stale_removed {
                output::warning(&format!("Could not remove outdated library file {}", from.path.display()));
            }
        }
    }

    Ok(())
}

async fn check(updater: &hazetunnel_update::ComponentUpdater) -> Result<()> {
    let spinner = output::spinner("Checking for updates...");
    let status = updater.status().await;
    spinner.finish_and_clear();
    let status = status?;

    match (&status.installed, &status.latest) {
        (None, _) => output::warning("Library is not downloaded"),
        (Some(installed), Some(latest)) if status.update_available() => {
            output::info(&format!("Update available: v{} => v{}", installed.version, latest))
        }
        (Some(installed), _) => output::success(&format!("Up to date (v{})", installed.version)),
    }
    Ok(())
}
