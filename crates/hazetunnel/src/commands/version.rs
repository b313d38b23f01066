//! Version command

use anyhow::Result;
use camino::Utf8Path;

use crate::cli::VersionArgs;
use crate::commands::{load_config, updater};
use crate::output;
use crate::version::VersionInfo;

pub async fn run(args: VersionArgs, install_dir: Option<&Utf8Path>) -> Result<()> {
    let config = load_config(install_dir)?;
    let status = updater(&config, true)?.status().await?;
    let info = VersionInfo::current(&config.component.bridge_version, &status);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("{}", info.display());
    output::kv("Bridge version", &format!("v{}", info.bridge_version));

    let Some(component) = &info.component else {
        output::kv(&config.component.name, "Not downloaded!");
        return Ok(());
    };

    let note = match (info.up_to_date(), &info.latest) {
        (Some(false), Some(latest)) => format!("(Latest: v{})", latest),
        _ => "(Up to date!)".to_string(),
    };
    output::kv(&config.component.name, &format!("v{} {}", component, note));
    Ok(())
}
