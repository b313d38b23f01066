//! Hierarchical configuration loader with precedence
//!
//! Loads configuration from multiple sources with the following precedence (low to high):
//! 1. Embedded defaults (built into binary)
//! 2. User config (~/.hazetunnel/config.yaml)
//! 3. Environment variables (HAZETUNNEL_* prefix)
//! 4. CLI flags (handled by caller)

use crate::error::{Error, Result};
use crate::types::RuntimeConfig;
use camino::{Utf8Path, Utf8PathBuf};
use rust_embed::RustEmbed;
use serde::de::DeserializeOwned;
use std::env;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Embedded configuration files
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../../embedded/config/"]
#[prefix = ""]
struct EmbeddedConfigs;

/// Configuration hierarchy loader
pub struct HierarchicalConfigLoader {
    /// Base directory for configuration files
    config_dir: Utf8PathBuf,
}

impl HierarchicalConfigLoader {
    /// Create a loader rooted at `~/.hazetunnel`
    pub fn new() -> Result<Self> {
        let config_dir = Self::get_config_dir()?;
        Ok(Self { config_dir })
    }

    /// Create a loader with a custom config directory
    pub fn with_dir(config_dir: Utf8PathBuf) -> Self {
        Self { config_dir }
    }

    /// Directory searched for `config.yaml`
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    fn get_config_dir() -> Result<Utf8PathBuf> {
        let home = crate::utils::get_home_dir()?;
        Utf8PathBuf::from_path_buf(home.join(".hazetunnel"))
            .map_err(|p| Error::invalid_config(format!("Non UTF-8 home directory: {:?}", p)))
    }

    /// Load runtime configuration with hierarchical precedence
    pub fn load_runtime_config(&self) -> Result<RuntimeConfig> {
        let mut config = Self::load_embedded_config::<RuntimeConfig>("runtime-defaults.yaml")?;

        let user_config_path = self.config_dir.join("config.yaml");
        if user_config_path.exists() {
            debug!("Loading user config from {}", user_config_path);
            config = self.load_yaml_file::<RuntimeConfig>(&user_config_path)?;
        }

        self.apply_env_overrides(config)
    }

    fn load_embedded_config<T: DeserializeOwned>(filename: &str) -> Result<T> {
        let embedded_file = EmbeddedConfigs::get(filename).ok_or_else(|| {
            Error::invalid_config(format!("Embedded config not found: {}", filename))
        })?;

        let content = std::str::from_utf8(&embedded_file.data).map_err(|_| {
            Error::invalid_config(format!("Invalid UTF-8 in embedded config: {}", filename))
        })?;

        serde_yaml_ng::from_str(content).map_err(|e| {
            Error::invalid_config(format!(
                "Failed to parse embedded config {}: {}",
                filename, e
            ))
        })
    }

    fn load_yaml_file<T: DeserializeOwned>(&self, path: &Utf8Path) -> Result<T> {
        let content = fs::read_to_string(path)?;
        serde_yaml_ng::from_str(&content)
            .map_err(|e| Error::invalid_config(format!("Failed to parse {}: {}", path, e)))
    }

    /// Apply environment variable overrides to runtime config
    fn apply_env_overrides(&self, mut config: RuntimeConfig) -> Result<RuntimeConfig> {
        if let Ok(val) = env::var("HAZETUNNEL_API_URL") {
            config.release_feed.api_url = val;
        }

        if let Ok(val) = env::var("HAZETUNNEL_REPO_OWNER") {
            config.release_feed.repo_owner = val;
        }

        if let Ok(val) = env::var("HAZETUNNEL_REPO_NAME") {
            config.release_feed.repo_name = val;
        }

        if let Ok(val) = env::var("HAZETUNNEL_HTTP_TIMEOUT_SECS") {
            config.network.http_timeout_secs = val.parse().map_err(|_| {
                Error::invalid_config("HAZETUNNEL_HTTP_TIMEOUT_SECS must be a valid number")
            })?;
        }

        if let Ok(val) = env::var("HAZETUNNEL_DOWNLOAD_TIMEOUT_SECS") {
            config.network.download_timeout_secs = val.parse().map_err(|_| {
                Error::invalid_config("HAZETUNNEL_DOWNLOAD_TIMEOUT_SECS must be a valid number")
            })?;
        }

        if let Ok(val) = env::var("HAZETUNNEL_BRIDGE_VERSION") {
            crate::Version::parse(&val)?;
            config.component.bridge_version = val;
        }

        if let Ok(val) = env::var("HAZETUNNEL_INSTALL_DIR") {
            config.component.install_dir = Some(PathBuf::from(val));
        }

        Ok(config)
    }
}
