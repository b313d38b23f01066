//! Runtime configuration types
//!
//! These types control where the native component is fetched from, how the
//! HTTP client behaves, and where artifacts are installed.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete runtime configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RuntimeConfig {
    /// Remote release feed settings
    #[serde(default)]
    pub release_feed: ReleaseFeedConfig,

    /// Network and HTTP configuration
    #[serde(default)]
    pub network: NetworkConfig,

    /// Native component naming and install location
    #[serde(default)]
    pub component: ComponentConfig,
}

/// Release feed location
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ReleaseFeedConfig {
    /// Base URL for the releases API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Repository owner
    #[serde(default = "default_repo_owner")]
    pub repo_owner: String,

    /// Repository name
    #[serde(default = "default_repo_name")]
    pub repo_name: String,
}

impl Default for ReleaseFeedConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            repo_owner: default_repo_owner(),
            repo_name: default_repo_name(),
        }
    }
}

impl ReleaseFeedConfig {
    /// Full URL of the release listing endpoint
    pub fn releases_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/releases",
            self.api_url.trim_end_matches('/'),
            self.repo_owner,
            self.repo_name
        )
    }
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}
fn default_repo_owner() -> String {
    "daijro".to_string()
}
fn default_repo_name() -> String {
    "hazetunnel".to_string()
}

/// Network and HTTP configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NetworkConfig {
    /// Timeout for release feed requests in seconds
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,

    /// Timeout for artifact downloads in seconds
    #[serde(default = "default_download_timeout")]
    pub download_timeout_secs: u64,

    /// User agent string for HTTP requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            http_timeout_secs: default_http_timeout(),
            download_timeout_secs: default_download_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_http_timeout() -> u64 {
    30
}
fn default_download_timeout() -> u64 {
    300 // 5 minutes
}
fn default_user_agent() -> String {
    format!(
        "hazetunnel/{} ({}; {})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

/// Native component settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ComponentConfig {
    /// Artifact name stem, e.g. `hazetunnel-api`
    #[serde(default = "default_component_name")]
    pub name: String,

    /// Required version prefix; only artifacts whose version starts with it are used
    #[serde(default = "default_bridge_version")]
    pub bridge_version: String,

    /// Install directory (defaults to `~/.hazetunnel/bin`)
    #[serde(default)]
    pub install_dir: Option<PathBuf>,
}

impl Default for ComponentConfig {
    fn default() -> Self {
        Self {
            name: default_component_name(),
            bridge_version: default_bridge_version(),
            install_dir: None,
        }
    }
}

fn default_component_name() -> String {
    "hazetunnel-api".to_string()
}
fn default_bridge_version() -> String {
    "2.0.0".to_string()
}
