//! Release feed client

use hazetunnel_core::types::{NetworkConfig, ReleaseFeedConfig};
use hazetunnel_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Release information
///
/// Only `assets` is required; the remaining fields are kept for display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Release {
    /// Release tag (e.g., "v2.0.0")
    #[serde(default)]
    pub tag_name: Option<String>,

    /// Release name
    #[serde(default)]
    pub name: Option<String>,

    /// Whether this is a prerelease
    #[serde(default)]
    pub prerelease: bool,

    /// Whether this is a draft
    #[serde(default)]
    pub draft: bool,

    /// Release assets
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,

    /// Published date
    #[serde(default)]
    pub published_at: Option<String>,
}

/// Release asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseAsset {
    /// Asset name
    pub name: String,

    /// Download URL
    pub browser_download_url: String,

    /// Asset size in bytes
    #[serde(default)]
    pub size: Option<u64>,
}

/// Reads the list of published releases
///
/// Releases are returned in feed order (newest first for GitHub). No retry is
/// performed here.
pub struct ReleaseCatalogClient {
    client: reqwest::Client,
    releases_url: String,
}

impl ReleaseCatalogClient {
    /// Create a client for the configured feed
    pub fn new(feed: &ReleaseFeedConfig, network: &NetworkConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&network.user_agent)
            .timeout(Duration::from_secs(network.http_timeout_secs))
            .build()
            .map_err(|e| Error::invalid_config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            releases_url: feed.releases_url(),
        })
    }

    /// Endpoint this client reads from
    pub fn releases_url(&self) -> &str {
        &self.releases_url
    }

    /// List all releases
    pub async fn list_releases(&self) -> Result<Vec<Release>> {
        debug!("Fetching releases from: {}", self.releases_url);

        let response = self
            .client
            .get(&self.releases_url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .map_err(|e| Error::catalog_unavailable(None, e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::catalog_unavailable(Some(status.as_u16()), e.to_string()))?;

        if !status.is_success() {
            return Err(Error::catalog_unavailable(Some(status.as_u16()), body));
        }

        let releases: Vec<Release> = serde_json::from_str(&body).map_err(|e| {
            Error::catalog_unavailable(
                Some(status.as_u16()),
                format!("Unexpected release listing ({}): {}", e, body),
            )
        })?;

        debug!("Release feed returned {} releases", releases.len());
        Ok(releases)
    }
}
