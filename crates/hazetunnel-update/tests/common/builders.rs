//! Builder patterns for test data construction

use hazetunnel_core::types::{NetworkConfig, ReleaseFeedConfig};
use hazetunnel_core::PlatformTag;
use hazetunnel_update::releases::{Release, ReleaseAsset};
use hazetunnel_update::{ArtifactInstaller, ArtifactNaming, ComponentUpdater, LocalStore, ReleaseCatalogClient};
use std::path::Path;
use wiremock::MockServer;

use super::constants::*;

/// Builder for constructing Release objects with test defaults
#[derive(Debug, Clone, Default)]
pub struct ReleaseBuilder {
    tag_name: Option<String>,
    assets: Vec<ReleaseAsset>,
    prerelease: bool,
}

impl ReleaseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the version (adds the 'v' prefix for the tag)
    pub fn version(mut self, version: &str) -> Self {
        self.tag_name = Some(format!("v{}", version));
        self
    }

    pub fn prerelease(mut self) -> Self {
        self.prerelease = true;
        self
    }

    /// Add an asset served by `server` under [`download_path`]
    pub fn served_asset(mut self, server: &MockServer, name: &str) -> Self {
        self.assets.push(ReleaseAsset {
            name: name.to_string(),
            browser_download_url: format!("{}{}", server.uri(), download_path(name)),
            size: None,
        });
        self
    }

    /// Add an asset with an arbitrary URL
    pub fn asset(mut self, name: &str, url: &str) -> Self {
        self.assets.push(ReleaseAsset {
            name: name.to_string(),
            browser_download_url: url.to_string(),
            size: None,
        });
        self
    }

    pub fn build(self) -> Release {
        Release {
            tag_name: self.tag_name,
            prerelease: self.prerelease,
            assets: self.assets,
            ..Default::default()
        }
    }
}

/// Platform used throughout the tests
pub fn test_platform() -> PlatformTag {
    PlatformTag::from_parts(TEST_OS, TEST_ARCH).unwrap()
}

/// Feed config pointing at the mock server
pub fn feed_config(server: &MockServer) -> ReleaseFeedConfig {
    ReleaseFeedConfig {
        api_url: server.uri(),
        repo_owner: "daijro".to_string(),
        repo_name: "hazetunnel".to_string(),
    }
}

/// Network config with short timeouts
pub fn network_config() -> NetworkConfig {
    NetworkConfig {
        http_timeout_secs: 5,
        download_timeout_secs: 10,
        ..Default::default()
    }
}

/// Store for `dir` requiring `required_version`
pub fn test_store(dir: &Path, required_version: &str) -> LocalStore {
    let naming = ArtifactNaming::new(COMPONENT, required_version).unwrap();
    LocalStore::new(dir, naming, test_platform())
}

/// Installer writing into `dir`
pub fn test_installer(dir: &Path) -> ArtifactInstaller {
    ArtifactInstaller::new(dir, &network_config()).unwrap()
}

/// Updater wired to the mock server and `dir`
pub fn test_updater(server: &MockServer, dir: &Path, required_version: &str) -> ComponentUpdater {
    let catalog = ReleaseCatalogClient::new(&feed_config(server), &network_config()).unwrap();
    ComponentUpdater::new(catalog, test_store(dir, required_version), test_installer(dir))
}

/// Create an empty file named `name` in `dir`
pub fn touch(dir: &Path, name: &str) {
    std::fs::write(dir.join(name), b"old").unwrap();
}
