//! Artifact naming and descriptors
//!
//! Artifacts are named `<component>-v<version>-<os>-<arch><extension>`, for example
//! `hazetunnel-api-v1.2.0-linux-amd64.so`.

use hazetunnel_core::types::ComponentConfig;
use hazetunnel_core::{Error, Result, Version};
use regex::Regex;
use serde::Serialize;
use std::path::PathBuf;

use crate::releases::ReleaseAsset;

/// Naming rules for one component and required version
#[derive(Debug, Clone)]
pub struct ArtifactNaming {
    component: String,
    required_version: String,
    version_pattern: Regex,
}

impl ArtifactNaming {
    /// Create naming rules for `component`, accepting versions starting with `required_version`
    pub fn new(component: impl Into<String>, required_version: impl Into<String>) -> Result<Self> {
        let component = component.into();
        let pattern = format!(r"^{}-v([\d.]+)", regex::escape(&component));
        let version_pattern = Regex::new(&pattern)
            .map_err(|e| Error::invalid_config(format!("Invalid component name: {}", e)))?;

        Ok(Self {
            component,
            required_version: required_version.into(),
            version_pattern,
        })
    }

    /// Naming rules from the component section of the runtime config
    pub fn from_config(config: &ComponentConfig) -> Result<Self> {
        Self::new(config.name.clone(), config.bridge_version.clone())
    }

    /// Component name stem
    pub fn component(&self) -> &str {
        &self.component
    }

    /// Version prefix the installed artifact must carry
    pub fn required_version(&self) -> &str {
        &self.required_version
    }

    /// Prefix shared by every artifact of this component, any version
    pub fn generic_prefix(&self) -> String {
        format!("{}-", self.component)
    }

    /// Prefix an artifact must start with to satisfy the required version
    pub fn required_prefix(&self) -> String {
        format!("{}-v{}", self.component, self.required_version)
    }

    /// Extract the version embedded in an artifact file name
    pub fn version_of(&self, file_name: &str) -> Result<Version> {
        let captured = self
            .version_pattern
            .captures(file_name)
            .and_then(|c| c.get(1))
            .ok_or_else(|| Error::malformed_version(file_name))?;

        Version::parse(captured.as_str().trim_end_matches('.'))
    }
}

/// A downloadable artifact from the release feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Asset {
    /// Where to fetch it
    pub download_url: String,

    /// Remote file name, also used as the local file name
    pub file_name: String,

    /// Version parsed from the file name
    pub version: Version,
}

impl Asset {
    /// Build an asset descriptor from a release feed entry
    pub fn from_release_asset(asset: &ReleaseAsset, naming: &ArtifactNaming) -> Result<Self> {
        Ok(Self {
            download_url: asset.browser_download_url.clone(),
            file_name: asset.name.clone(),
            version: naming.version_of(&asset.name)?,
        })
    }
}

/// An artifact present in the install directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstalledArtifact {
    pub file_name: String,
    pub version: Version,
    pub path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naming() -> ArtifactNaming {
        ArtifactNaming::new("hazetunnel-api", "2.0.0").unwrap()
    }

    #[test]
    fn test_prefixes() {
        let naming = naming();
        assert_eq!(naming.generic_prefix(), "hazetunnel-api-");
        assert_eq!(naming.required_prefix(), "hazetunnel-api-v2.0.0");
    }

    #[test]
    fn test_version_from_file_name() {
        let naming = naming();
        assert_eq!(
            naming
                .version_of("hazetunnel-api-v1.2.0-linux-amd64.so")
                .unwrap(),
            Version::parse("1.2.0").unwrap()
        );
        assert_eq!(
            naming.version_of("hazetunnel-api-v10.0.3.dll").unwrap(),
            Version::parse("10.0.3").unwrap()
        );
    }

    #[test]
    fn test_version_missing_from_name() {
        let naming = naming();
        for name in ["hazetunnel-api-linux-amd64.so", "other-v1.0.0.so", "checksums.txt"] {
            assert!(matches!(
                naming.version_of(name),
                Err(Error::MalformedVersion { .. })
            ));
        }
    }

    #[test]
    fn test_component_name_is_escaped() {
        let naming = ArtifactNaming::new("lib.x", "1").unwrap();
        assert!(naming.version_of("libax-v1.0.0.so").is_err());
        assert!(naming.version_of("lib.x-v1.0.0.so").is_ok());
    }

    #[test]
    fn test_asset_from_release_asset() {
        let remote = ReleaseAsset {
            name: "hazetunnel-api-v2.0.0-darwin-arm64.dylib".to_string(),
            browser_download_url: "https://example.com/a".to_string(),
            size: None,
        };
        let asset = Asset::from_release_asset(&remote, &naming()).unwrap();
        assert_eq!(asset.file_name, remote.name);
        assert_eq!(asset.download_url, "https://example.com/a");
        assert_eq!(asset.version.to_string(), "2.0.0");
    }
}
