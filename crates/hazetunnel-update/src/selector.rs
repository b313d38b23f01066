//! Platform asset selection

use hazetunnel_core::PlatformTag;

use crate::artifact::ArtifactNaming;
use crate::releases::{Release, ReleaseAsset};

/// Picks the artifact for one required version and platform
///
/// Releases are scanned in the order given and assets in list order; the first asset
/// whose name starts with the required prefix, contains the `<os>-<arch>` string and
/// ends with the library extension wins. No version comparison happens here, so the
/// result is only the latest compatible asset when the feed lists newest first.
#[derive(Debug, Clone)]
pub struct ArtifactSelector {
    prefix: String,
    os_arch: String,
    extension: &'static str,
}

impl ArtifactSelector {
    pub fn new(naming: &ArtifactNaming, platform: &PlatformTag) -> Self {
        Self {
            prefix: naming.required_prefix(),
            os_arch: platform.os_arch(),
            extension: platform.file_extension(),
        }
    }

    /// Required file name prefix
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Platform string used in error messages
    pub fn platform(&self) -> String {
        format!("{}{}", self.os_arch, self.extension)
    }

    /// Whether an asset name fits this selector
    pub fn matches(&self, name: &str) -> bool {
        name.starts_with(&self.prefix) && name.contains(&self.os_arch) && name.ends_with(self.extension)
    }

    /// First matching asset across all releases
    pub fn select<'a>(&self, releases: &'a [Release]) -> Option<&'a ReleaseAsset> {
        releases
            .iter()
            .find_map(|release| release.assets.iter().find(|a| self.matches(&a.name)))
    }
}
