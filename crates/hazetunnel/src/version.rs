//! Version information for the hazetunnel CLI

use hazetunnel_core::Version;
use hazetunnel_update::ComponentStatus;
use serde::{Deserialize, Serialize};

/// Version information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionInfo {
    /// CLI version
    pub version: String,

    /// Native component version prefix this build requires
    pub bridge_version: String,

    /// Installed native component version
    pub component: Option<String>,

    /// Latest compatible native component version
    pub latest: Option<String>,
}

impl VersionInfo {
    /// Version info for the current build and component status
    pub fn current(bridge_version: &str, status: &ComponentStatus) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            bridge_version: bridge_version.to_string(),
            component: status.installed.as_ref().map(|a| a.version.to_string()),
            latest: status.latest.as_ref().map(Version::to_string),
        }
    }

    /// Whether the installed component matches the latest one
    pub fn up_to_date(&self) -> Option<bool> {
        match (&self.component, &self.latest) {
            (Some(installed), Some(latest)) => Some(installed == latest),
            _ => None,
        }
    }

    /// Format as display string
    pub fn display(&self) -> String {
        format!("hazetunnel {}", self.version)
    }
}

impl std::fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}
