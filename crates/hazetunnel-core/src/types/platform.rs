//! Host platform identification
//!
//! Maps an operating system and CPU architecture onto the naming convention used by
//! the release feed, e.g. `linux-amd64` with the `.so` extension.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Architecture aliases and the name each maps to in artifact file names
const ARCH_TABLE: &[(&str, &str)] = &[
    ("amd64", "amd64"),
    ("x86_64", "amd64"),
    ("x86", "386"),
    ("i686", "386"),
    ("i386", "386"),
    ("arm64", "arm64"),
    ("aarch64", "arm64"),
    ("armv5l", "arm-5"),
    ("armv6l", "arm-6"),
    ("armv7l", "arm-7"),
    ("ppc64le", "ppc64le"),
    ("riscv64", "riscv64"),
    ("s390x", "s390x"),
];

/// Operating system family as it appears in artifact file names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsFamily {
    Darwin,
    Windows,
    Linux,
}

impl OsFamily {
    fn from_raw(os: &str) -> Option<Self> {
        match os.to_ascii_lowercase().as_str() {
            "darwin" | "macos" | "osx" => Some(Self::Darwin),
            "windows" | "win32" | "cygwin" => Some(Self::Windows),
            "linux" => Some(Self::Linux),
            _ => None,
        }
    }

    /// Name used in artifact file names
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Darwin => "darwin",
            Self::Windows => "windows",
            Self::Linux => "linux",
        }
    }

    /// Shared library extension, including the leading dot
    pub fn library_extension(&self) -> &'static str {
        match self {
            Self::Darwin => ".dylib",
            Self::Windows => ".dll",
            Self::Linux => ".so",
        }
    }
}

/// The `(os-arch, extension)` pair identifying which artifact a host needs
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlatformTag {
    os: OsFamily,
    arch: String,
}

impl PlatformTag {
    /// Build a tag from raw OS and architecture names
    ///
    /// Architecture aliases (`x86_64`/`amd64`, `aarch64`/`arm64`, ...) are normalized.
    /// Anything outside the support table fails with `UnsupportedPlatform`.
    pub fn from_parts(os: &str, arch: &str) -> Result<Self> {
        let family = OsFamily::from_raw(os).ok_or_else(|| Error::unsupported_platform(os, arch))?;

        let arch_lower = arch.to_ascii_lowercase();
        let normalized = ARCH_TABLE
            .iter()
            .find(|(alias, _)| *alias == arch_lower)
            .map(|(_, name)| *name)
            .ok_or_else(|| Error::unsupported_platform(os, arch))?;

        Ok(Self {
            os: family,
            arch: normalized.to_string(),
        })
    }

    /// Tag for the platform this binary was compiled for
    pub fn detect() -> Result<Self> {
        Self::from_parts(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Operating system family
    pub fn os(&self) -> OsFamily {
        self.os
    }

    /// Normalized architecture name
    pub fn arch(&self) -> &str {
        &self.arch
    }

    /// `<os>-<arch>` string used in artifact names
    pub fn os_arch(&self) -> String {
        format!("{}-{}", self.os.as_str(), self.arch)
    }

    /// Shared library extension, including the leading dot
    pub fn file_extension(&self) -> &'static str {
        self.os.library_extension()
    }
}

impl fmt::Display for PlatformTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.os_arch(), self.file_extension())
    }
}
