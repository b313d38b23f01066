//! Local artifact store
//!
//! The install directory holds at most one current artifact plus the default
//! `cert.pem`/`key.pem` pair. Artifacts from earlier versions are pruned when found.

use hazetunnel_core::{Error, PlatformTag, Result};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::artifact::{ArtifactNaming, InstalledArtifact};

/// Default certificate file name in the install directory
pub const DEFAULT_CERT_FILE: &str = "cert.pem";

/// Default key file name in the install directory
pub const DEFAULT_KEY_FILE: &str = "key.pem";

/// Files deleted by [`LocalStore::remove_all`]
#[derive(Debug, Default, Serialize)]
pub struct RemovalReport {
    /// Artifacts removed
    pub artifacts: Vec<PathBuf>,

    /// `.pem` files removed
    pub key_material: Vec<PathBuf>,

    /// Files that could not be removed, with the reason
    pub failures: Vec<(PathBuf, String)>,
}

impl RemovalReport {
    /// Whether nothing was found to remove
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty() && self.key_material.is_empty() && self.failures.is_empty()
    }
}

/// Delete every artifact, for any platform, and every `.pem` file in `dir`
///
/// Needs no platform, so it works on hosts no artifact is built for.
pub fn remove_artifacts(dir: &Path, naming: &ArtifactNaming) -> Result<RemovalReport> {
    let mut report = RemovalReport::default();

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(report),
        Err(e) => return Err(e.into()),
    };

    let prefix = naming.generic_prefix();
    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        let is_artifact = name.starts_with(&prefix);
        let is_pem = path.extension().is_some_and(|ext| ext == "pem");
        if !is_artifact && !is_pem {
            continue;
        }

        match fs::remove_file(&path) {
            Ok(()) if is_artifact => report.artifacts.push(path),
            Ok(()) => report.key_material.push(path),
            Err(e) => {
                warn!("Failed to remove {:?}: {}", path, e);
                report.failures.push((path, e.to_string()));
            }
        }
    }

    Ok(report)
}

/// View over the artifacts in one install directory
#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: PathBuf,
    naming: ArtifactNaming,
    platform: PlatformTag,
}

impl LocalStore {
    pub fn new(dir: impl Into<PathBuf>, naming: ArtifactNaming, platform: PlatformTag) -> Self {
        Self {
            dir: dir.into(),
            naming,
            platform,
        }
    }

    /// Install directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Naming rules
    pub fn naming(&self) -> &ArtifactNaming {
        &self.naming
    }

    /// Host platform
    pub fn platform(&self) -> &PlatformTag {
        &self.platform
    }

    /// Default TLS certificate path
    pub fn default_cert_path(&self) -> PathBuf {
        self.dir.join(DEFAULT_CERT_FILE)
    }

    /// Default TLS key path
    pub fn default_key_path(&self) -> PathBuf {
        self.dir.join(DEFAULT_KEY_FILE)
    }

    /// Create the install directory if missing
    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| Error::disk_write(&self.dir, e))
    }

    /// File names of every local artifact, any version or platform
    ///
    /// Sorted in descending lexical order. This is not a version sort: `v10.0.0`
    /// lists after `v9.0.0`.
    pub fn scan(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let prefix = self.naming.generic_prefix();
        let mut files: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.starts_with(&prefix))
            .collect();

        files.sort_unstable_by(|a, b| b.cmp(a));
        Ok(files)
    }

    /// The newest local artifact built for this platform, whatever its version
    ///
    /// Picked by parsed version rather than list order, so `v10.0.0` wins over `v9.0.0`.
    pub fn installed(&self) -> Result<Option<InstalledArtifact>> {
        let mut newest: Option<InstalledArtifact> = None;
        for name in self.scan()? {
            if !name.ends_with(self.platform.file_extension()) {
                continue;
            }
            match self.describe(&name) {
                Ok(artifact) => {
                    if newest.as_ref().map_or(true, |n| artifact.version > n.version) {
                        newest = Some(artifact);
                    }
                }
                Err(e) => warn!("Ignoring {}: {}", name, e),
            }
        }
        Ok(newest)
    }

    /// Find the artifact for the required version, deleting artifacts of other versions
    ///
    /// Files with a foreign extension are left alone. Stale deletions are best-effort;
    /// failures are logged and do not fail the call.
    pub fn reconcile(&self) -> Result<Option<InstalledArtifact>> {
        let required = self.naming.required_prefix();

        for name in self.scan()? {
            if !name.ends_with(self.platform.file_extension()) {
                continue;
            }
            if name.starts_with(&required) {
                debug!("Found installed artifact {}", name);
                return self.describe(&name).map(Some);
            }

            let path = self.dir.join(&name);
            info!("Removing artifact from a previous version: {}", name);
            if let Err(e) = fs::remove_file(&path) {
                warn!("Failed to remove stale artifact {:?}: {}", path, e);
            }
        }

        Ok(None)
    }

    /// Delete every artifact for this platform except `keep`
    ///
    /// Best-effort: returns `false` if any deletion failed, after logging it.
    pub fn prune_except(&self, keep: &str) -> Result<bool> {
        let mut all_removed = true;
        for name in self.scan()? {
            if name == keep || !name.ends_with(self.platform.file_extension()) {
                continue;
            }

            let path = self.dir.join(&name);
            info!("Removing superseded artifact: {}", name);
            if let Err(e) = fs::remove_file(&path) {
                warn!("Failed to remove superseded artifact {:?}: {}", path, e);
                all_removed = false;
            }
        }
        Ok(all_removed)
    }

    /// Delete every artifact and every `.pem` file in the install directory
    pub fn remove_all(&self) -> Result<RemovalReport> {
        remove_artifacts(&self.dir, &self.naming)
    }

    fn describe(&self, name: &str) -> Result<InstalledArtifact> {
        Ok(InstalledArtifact {
            file_name: name.to_string(),
            version: self.naming.version_of(name)?,
            path: self.dir.join(name),
        })
    }
}
