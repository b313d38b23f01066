//! Install, reconcile and update the native component
//!
//! [`ComponentUpdater`] ties the release feed, the platform selector, the local store
//! and the installer together. All network calls are single attempts.

use hazetunnel_core::{get_install_dir, Error, PlatformTag, Result, RuntimeConfig, Version};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::artifact::{ArtifactNaming, Asset, InstalledArtifact};
use crate::download::{ArtifactInstaller, InstallResult};
use crate::releases::ReleaseCatalogClient;
use crate::selector::ArtifactSelector;
use crate::store::{LocalStore, RemovalReport};

/// Outcome of [`ComponentUpdater::update`]
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum UpdateResult {
    /// Nothing was installed, so the latest artifact was fetched
    Installed(InstalledArtifact),

    /// The installed artifact is at least as new as the latest one
    AlreadyUpToDate(InstalledArtifact),

    /// A newer artifact replaced the installed one
    Updated {
        from: InstalledArtifact,
        to: InstalledArtifact,
        /// Whether the previous artifact was deleted
        stale_removed: bool,
    },
}

impl UpdateResult {
    /// The artifact in place after the update
    pub fn current(&self) -> &InstalledArtifact {
        match self {
            Self::Installed(artifact) | Self::AlreadyUpToDate(artifact) => artifact,
            Self::Updated { to, .. } => to,
        }
    }
}

/// Installed and latest versions
#[derive(Debug, Clone, Serialize)]
pub struct ComponentStatus {
    /// Installed artifact, if any
    pub installed: Option<InstalledArtifact>,

    /// Latest version on the feed; only looked up when something is installed
    pub latest: Option<Version>,
}

impl ComponentStatus {
    /// Whether a newer artifact is available
    pub fn update_available(&self) -> bool {
        match (&self.installed, &self.latest) {
            (Some(installed), Some(latest)) => latest > &installed.version,
            _ => false,
        }
    }
}

/// Manages the native component in one install directory
pub struct ComponentUpdater {
    catalog: ReleaseCatalogClient,
    store: LocalStore,
    installer: ArtifactInstaller,
    selector: ArtifactSelector,
}

impl ComponentUpdater {
    pub fn new(catalog: ReleaseCatalogClient, store: LocalStore, installer: ArtifactInstaller) -> Self {
        let selector = ArtifactSelector::new(store.naming(), store.platform());
        Self {
            catalog,
            store,
            installer,
            selector,
        }
    }

    /// Build an updater from the runtime config for the given platform
    pub fn from_config(config: &RuntimeConfig, platform: PlatformTag) -> Result<Self> {
        let dir = get_install_dir(&config.component)?;
        let naming = ArtifactNaming::from_config(&config.component)?;

        debug!(
            "Updater initialized: dir={:?}, platform={}, required={}",
            dir,
            platform,
            naming.required_prefix()
        );

        let catalog = ReleaseCatalogClient::new(&config.release_feed, &config.network)?;
        let installer = ArtifactInstaller::new(dir.clone(), &config.network)?;
        let store = LocalStore::new(dir, naming, platform);

        Ok(Self::new(catalog, store, installer))
    }

    /// Replace the installer, e.g. to enable progress output
    pub fn with_installer(mut self, installer: ArtifactInstaller) -> Self {
        self.installer = installer;
        self
    }

    /// Local store
    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    /// Asset selector for this platform and required version
    pub fn selector(&self) -> &ArtifactSelector {
        &self.selector
    }

    /// Latest compatible asset on the feed
    pub async fn latest_asset(&self) -> Result<Asset> {
        let releases = self.catalog.list_releases().await?;

        let remote = self.selector.select(&releases).ok_or_else(|| {
            Error::no_matching_asset(self.selector.prefix(), self.selector.platform())
        })?;

        debug!("Selected {} from the release feed", remote.name);
        Asset::from_release_asset(remote, self.store.naming())
    }

    /// Download the latest compatible asset
    pub async fn install_latest(&self, cancel: &CancellationToken) -> Result<InstallResult> {
        let asset = self.latest_asset().await?;
        self.installer.install(&asset, cancel).await
    }

    /// Make sure an artifact for the required version is installed
    ///
    /// Stale artifacts are pruned first. When nothing remains, the latest compatible
    /// asset is downloaded and the directory is checked again.
    pub async fn ensure_installed(&self, cancel: &CancellationToken) -> Result<InstalledArtifact> {
        if let Some(artifact) = self.store.reconcile()? {
            return Ok(artifact);
        }

        info!("No compatible {} found, installing", self.store.naming().component());
        let installed = self.install_latest(cancel).await?;

        match self.store.reconcile()? {
            Some(artifact) => Ok(artifact),
            // The feed served a file the required prefix does not cover.
            None => Err(Error::no_matching_asset(
                self.store.naming().required_prefix(),
                installed.artifact.file_name,
            )),
        }
    }

    /// Move the installed artifact to the latest compatible version
    ///
    /// On success the install directory holds exactly one artifact for this platform.
    /// Superseded artifacts are deleted best-effort, including when already up to date.
    pub async fn update(&self, cancel: &CancellationToken) -> Result<UpdateResult> {
        let Some(current) = self.store.installed()? else {
            let installed = self.install_latest(cancel).await?;
            return Ok(UpdateResult::Installed(installed.artifact));
        };

        let latest = self.latest_asset().await?;
        if current.version >= latest.version {
            info!("{} is up to date ({})", current.file_name, current.version);
            self.store.prune_except(&current.file_name)?;
            return Ok(UpdateResult::AlreadyUpToDate(current));
        }

        info!("Updating {} from {} to {}", self.store.naming().component(), current.version, latest.version);
        let installed = self.installer.install(&latest, cancel).await?;

        let stale_removed = match self.store.prune_except(&installed.artifact.file_name) {
            Ok(removed) => removed,
            Err(e) => {
                warn!("Failed to prune artifacts in {:?}: {}", self.store.dir(), e);
                false
            }
        };

        Ok(UpdateResult::Updated {
            from: current,
            to: installed.artifact,
            stale_removed,
        })
    }

    /// Installed version and, if installed, the latest available one
    pub async fn status(&self) -> Result<ComponentStatus> {
        let installed = self.store.installed()?;
        let latest = match installed {
            Some(_) => Some(self.latest_asset().await?.version),
            None => None,
        };
        Ok(ComponentStatus { installed, latest })
    }

    /// Delete every artifact and the default key material
    pub fn remove(&self) -> Result<RemovalReport> {
        self.store.remove_all()
    }
}
