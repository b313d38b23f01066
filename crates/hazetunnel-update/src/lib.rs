//! Native component installer for hazetunnel
//!
//! Provides:
//! - Release feed listing
//! - Platform-aware artifact selection
//! - Local artifact scanning and stale version pruning
//! - Cancellable downloads with progress tracking and SHA256 reporting
//! - Install, update, status and removal of the native component

pub mod artifact;
pub mod download;
pub mod releases;
pub mod selector;
pub mod store;
pub mod updater;

pub use artifact::{ArtifactNaming, Asset, InstalledArtifact};
pub use download::{ArtifactInstaller, DownloadProgress, InstallResult, ProgressCallback};
pub use releases::{Release, ReleaseAsset, ReleaseCatalogClient};
pub use selector::ArtifactSelector;
pub use store::{remove_artifacts, LocalStore, RemovalReport, DEFAULT_CERT_FILE, DEFAULT_KEY_FILE};
pub use updater::{ComponentStatus, ComponentUpdater, UpdateResult};
