//! Artifact download with progress tracking and cancellation
//!
//! Downloads stream into a hidden temporary file inside the install directory and are
//! renamed into place only once complete. The temporary name never starts with the
//! component prefix, so [`LocalStore::scan`](crate::store::LocalStore::scan) cannot
//! mistake a partial transfer for an installed artifact. Cancelling or failing a
//! transfer deletes the temporary file before the error is returned.
//!
//! # Example
//!
//! ```no_run
//! use hazetunnel_core::types::NetworkConfig;
//! use hazetunnel_update::{ArtifactInstaller, Asset};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run(asset: Asset) -> hazetunnel_core::Result<()> {
//! let installer = ArtifactInstaller::new("/tmp/hazetunnel", &NetworkConfig::default())?;
//! let cancel = CancellationToken::new();
//! let result = installer.install(&asset, &cancel).await?;
//! println!("Installed {} ({} bytes)", result.artifact.file_name, result.file_size);
//! # Ok(())
//! # }
//! ```

use futures_util::StreamExt;
use hazetunnel_core::types::NetworkConfig;
use hazetunnel_core::{Error, Result};
use indicatif::{ProgressBar, ProgressStyle};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::artifact::{Asset, InstalledArtifact};

/// Prefix of in-flight download files
const PARTIAL_PREFIX: &str = ".download-";

/// Suffix of in-flight download files
const PARTIAL_SUFFIX: &str = ".part";

/// Download progress information
#[derive(Debug, Clone)]
pub struct DownloadProgress {
    /// Total bytes to download (0 when the server sent no length)
    pub total_bytes: u64,

    /// Bytes downloaded so far
    pub downloaded_bytes: u64,

    /// Progress percentage (0-100)
    pub percentage: f64,
}

impl DownloadProgress {
    /// Create a new progress tracker
    pub fn new(total_bytes: u64) -> Self {
        Self {
            total_bytes,
            downloaded_bytes: 0,
            percentage: 0.0,
        }
    }

    /// Update progress with new downloaded bytes
    pub fn update(&mut self, downloaded_bytes: u64) {
        self.downloaded_bytes = downloaded_bytes;
        self.percentage = if self.total_bytes > 0 {
            (self.downloaded_bytes as f64 / self.total_bytes as f64) * 100.0
        } else {
            0.0
        };
    }

    /// Check if download is complete
    pub fn is_complete(&self) -> bool {
        self.total_bytes > 0 && self.downloaded_bytes >= self.total_bytes
    }
}

/// Callback invoked after every received chunk
pub type ProgressCallback = Arc<dyn Fn(&DownloadProgress) + Send + Sync>;

/// Result of an install
#[derive(Debug)]
pub struct InstallResult {
    /// The artifact now on disk
    pub artifact: InstalledArtifact,

    /// Size of the downloaded file in bytes
    pub file_size: u64,

    /// SHA256 checksum of the downloaded file
    pub checksum: String,
}

/// Streams release assets into the install directory
pub struct ArtifactInstaller {
    client: reqwest::Client,
    dir: PathBuf,
    show_progress: bool,
    on_progress: Option<ProgressCallback>,
}

impl ArtifactInstaller {
    /// Create an installer writing into `dir`
    pub fn new(dir: impl Into<PathBuf>, network: &NetworkConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&network.user_agent)
            .timeout(Duration::from_secs(network.download_timeout_secs))
            .build()
            .map_err(|e| Error::invalid_config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            dir: dir.into(),
            show_progress: false,
            on_progress: None,
        })
    }

    /// Enable or disable the terminal progress bar
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Report byte counts to a callback
    pub fn with_progress_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&DownloadProgress) + Send + Sync + 'static,
    {
        self.on_progress = Some(Arc::new(callback));
        self
    }

    /// Install directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Download `asset` into the install directory
    ///
    /// If `cancel` fires before the transfer finishes, the partial file is deleted and
    /// [`Error::Cancelled`] is returned.
    pub async fn install(&self, asset: &Asset, cancel: &CancellationToken) -> Result<InstallResult> {
        fs::create_dir_all(&self.dir).map_err(|e| Error::disk_write(&self.dir, e))?;

        let target = self.dir.join(&asset.file_name);
        let mut partial = tempfile::Builder::new()
            .prefix(PARTIAL_PREFIX)
            .suffix(PARTIAL_SUFFIX)
            .tempfile_in(&self.dir)
            .map_err(|e| Error::disk_write(&self.dir, e))?;
        let partial_path = partial.path().to_path_buf();

        info!("Downloading {} from {}", asset.file_name, asset.download_url);

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(Error::cancelled(&asset.file_name)),
            result = self.transfer(asset, partial.as_file_mut(), &partial_path) => result,
        };

        let (file_size, checksum) = match outcome {
            Ok(done) => done,
            Err(e) => {
                discard(partial);
                return Err(e);
            }
        };

        partial
            .persist(&target)
            .map_err(|e| Error::disk_write(&target, e.error))?;

        debug!("SHA256 of {}: {}", asset.file_name, checksum);
        info!("Installed {} ({})", asset.file_name, human_readable_size(file_size));

        Ok(InstallResult {
            artifact: InstalledArtifact {
                file_name: asset.file_name.clone(),
                version: asset.version.clone(),
                path: target,
            },
            file_size,
            checksum,
        })
    }

    /// Stream the response body into `file`, returning the byte count and SHA256
    async fn transfer(&self, asset: &Asset, file: &mut File, path: &Path) -> Result<(u64, String)> {
        let response = self
            .client
            .get(&asset.download_url)
            .send()
            .await
            .map_err(|e| Error::partial_download(&asset.file_name, e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::partial_download(
                &asset.file_name,
                format!("download failed with status {}", response.status()),
            ));
        }

        let total_size = response.content_length();
        let mut progress = DownloadProgress::new(total_size.unwrap_or(0));

        let bar = if self.show_progress {
            let pb = ProgressBar::new(total_size.unwrap_or(0));
            if let Ok(style) = ProgressStyle::default_bar().template(
                "{msg}\n{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
            ) {
                pb.set_style(style.progress_chars("#>-"));
            }
            pb.set_message(format!("Downloading {}", asset.file_name));
            Some(pb)
        } else {
            None
        };

        let mut hasher = Sha256::new();
        let mut downloaded: u64 = 0;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk: bytes::Bytes = chunk.map_err(|e| {
                Error::partial_download(
                    &asset.file_name,
                    format!("transfer interrupted after {} bytes: {}", downloaded, e),
                )
            })?;

            file.write_all(&chunk)
                .map_err(|e| Error::disk_write(path, e))?;
            hasher.update(&chunk);
            downloaded += chunk.len() as u64;

            progress.update(downloaded);
            if let Some(pb) = &bar {
                pb.set_position(downloaded);
            }
            if let Some(callback) = &self.on_progress {
                callback(&progress);
            }
        }

        file.sync_all().map_err(|e| Error::disk_write(path, e))?;

        if let Some(expected) = total_size {
            if downloaded != expected {
                return Err(Error::partial_download(
                    &asset.file_name,
                    format!("expected {} bytes, received {}", expected, downloaded),
                ));
            }
        }

        if let Some(pb) = bar {
            pb.finish_with_message(format!("Downloaded {}", asset.file_name));
        }

        Ok((downloaded, format!("{:x}", hasher.finalize())))
    }
}

/// Delete an unfinished download
fn discard(partial: NamedTempFile) {
    let path = partial.path().to_path_buf();
    if let Err(e) = partial.close() {
        warn!("Failed to remove partial download {:?}: {}", path, e);
    } else {
        debug!("Removed partial download {:?}", path);
    }
}

/// Convert bytes to human-readable size
fn human_readable_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    format!("{:.2} {}", size, UNITS[unit_index])
}
