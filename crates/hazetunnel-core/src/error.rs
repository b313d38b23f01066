//! Error types shared by every hazetunnel crate

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using hazetunnel-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Exit code for failures that do not belong to a more specific class
pub const EXIT_FAILURE: i32 = 1;
/// Exit code when the host OS or architecture has no published artifact
pub const EXIT_UNSUPPORTED_PLATFORM: i32 = 2;
/// Exit code for release feed and download failures
pub const EXIT_NETWORK: i32 = 3;
/// Exit code when no release carries an artifact for this host
pub const EXIT_NO_MATCHING_ASSET: i32 = 4;
/// Exit code for session lifecycle violations
pub const EXIT_LIFECYCLE: i32 = 5;
/// Exit code after a user interrupt
pub const EXIT_CANCELLED: i32 = 130;

/// Error taxonomy for artifact management and the control bridge
#[derive(Error, Debug)]
pub enum Error {
    /// Host OS or architecture is not in the support matrix
    #[error("Unsupported platform: {os}/{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    /// Release feed could not be read
    #[error("Release feed unavailable{}: {body}", .status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default())]
    CatalogUnavailable { status: Option<u16>, body: String },

    /// No release carries an artifact for the required version and platform
    #[error("Could not find a matching {prefix} binary for {platform}")]
    NoMatchingAsset { prefix: String, platform: String },

    /// Transfer ended before the whole artifact was received
    #[error("Partial download of {file}: {reason}")]
    PartialDownload { file: String, reason: String },

    /// Download interrupted by the caller
    #[error("Download of {file} cancelled")]
    Cancelled { file: String },

    /// Writing an artifact to disk failed
    #[error("Failed to write {}: {source}", .path.display())]
    DiskWriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Launch requested for a session that is already running
    #[error("Session {id} is already running")]
    AlreadyRunning { id: String },

    /// Stop or accessor requested for a session that is not running
    #[error("Session {id} is not running")]
    NotRunning { id: String },

    /// Launch requested for a session that has already been stopped
    #[error("Session {id} has been stopped and cannot be relaunched")]
    SessionStopped { id: String },

    /// Unknown session id
    #[error("Session not found: {id}")]
    SessionNotFound { id: String },

    /// Requested port is held by another running session
    #[error("Port {port} is already used by session {holder}")]
    PortInUse { port: u16, holder: String },

    /// Version string could not be parsed
    #[error("Malformed version: {input:?}")]
    MalformedVersion { input: String },

    /// A native library has already been loaded into this process
    #[error("Native library already loaded in this process")]
    BridgeAlreadyLoaded,

    /// Native library could not be opened or lacks an entry point
    #[error("Failed to load native library {}: {message}", .path.display())]
    LibraryLoad { path: PathBuf, message: String },

    /// Invalid configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// JSON (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an unsupported platform error
    pub fn unsupported_platform(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self::UnsupportedPlatform {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// Create a catalog error from an HTTP status and response body
    pub fn catalog_unavailable(status: Option<u16>, body: impl Into<String>) -> Self {
        Self::CatalogUnavailable {
            status,
            body: body.into(),
        }
    }

    /// Create a no-matching-asset error
    pub fn no_matching_asset(prefix: impl Into<String>, platform: impl Into<String>) -> Self {
        Self::NoMatchingAsset {
            prefix: prefix.into(),
            platform: platform.into(),
        }
    }

    /// Create a partial download error
    pub fn partial_download(file: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::PartialDownload {
            file: file.into(),
            reason: reason.into(),
        }
    }

    /// Create a cancellation error
    pub fn cancelled(file: impl Into<String>) -> Self {
        Self::Cancelled { file: file.into() }
    }

    /// Create a disk write error
    pub fn disk_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DiskWriteFailure {
            path: path.into(),
            source,
        }
    }

    /// Create an already running error
    pub fn already_running(id: impl Into<String>) -> Self {
        Self::AlreadyRunning { id: id.into() }
    }

    /// Create a not running error
    pub fn not_running(id: impl Into<String>) -> Self {
        Self::NotRunning { id: id.into() }
    }

    /// Create a malformed version error
    pub fn malformed_version(input: impl Into<String>) -> Self {
        Self::MalformedVersion {
            input: input.into(),
        }
    }

    /// Create a library load error
    pub fn library_load(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::LibraryLoad {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Whether this error is a session state violation
    pub fn is_lifecycle(&self) -> bool {
        matches!(
            self,
            Self::AlreadyRunning { .. }
                | Self::NotRunning { .. }
                | Self::SessionStopped { .. }
                | Self::PortInUse { .. }
        )
    }

    /// Process exit code for this error class
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::UnsupportedPlatform { .. } => EXIT_UNSUPPORTED_PLATFORM,
            Self::CatalogUnavailable { .. } | Self::PartialDownload { .. } => EXIT_NETWORK,
            Self::NoMatchingAsset { .. } => EXIT_NO_MATCHING_ASSET,
            Self::Cancelled { .. } => EXIT_CANCELLED,
            e if e.is_lifecycle() => EXIT_LIFECYCLE,
            _ => EXIT_FAILURE,
        }
    }
}
