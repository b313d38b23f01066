//! Typed control surface over the native entry points

use hazetunnel_core::Result;
use hazetunnel_update::{InstalledArtifact, DEFAULT_CERT_FILE, DEFAULT_KEY_FILE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

use crate::ffi::CallBuffer;
use crate::library::{EntryPoints, NativeLibrary};
use crate::session::StartRecord;

/// TLS certificate and key paths
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPair {
    pub cert: PathBuf,
    pub key: PathBuf,
}

impl KeyPair {
    pub fn new(cert: impl Into<PathBuf>, key: impl Into<PathBuf>) -> Self {
        Self {
            cert: cert.into(),
            key: key.into(),
        }
    }

    /// `cert.pem` and `key.pem` inside `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(DEFAULT_CERT_FILE), dir.join(DEFAULT_KEY_FILE))
    }
}

#[derive(Serialize)]
struct VerboseSetting {
    verbose: bool,
}

/// Process-wide settings last sent to the native side
#[derive(Debug)]
struct Settings {
    verbose: bool,
    key_pair: KeyPair,
}

/// Marshals calls into the loaded native component
///
/// Holds the process-wide verbosity and key pair. Changing the key pair affects only
/// sessions launched afterwards.
pub struct ControlBridge {
    entry: Arc<dyn EntryPoints>,
    settings: Mutex<Settings>,
}

impl ControlBridge {
    /// Wrap loaded entry points and push `default_key_pair` once
    pub fn new(entry: Arc<dyn EntryPoints>, default_key_pair: KeyPair) -> Result<Self> {
        let bridge = Self {
            entry,
            settings: Mutex::new(Settings {
                verbose: false,
                key_pair: default_key_pair.clone(),
            }),
        };
        bridge.push_key_pair(&default_key_pair)?;
        Ok(bridge)
    }

    /// Load `artifact` and use the key pair next to it as the default
    pub fn load(artifact: &InstalledArtifact) -> Result<Self> {
        let library = NativeLibrary::load(&artifact.path)?;
        let dir = artifact.path.parent().unwrap_or_else(|| Path::new("."));
        Self::new(Arc::new(library), KeyPair::in_dir(dir))
    }

    /// Start a server for `record`
    pub(crate) fn start(&self, record: &StartRecord<'_>) -> Result<()> {
        let buffer = CallBuffer::from_json(record)?;
        debug!("StartServer {}", record.id);
        self.entry.start_server(&buffer);
        Ok(())
    }

    /// Stop the server for session `id`
    pub fn shutdown(&self, id: &str) {
        debug!("ShutdownServer {}", id);
        self.entry.shutdown_server(&CallBuffer::from_text(id));
    }

    /// Release native resources for session `id`; `false` if the library lacks the export
    pub fn destroy_session(&self, id: &str) -> bool {
        debug!("DestroySession {}", id);
        self.entry.destroy_session(&CallBuffer::from_text(id))
    }

    /// Current verbosity
    pub fn verbose(&self) -> bool {
        self.settings().verbose
    }

    /// Set native logging verbosity
    pub fn set_verbose(&self, verbose: bool) -> Result<()> {
        let buffer = CallBuffer::from_json(&VerboseSetting { verbose })?;
        let mut settings = self.settings();
        self.entry.set_verbose(&buffer);
        settings.verbose = verbose;
        Ok(())
    }

    /// Current process-wide key pair
    pub fn key_pair(&self) -> KeyPair {
        self.settings().key_pair.clone()
    }

    /// Replace the process-wide key pair
    pub fn set_key_pair(&self, key_pair: KeyPair) -> Result<()> {
        let mut settings = self.settings();
        self.push_key_pair(&key_pair)?;
        settings.key_pair = key_pair;
        Ok(())
    }

    fn push_key_pair(&self, key_pair: &KeyPair) -> Result<()> {
        let buffer = CallBuffer::from_json(key_pair)?;
        debug!("SetKeyPair cert={:?} key={:?}", key_pair.cert, key_pair.key);
        self.entry.set_key_pair(&buffer);
        Ok(())
    }

    fn settings(&self) -> MutexGuard<'_, Settings> {
        self.settings.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
