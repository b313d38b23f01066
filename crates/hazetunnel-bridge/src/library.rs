//! Native library loading
//!
//! The shared library is opened once per process and never closed: the Go runtime it
//! carries cannot be torn down, and running servers keep executing inside it.

use hazetunnel_core::{Error, Result};
use libloading::Library;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

use crate::ffi::{CallBuffer, RawEntryPoint};

/// Set once a library has been opened in this process
static LOADED: AtomicBool = AtomicBool::new(false);

/// Entry points exported by the native component
///
/// Each call is synchronous and borrows its argument for the duration of the call only.
#[cfg_attr(test, mockall::automock)]
pub trait EntryPoints: Send + Sync {
    /// `StartServer`: JSON session record
    fn start_server(&self, record: &CallBuffer);

    /// `ShutdownServer`: raw session id
    fn shutdown_server(&self, id: &CallBuffer);

    /// `SetVerbose`: JSON `{"verbose": bool}`
    fn set_verbose(&self, setting: &CallBuffer);

    /// `SetKeyPair`: JSON `{"cert": path, "key": path}`
    fn set_key_pair(&self, setting: &CallBuffer);

    /// `DestroySession`: raw session id
    ///
    /// Returns `false` without calling anything when the library does not export it.
    fn destroy_session(&self, id: &CallBuffer) -> bool;
}

/// A loaded `hazetunnel-api` shared library
pub struct NativeLibrary {
    path: PathBuf,
    start_server: RawEntryPoint,
    shutdown_server: RawEntryPoint,
    set_verbose: RawEntryPoint,
    set_key_pair: RawEntryPoint,
    destroy_session: Option<RawEntryPoint>,
}

impl NativeLibrary {
    /// Open the library at `path` and resolve its entry points
    ///
    /// Fails with [`Error::BridgeAlreadyLoaded`] if a library was already loaded in
    /// this process. A failed load does not count.
    pub fn load(path: &Path) -> Result<Self> {
        if LOADED
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(Error::BridgeAlreadyLoaded);
        }

        Self::open(path).inspect_err(|_| LOADED.store(false, Ordering::SeqCst))
    }

    /// Whether a library has been loaded in this process
    pub fn is_loaded() -> bool {
        LOADED.load(Ordering::SeqCst)
    }

    /// Path the library was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(path: &Path) -> Result<Self> {
        debug!("Loading native library from {:?}", path);

        // SAFETY: the library runs its initializers on load; the artifact comes from
        // the install directory managed by this crate.
        let library = unsafe { Library::new(path) }
            .map_err(|e| Error::library_load(path, e.to_string()))?;
        let library: &'static Library = Box::leak(Box::new(library));

        let loaded = Self {
            path: path.to_path_buf(),
            start_server: resolve(library, path, "StartServer")?,
            shutdown_server: resolve(library, path, "ShutdownServer")?,
            set_verbose: resolve(library, path, "SetVerbose")?,
            set_key_pair: resolve(library, path, "SetKeyPair")?,
            destroy_session: resolve(library, path, "DestroySession").ok(),
        };

        info!(
            "Loaded {:?} (DestroySession {})",
            path,
            if loaded.destroy_session.is_some() { "exported" } else { "not exported" }
        );
        Ok(loaded)
    }
}

fn resolve(library: &'static Library, path: &Path, name: &str) -> Result<RawEntryPoint> {
    let symbol = format!("{}\0", name);
    // SAFETY: every export of the component has the `func(string)` signature.
    unsafe { library.get::<RawEntryPoint>(symbol.as_bytes()) }
        .map(|entry| *entry)
        .map_err(|e| Error::library_load(path, format!("missing entry point {}: {}", name, e)))
}

impl EntryPoints for NativeLibrary {
    fn start_server(&self, record: &CallBuffer) {
        // SAFETY: the pointer stays valid until the closure returns.
        record.with_raw(|raw| unsafe { (self.start_server)(raw) })
    }

    fn shutdown_server(&self, id: &CallBuffer) {
        // SAFETY: as above.
        id.with_raw(|raw| unsafe { (self.shutdown_server)(raw) })
    }

    fn set_verbose(&self, setting: &CallBuffer) {
        // SAFETY: as above.
        setting.with_raw(|raw| unsafe { (self.set_verbose)(raw) })
    }

    fn set_key_pair(&self, setting: &CallBuffer) {
        // SAFETY: as above.
        setting.with_raw(|raw| unsafe { (self.set_key_pair)(raw) })
    }

    fn destroy_session(&self, id: &CallBuffer) -> bool {
        match self.destroy_session {
            Some(entry) => {
                // SAFETY: as above.
                id.with_raw(|raw| unsafe { entry(raw) });
                true
            }
            None => false,
        }
    }
}
