//! # hazetunnel-bridge
//!
//! Control surface over the `hazetunnel-api` native component:
//! - Scoped call buffers for the Go string boundary
//! - One-per-process library loading with entry point resolution
//! - [`ControlBridge`] for start, shutdown, verbosity and key pair calls
//! - [`SessionRegistry`] driving the `Idle → Running → Stopped` lifecycle
//!
//! # Example
//!
//! ```no_run
//! use hazetunnel_bridge::{ControlBridge, SessionConfig, SessionRegistry};
//! use hazetunnel_update::InstalledArtifact;
//! use std::sync::Arc;
//!
//! # fn run(artifact: InstalledArtifact) -> hazetunnel_core::Result<()> {
//! let bridge = Arc::new(ControlBridge::load(&artifact)?);
//! let registry = SessionRegistry::new(bridge);
//!
//! let proxy = registry.scoped(SessionConfig::new().payload("alert('hi');"))?;
//! println!("proxy at {}, trust {:?}", proxy.url(), proxy.info().cert);
//! # Ok(())
//! # }
//! ```
//!
//! The shared library stays loaded until the process exits. Replacing the artifact on
//! disk takes effect only after a restart.

pub mod bridge;
pub mod ffi;
pub mod library;
pub mod port;
pub mod registry;
pub mod session;

pub use bridge::{ControlBridge, KeyPair};
pub use ffi::{CallBuffer, GoString};
pub use library::{EntryPoints, NativeLibrary};
pub use port::probe_free_port;
pub use registry::{SessionGuard, SessionRegistry};
pub use session::{SessionConfig, SessionInfo, SessionState};
