//! Type definitions shared across hazetunnel crates

mod platform;
mod runtime_config;

pub use platform::{OsFamily, PlatformTag};
pub use runtime_config::{ComponentConfig, NetworkConfig, ReleaseFeedConfig, RuntimeConfig};
