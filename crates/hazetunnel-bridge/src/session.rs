//! Session configuration and state

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::bridge::KeyPair;

/// Per-instance proxy settings
///
/// Unset `port` is probed at launch; unset `cert`/`key` fall back to the bridge's
/// process-wide key pair at launch time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub id: String,
    pub port: Option<u16>,
    pub cert: Option<PathBuf>,
    pub key: Option<PathBuf>,
    pub payload: Option<String>,
    pub user_agent: Option<String>,
    pub upstream_proxy: Option<String>,
    pub bind_address: Option<String>,
    pub verbose: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            port: None,
            cert: None,
            key: None,
            payload: None,
            user_agent: None,
            upstream_proxy: None,
            bind_address: None,
            verbose: false,
        }
    }
}

impl SessionConfig {
    /// Config with a generated id and everything else unset
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn cert(mut self, cert: impl Into<PathBuf>) -> Self {
        self.cert = Some(cert.into());
        self
    }

    pub fn key(mut self, key: impl Into<PathBuf>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Script injected into proxied HTML responses
    pub fn payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn upstream_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.upstream_proxy = Some(proxy.into());
        self
    }

    pub fn bind_address(mut self, addr: impl Into<String>) -> Self {
        self.bind_address = Some(addr.into());
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Cert and key to launch with, using `fallback` for whichever is unset
    pub(crate) fn resolve_key_pair(&self, fallback: KeyPair) -> KeyPair {
        KeyPair {
            cert: self.cert.clone().unwrap_or(fallback.cert),
            key: self.key.clone().unwrap_or(fallback.key),
        }
    }
}

/// JSON record handed to `StartServer`
///
/// `port` is a string because the native side declares it as one.
#[derive(Debug, Serialize)]
pub(crate) struct StartRecord<'a> {
    pub id: &'a str,
    pub port: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addr: Option<&'a str>,
    pub cert: &'a Path,
    pub key: &'a Path,
    pub verbose: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_proxy: Option<&'a str>,
}

impl<'a> StartRecord<'a> {
    pub fn new(config: &'a SessionConfig, port: u16, key_pair: &'a KeyPair) -> Self {
        Self {
            id: &config.id,
            port: port.to_string(),
            addr: config.bind_address.as_deref(),
            cert: &key_pair.cert,
            key: &key_pair.key,
            verbose: config.verbose,
            payload: config.payload.as_deref(),
            user_agent: config.user_agent.as_deref(),
            upstream_proxy: config.upstream_proxy.as_deref(),
        }
    }
}

/// Lifecycle state of a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running { port: u16, key_pair: KeyPair },
    Stopped,
}

impl SessionState {
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running { .. })
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self, Self::Stopped)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running { .. } => "running",
            Self::Stopped => "stopped",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One proxy instance, owned by the registry
#[derive(Debug)]
pub(crate) struct Session {
    pub config: SessionConfig,
    pub state: SessionState,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            state: SessionState::Idle,
        }
    }
}

/// Externally visible handle of a running session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionInfo {
    pub id: String,
    pub port: u16,
    pub url: String,
    pub cert: PathBuf,
    pub key: PathBuf,
    pub verbose: bool,
}

impl SessionInfo {
    pub(crate) fn new(config: &SessionConfig, port: u16, key_pair: &KeyPair) -> Self {
        Self {
            id: config.id.clone(),
            port,
            url: format!("http://{}:{}", url_host(config.bind_address.as_deref()), port),
            cert: key_pair.cert.clone(),
            key: key_pair.key.clone(),
            verbose: config.verbose,
        }
    }
}

/// Host clients should connect to for a given bind address
fn url_host(bind_address: Option<&str>) -> &str {
    match bind_address {
        None | Some("") | Some("0.0.0.0") | Some("::") | Some("[::]") => "127.0.0.1",
        Some(addr) => addr,
    }
}
