//! Common test helpers for hazetunnel-bridge integration tests
//!
//! Provides a recording stand-in for the native entry points so lifecycle tests can
//! verify exactly which foreign calls were made.

#![allow(dead_code)]

use hazetunnel_bridge::{CallBuffer, ControlBridge, EntryPoints, KeyPair, SessionRegistry};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Records of entry point invocations: (symbol, argument)
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    pub calls: Arc<Mutex<Vec<(String, String)>>>,
    pub destroy_exported: bool,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log that also reports `DestroySession` as exported
    pub fn with_destroy() -> Self {
        Self {
            destroy_exported: true,
            ..Self::default()
        }
    }

    fn record(&self, symbol: &str, arg: &CallBuffer) {
        let text = arg.as_str().unwrap_or("<binary>").to_string();
        self.calls.lock().unwrap().push((symbol.to_string(), text));
    }

    /// Number of calls to `symbol`
    pub fn call_count(&self, symbol: &str) -> usize {
        let calls = self.calls.lock().unwrap();
        calls.iter().filter(|(s, _)| s == symbol).count()
    }

    /// Arguments of every call to `symbol`
    pub fn calls_for(&self, symbol: &str) -> Vec<String> {
        let calls = self.calls.lock().unwrap();
        calls
            .iter()
            .filter(|(s, _)| s == symbol)
            .map(|(_, arg)| arg.clone())
            .collect()
    }

    /// Parsed JSON records passed to `StartServer`
    pub fn start_records(&self) -> Vec<serde_json::Value> {
        self.calls_for("StartServer")
            .iter()
            .map(|arg| serde_json::from_str(arg).unwrap())
            .collect()
    }
}

impl EntryPoints for CallLog {
    fn start_server(&self, record: &CallBuffer) {
        self.record("StartServer", record);
    }

    fn shutdown_server(&self, id: &CallBuffer) {
        self.record("ShutdownServer", id);
    }

    fn set_verbose(&self, setting: &CallBuffer) {
        self.record("SetVerbose", setting);
    }

    fn set_key_pair(&self, setting: &CallBuffer) {
        self.record("SetKeyPair", setting);
    }

    fn destroy_session(&self, id: &CallBuffer) -> bool {
        if self.destroy_exported {
            self.record("DestroySession", id);
        }
        self.destroy_exported
    }
}

/// Entry points whose `StartServer` blocks for `delay` before recording the call
#[derive(Debug, Clone)]
pub struct SlowStart {
    pub log: CallLog,
    pub delay: Duration,
}

impl SlowStart {
    pub fn new(log: &CallLog, delay: Duration) -> Self {
        Self {
            log: log.clone(),
            delay,
        }
    }
}

impl EntryPoints for SlowStart {
    fn start_server(&self, record: &CallBuffer) {
        thread::sleep(self.delay);
        self.log.start_server(record);
    }

    fn shutdown_server(&self, id: &CallBuffer) {
        self.log.shutdown_server(id);
    }

    fn set_verbose(&self, setting: &CallBuffer) {
        self.log.set_verbose(setting);
    }

    fn set_key_pair(&self, setting: &CallBuffer) {
        self.log.set_key_pair(setting);
    }

    fn destroy_session(&self, id: &CallBuffer) -> bool {
        self.log.destroy_session(id)
    }
}

/// Default key pair used by the fixtures
pub fn default_key_pair() -> KeyPair {
    KeyPair::new("/opt/hazetunnel/bin/cert.pem", "/opt/hazetunnel/bin/key.pem")
}

/// Multi-instance registry whose `StartServer` takes `delay`
pub fn slow_registry(log: &CallLog, delay: Duration) -> SessionRegistry {
    let bridge = ControlBridge::new(Arc::new(SlowStart::new(log, delay)), default_key_pair()).unwrap();
    SessionRegistry::new(Arc::new(bridge))
}

/// Multi-instance registry backed by `log`
pub fn registry_with(log: &CallLog) -> SessionRegistry {
    let bridge = ControlBridge::new(Arc::new(log.clone()), default_key_pair()).unwrap();
    SessionRegistry::new(Arc::new(bridge))
}
