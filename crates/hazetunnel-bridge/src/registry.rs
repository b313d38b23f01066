//! Session registry and lifecycle guards
//!
//! Sessions move `Idle → Running → Stopped`; `Stopped` is terminal. Every transition
//! holds that session's own lock, so two concurrent launches (or stops) of one session
//! cannot both reach the native side. The session map lock is never held while waiting
//! on a session lock, so a slow `StartServer` only blocks callers of that session.
//!
//! Lock order is session, then map.

use hazetunnel_core::{Error, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

use crate::bridge::ControlBridge;
use crate::port::pick_unreserved;
use crate::session::{Session, SessionConfig, SessionInfo, SessionState, StartRecord};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Map entry for one session
///
/// `stopped` mirrors the terminal state so liveness checks need not wait on a session
/// that is mid-transition.
struct Slot {
    session: Mutex<Session>,
    stopped: AtomicBool,
}

impl Slot {
    fn new(config: SessionConfig) -> Self {
        Self {
            session: Mutex::new(Session::new(config)),
            stopped: AtomicBool::new(false),
        }
    }

    fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}

/// Tracks proxy instances sharing one control bridge
pub struct SessionRegistry {
    bridge: Arc<ControlBridge>,
    sessions: Mutex<HashMap<String, Arc<Slot>>>,
    /// Ports held by running sessions, with the holder's id
    ports: Mutex<HashMap<u16, String>>,
    capacity: Option<usize>,
}

impl SessionRegistry {
    /// Registry allowing any number of concurrent sessions
    pub fn new(bridge: Arc<ControlBridge>) -> Self {
        Self {
            bridge,
            sessions: Mutex::new(HashMap::new()),
            ports: Mutex::new(HashMap::new()),
            capacity: None,
        }
    }

    /// Registry allowing one live (idle or running) session at a time
    pub fn single(bridge: Arc<ControlBridge>) -> Self {
        Self {
            capacity: Some(1),
            ..Self::new(bridge)
        }
    }

    pub fn bridge(&self) -> &ControlBridge {
        &self.bridge
    }

    /// Register a new idle session and return its id
    ///
    /// Fails with `AlreadyRunning` if a live session already uses the id or the
    /// registry is at capacity. A stopped session with the same id is replaced.
    pub fn create(&self, config: SessionConfig) -> Result<String> {
        let mut sessions = lock(&self.sessions);

        let live: Vec<String> = sessions
            .iter()
            .filter(|(_, slot)| !slot.is_stopped())
            .map(|(id, _)| id.clone())
            .collect();

        if live.contains(&config.id) {
            return Err(Error::already_running(&config.id));
        }
        if let (Some(capacity), Some(holder)) = (self.capacity, live.first()) {
            if live.len() >= capacity {
                return Err(Error::already_running(holder));
            }
        }

        let id = config.id.clone();
        debug!("Created session {}", id);
        sessions.insert(id.clone(), Arc::new(Slot::new(config)));
        Ok(id)
    }

    /// Start an idle session
    ///
    /// Resolves an ephemeral port and the default key pair where unset, then calls
    /// `StartServer` exactly once.
    pub fn launch(&self, id: &str) -> Result<SessionInfo> {
        let slot = self.get(id)?;
        let mut session = lock(&slot.session);

        match session.state {
            SessionState::Idle => {}
            SessionState::Running { .. } => return Err(Error::already_running(id)),
            SessionState::Stopped => return Err(Error::SessionStopped { id: id.to_string() }),
        }

        let port = self.reserve_port(id, session.config.port)?;
        let key_pair = session.config.resolve_key_pair(self.bridge.key_pair());

        let started = self
            .bridge
            .start(&StartRecord::new(&session.config, port, &key_pair));
        if let Err(e) = started {
            self.release_port(port);
            return Err(e);
        }

        let info = SessionInfo::new(&session.config, port, &key_pair);
        info!("Session {} running at {}", id, info.url);
        session.state = SessionState::Running { port, key_pair };
        Ok(info)
    }

    /// Stop a running session
    pub fn stop(&self, id: &str) -> Result<()> {
        let slot = self.get(id)?;
        let mut session = lock(&slot.session);
        self.shut_down(id, &slot, &mut session)
    }

    /// Stop a running session, release its native resources and forget it
    pub fn destroy(&self, id: &str) -> Result<()> {
        let entry = self.get(id)?;
        {
            let mut session = lock(&entry.session);
            self.shut_down(id, &entry, &mut session)?;
            if !self.bridge.destroy_session(id) {
                debug!("DestroySession not exported; {} only shut down", id);
            }
        }

        let mut sessions = lock(&self.sessions);
        if sessions.get(id).is_some_and(|current| Arc::ptr_eq(current, &entry)) {
            sessions.remove(id);
        }
        Ok(())
    }

    /// Forget a session that is not running
    pub fn remove(&self, id: &str) -> Result<()> {
        let slot = self.get(id)?;
        let session = lock(&slot.session);
        if session.state.is_running() {
            return Err(Error::already_running(id));
        }

        let mut sessions = lock(&self.sessions);
        if sessions.get(id).is_some_and(|current| Arc::ptr_eq(current, &slot)) {
            sessions.remove(id);
        }
        Ok(())
    }

    /// Handle of a running session
    pub fn handle(&self, id: &str) -> Result<SessionInfo> {
        let slot = self.get(id)?;
        let session = lock(&slot.session);
        match &session.state {
            SessionState::Running { port, key_pair } => {
                Ok(SessionInfo::new(&session.config, *port, key_pair))
            }
            _ => Err(Error::not_running(id)),
        }
    }

    /// Current state of a session
    pub fn state(&self, id: &str) -> Result<SessionState> {
        let slot = self.get(id)?;
        let state = lock(&slot.session).state.clone();
        Ok(state)
    }

    /// Ids of all known sessions
    pub fn sessions(&self) -> Vec<String> {
        let mut ids: Vec<String> = lock(&self.sessions).keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Handles of every running session
    pub fn running(&self) -> Vec<SessionInfo> {
        self.sessions()
            .iter()
            .filter_map(|id| self.handle(id).ok())
            .collect()
    }

    /// Forget stopped sessions, returning how many were removed
    pub fn prune_stopped(&self) -> usize {
        let mut sessions = lock(&self.sessions);
        let before = sessions.len();
        sessions.retain(|_, slot| !slot.is_stopped());
        before - sessions.len()
    }

    /// Create and launch a session that stops when the guard is dropped
    pub fn scoped(&self, config: SessionConfig) -> Result<SessionGuard<'_>> {
        let id = self.create(config)?;
        match self.launch(&id) {
            Ok(info) => Ok(SessionGuard {
                registry: self,
                info,
            }),
            Err(e) => {
                if let Err(cleanup) = self.remove(&id) {
                    warn!("Failed to forget session {}: {}", id, cleanup);
                }
                Err(e)
            }
        }
    }

    /// Stop every running session
    pub fn stop_all(&self) {
        for id in self.sessions() {
            match self.stop(&id) {
                Ok(()) => {}
                Err(Error::NotRunning { .. }) => {}
                Err(e) => warn!("Failed to stop session {}: {}", id, e),
            }
        }
    }

    fn get(&self, id: &str) -> Result<Arc<Slot>> {
        lock(&self.sessions)
            .get(id)
            .cloned()
            .ok_or_else(|| Error::SessionNotFound { id: id.to_string() })
    }

    fn shut_down(&self, id: &str, slot: &Slot, session: &mut Session) -> Result<()> {
        let SessionState::Running { port, .. } = session.state else {
            return Err(Error::not_running(id));
        };

        self.bridge.shutdown(id);
        self.release_port(port);
        session.state = SessionState::Stopped;
        slot.stopped.store(true, Ordering::Release);
        info!("Session {} stopped", id);
        Ok(())
    }

    fn reserve_port(&self, id: &str, requested: Option<u16>) -> Result<u16> {
        let mut ports = lock(&self.ports);

        let port = match requested {
            Some(port) => {
                if let Some(holder) = ports.get(&port) {
                    return Err(Error::PortInUse {
                        port,
                        holder: holder.clone(),
                    });
                }
                port
            }
            None => {
                let port = pick_unreserved(&ports)?;
                debug!("Picked ephemeral port {} for session {}", port, id);
                port
            }
        };

        ports.insert(port, id.to_string());
        Ok(port)
    }

    fn release_port(&self, port: u16) {
        lock(&self.ports).remove(&port);
    }
}

/// A running session that is stopped and forgotten when dropped
pub struct SessionGuard<'a> {
    registry: &'a SessionRegistry,
    info: SessionInfo,
}

impl SessionGuard<'_> {
    pub fn id(&self) -> &str {
        &self.info.id
    }

    pub fn info(&self) -> &SessionInfo {
        &self.info
    }

    pub fn url(&self) -> &str {
        &self.info.url
    }
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        let id = &self.info.id;
        match self.registry.stop(id) {
            Ok(()) | Err(Error::NotRunning { .. }) => {}
            Err(e) => warn!("Failed to stop session {}: {}", id, e),
        }
        if let Err(e) = self.registry.remove(id) {
            debug!("Session {} already forgotten: {}", id, e);
        }
    }
}
