//! Ephemeral port probing

use std::collections::HashMap;
use std::io;
use std::net::{Ipv4Addr, TcpListener};

/// Attempts before giving up on finding an unreserved port
const MAX_PROBES: usize = 16;

/// Ask the OS for a free loopback port
///
/// The probe socket is closed before returning, so the port is only likely, not
/// guaranteed, to still be free when the native side binds it.
pub fn probe_free_port() -> io::Result<u16> {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))?;
    Ok(listener.local_addr()?.port())
}

/// Probe until the OS hands out a port not in `reserved`
pub(crate) fn pick_unreserved<V>(reserved: &HashMap<u16, V>) -> io::Result<u16> {
    for _ in 0..MAX_PROBES {
        let port = probe_free_port()?;
        if !reserved.contains_key(&port) {
            return Ok(port);
        }
    }
    Err(io::Error::new(
        io::ErrorKind::AddrInUse,
        format!("no unreserved port found after {} probes", MAX_PROBES),
    ))
}
