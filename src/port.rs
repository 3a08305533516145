//! Port Probing Module
//!
//! Finds a free loopback port for the server when none was configured.

use std::net::TcpListener;

use tracing::{debug, info};

use crate::error::{AppError, Result};

/// Ports tried before falling back to a linear scan.
const PREFERRED_PORTS: &[u16] = &[8000, 8080, 3000, 5000, 9000];

/// Finds an available port for binding.
///
/// The preferred ports are tried first, then `start_port..start_port +
/// max_attempts`. Availability means a loopback bind succeeds right now;
/// the caller should bind promptly afterwards.
pub fn find_available_port(start_port: u16, max_attempts: u16) -> Result<u16> {
    for &port in PREFERRED_PORTS {
        if is_port_available(port) {
            info!(port, "using preferred port");
            return Ok(port);
        }
        debug!(port, "preferred port busy");
    }

    for offset in 0..max_attempts {
        let port = start_port.saturating_add(offset);
        if !PREFERRED_PORTS.contains(&port) && is_port_available(port) {
            info!(port, "found available port");
            return Ok(port);
        }
    }

    Err(AppError::Internal(format!(
        "no available port found in range {}-{}",
        start_port,
        start_port.saturating_add(max_attempts)
    )))
}

/// Checks whether `port` can be bound on the loopback interface.
fn is_port_available(port: u16) -> bool {
    TcpListener::bind(("127.0.0.1", port)).is_ok()
}
