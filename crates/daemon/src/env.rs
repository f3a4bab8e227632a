// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;
use std::time::Duration;

use crate::supervisor::SupervisorError;

/// Protocol version (from Cargo.toml)
pub const PROTOCOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Resolve the state directory: `VOXD_STATE_DIR` > `XDG_STATE_HOME/voxd` >
/// `~/.local/state/voxd`.
pub fn state_dir() -> Result<PathBuf, SupervisorError> {
    if let Ok(dir) = std::env::var("VOXD_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("voxd"));
    }
    let home = std::env::var("HOME").map_err(|_| SupervisorError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/voxd"))
}

/// Socket path override; falls back to `<state_dir>/voxd.sock`.
pub fn socket_path() -> Option<PathBuf> {
    std::env::var("VOXD_SOCKET_PATH").ok().map(PathBuf::from)
}

/// Default per-request IPC deadline.
pub fn ipc_timeout() -> Duration {
    std::env::var("VOXD_IPC_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(30))
}

/// Graceful-drain deadline before a connection is force-closed.
pub fn drain_timeout() -> Duration {
    std::env::var("VOXD_DRAIN_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(30))
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
