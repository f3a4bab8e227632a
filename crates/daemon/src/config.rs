// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration: an optional TOML file layered under field defaults,
//! with a handful of environment-variable overrides (see `env.rs`).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::env;
use crate::supervisor::SupervisorError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub socket_path: PathBuf,
    pub pid_file: Option<PathBuf>,
    pub workers: Option<u8>,
    pub max_connections: u16,
    pub max_pending_per_connection: u16,
    pub max_frame_bytes: u32,
    pub shutdown_deadline_sec: u16,
    pub artifact_dir: PathBuf,
    pub artifact_ttl_sec: u32,
    pub artifact_cache_bytes: u64,
    pub artifact_cleanup_interval_sec: u32,
    pub script_timeout_default_ms: u32,
}

impl Default for Config {
    fn default() -> Self {
        let state_dir = env::state_dir().unwrap_or_else(|_| PathBuf::from(".voxd"));
        Self {
            socket_path: state_dir.join("voxd.sock"),
            pid_file: Some(state_dir.join("voxd.pid")),
            workers: None,
            max_connections: 256,
            max_pending_per_connection: 64,
            max_frame_bytes: 64 * 1024 * 1024,
            shutdown_deadline_sec: 30,
            artifact_dir: state_dir.join("artifacts"),
            artifact_ttl_sec: 3600,
            artifact_cache_bytes: 1024 * 1024 * 1024,
            artifact_cleanup_interval_sec: 300,
            script_timeout_default_ms: 30_000,
        }
    }
}

impl Config {
    /// Loads configuration from `path` if given, else from
    /// `<state_dir>/voxd.toml` if it exists; a missing file is not an
    /// error. Applies `VOXD_*` environment overrides last.
    pub fn load(path: Option<&Path>) -> Result<Self, SupervisorError> {
        let mut config = Self::default();

        let file_path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => env::state_dir().ok().map(|d| d.join("voxd.toml")),
        };

        if let Some(file_path) = file_path {
            if file_path.exists() {
                let text = std::fs::read_to_string(&file_path).map_err(SupervisorError::Io)?;
                config = toml::from_str(&text).map_err(|e| SupervisorError::Config(e.to_string()))?;
            }
        }

        if let Some(socket) = env::socket_path() {
            config.socket_path = socket;
        }

        Ok(config)
    }

    pub fn worker_count(&self) -> usize {
        self.workers.map(|w| w as usize).unwrap_or_else(|| {
            std::thread::available_parallelism().map(|n| n.get()).unwrap_or(4).clamp(2, 8)
        })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
