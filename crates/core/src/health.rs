// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The daemon's health snapshot, returned by the `status` method.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DaemonMode {
    Healthy,
    Degraded,
}

impl Default for DaemonMode {
    fn default() -> Self {
        DaemonMode::Healthy
    }
}

/// Process-wide health information, assembled by the daemon supervisor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealthSnapshot {
    pub version: String,
    pub uptime_sec: u64,
    pub active_connections: usize,
    pub pending_requests_total: usize,
    pub worker_queue_depth: usize,
    pub artifact_count: usize,
    pub artifact_bytes: u64,
    pub mode: DaemonMode,
}

#[cfg(test)]
#[path = "health_tests.rs"]
mod tests;
