// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The daemon supervisor (C9): startup sequence, PID-file singleton
//! enforcement, signal-triggered graceful shutdown, and the health
//! snapshot served by the `status` method.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use fs2::FileExt;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use voxel_core::{DaemonMode, HealthSnapshot, SystemClock};

use crate::artifacts::ArtifactManager;
use crate::config::Config;
use crate::engine::EngineGuard;
use crate::env::PROTOCOL_VERSION;

#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("could not determine a state directory (set VOXD_STATE_DIR or HOME)")]
    NoStateDir,
    #[error("a daemon is already running against this socket/pid file")]
    AlreadyRunning,
    #[error("socket path exceeds the platform length limit: {0}")]
    PathTooLong(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Live counters updated by the listener/worker pool as they are built;
/// the supervisor only reads them for the health snapshot.
#[derive(Default)]
pub struct LiveStats {
    pub active_connections: AtomicUsize,
    pub pending_requests_total: AtomicUsize,
    pub worker_queue_depth: AtomicUsize,
}

/// Process-global daemon state, minus the listener/worker pool/connection
/// table which are owned by `main.rs` and referenced here only through
/// `LiveStats`.
pub struct Supervisor {
    pub engine_guard: Arc<EngineGuard>,
    pub artifact_manager: Arc<ArtifactManager<SystemClock>>,
    pub shutdown: CancellationToken,
    pub stats: Arc<LiveStats>,
    started_at: Instant,
    degraded_override: AtomicBool,
    pid_file: Option<PathBuf>,
    /// Held only so the advisory lock on the pid file lives as long as the
    /// supervisor; never read otherwise.
    _pid_lock: Option<std::fs::File>,
    socket_path: PathBuf,
}

const MAX_SOCKET_PATH_LEN: usize = 104;

impl Supervisor {
    /// Runs the startup sequence: validates the socket path, detects a
    /// live daemon already bound to it, writes the PID file, and
    /// constructs the engine guard and artifact manager. Does not bind
    /// the listener itself; that is the caller's responsibility once this
    /// returns successfully.
    pub async fn start(config: &Config) -> Result<Self, SupervisorError> {
        validate_socket_path(&config.socket_path)?;
        probe_for_live_daemon(&config.socket_path).await?;

        let pid_lock = match &config.pid_file {
            Some(path) => Some(acquire_pid_file(path)?),
            None => None,
        };

        let artifact_manager = ArtifactManager::new(
            config.artifact_dir.clone(),
            config.artifact_ttl_sec,
            config.artifact_cache_bytes,
            SystemClock,
        )?;

        info!(socket = %config.socket_path.display(), "daemon starting");

        Ok(Self {
            engine_guard: Arc::new(EngineGuard::new()),
            artifact_manager: Arc::new(artifact_manager),
            shutdown: CancellationToken::new(),
            stats: Arc::new(LiveStats::default()),
            started_at: Instant::now(),
            degraded_override: AtomicBool::new(false),
            pid_file: config.pid_file.clone(),
            _pid_lock: pid_lock,
            socket_path: config.socket_path.clone(),
        })
    }

    /// Waits for SIGINT or SIGTERM, then signals graceful shutdown. A
    /// second signal forces immediate return without waiting for drain.
    #[cfg(unix)]
    pub async fn wait_for_shutdown_signal(&self) {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigint = signal(SignalKind::interrupt()).expect("failed to install SIGINT handler");
        let mut sigterm = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = sigint.recv() => info!("received SIGINT"),
            _ = sigterm.recv() => info!("received SIGTERM"),
        }
        self.shutdown.cancel();

        tokio::select! {
            _ = sigint.recv() => warn!("second signal received, forcing shutdown"),
            _ = sigterm.recv() => warn!("second signal received, forcing shutdown"),
            _ = tokio::time::sleep(std::time::Duration::MAX) => {}
        }
    }

    /// Performs the ordered graceful-shutdown steps that are this
    /// component's own responsibility (artifact cleanup, pid file
    /// removal, socket unlink). Draining connections and the worker pool
    /// is orchestrated by `main.rs`, which calls this last.
    pub fn finish_shutdown(&self) {
        let removed = self.artifact_manager.run_cleanup_cycle();
        info!(removed, "final artifact cleanup cycle");

        if let Some(path) = &self.pid_file {
            if let Err(e) = std::fs::remove_file(path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(error = %e, "failed to remove pid file");
                }
            }
        }
        if let Err(e) = std::fs::remove_file(&self.socket_path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(error = %e, "failed to unlink socket");
            }
        }
        info!("daemon shutdown complete");
    }

    pub fn mark_degraded(&self) {
        self.degraded_override.store(true, Ordering::Release);
    }

    pub fn health_snapshot(&self) -> HealthSnapshot {
        let mode = if self.engine_guard.is_degraded() || self.degraded_override.load(Ordering::Acquire) {
            DaemonMode::Degraded
        } else {
            DaemonMode::Healthy
        };
        HealthSnapshot {
            version: PROTOCOL_VERSION.to_string(),
            uptime_sec: self.started_at.elapsed().as_secs(),
            active_connections: self.stats.active_connections.load(Ordering::Relaxed),
            pending_requests_total: self.stats.pending_requests_total.load(Ordering::Relaxed),
            worker_queue_depth: self.stats.worker_queue_depth.load(Ordering::Relaxed),
            artifact_count: self.artifact_manager.count(),
            artifact_bytes: self.artifact_manager.total_bytes(),
            mode,
        }
    }
}

impl crate::rpc::StatusProvider for Supervisor {
    fn snapshot(&self) -> HealthSnapshot {
        self.health_snapshot()
    }
}

fn validate_socket_path(path: &Path) -> Result<(), SupervisorError> {
    let len = path.as_os_str().len();
    if len > MAX_SOCKET_PATH_LEN {
        return Err(SupervisorError::PathTooLong(path.display().to_string()));
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// If a socket file already exists at `path`, attempt to connect and send
/// a `ping`; a response means a live daemon holds it. A connect failure
/// means the file is stale and safe to unlink.
async fn probe_for_live_daemon(path: &Path) -> Result<(), SupervisorError> {
    if !path.exists() {
        return Ok(());
    }
    match tokio::net::UnixStream::connect(path).await {
        Ok(_) => Err(SupervisorError::AlreadyRunning),
        Err(_) => {
            std::fs::remove_file(path).ok();
            Ok(())
        }
    }
}

/// Opens (or creates) the pid file and takes an exclusive advisory lock on
/// it, failing if another process already holds it. Writes our pid once
/// locked.
fn acquire_pid_file(path: &Path) -> Result<std::fs::File, SupervisorError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::OpenOptions::new().create(true).write(true).truncate(false).open(path)?;
    file.try_lock_exclusive().map_err(|_| SupervisorError::AlreadyRunning)?;
    file.set_len(0)?;
    use std::io::Write;
    (&file).write_all(std::process::id().to_string().as_bytes())?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o644))?;
    }
    Ok(file)
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
