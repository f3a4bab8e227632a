// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The IPC listener (C7): binds the Unix domain socket, accepts
//! connections, and enforces the connection cap. Never blocks on any
//! single connection — each accepted stream is handed off to its own task
//! immediately.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::net::{UnixListener, UnixStream};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use voxel_wire::error::APP_RESOURCE_EXHAUSTED;
use voxel_wire::{encode_response, Id, RawResponse, RpcError};

use crate::connection::{self, ConnectionLimits};
use crate::supervisor::LiveStats;
use crate::worker_pool::WorkerPool;

pub struct Listener {
    inner: UnixListener,
    socket_path: std::path::PathBuf,
    max_connections: u16,
}

impl Listener {
    /// Binds `socket_path`, creating its parent directory if needed and
    /// setting the socket file mode to 0660. The caller is responsible for
    /// having already unlinked a stale socket (see
    /// [`crate::supervisor::Supervisor::start`]).
    pub fn bind(socket_path: std::path::PathBuf, max_connections: u16) -> std::io::Result<Self> {
        if let Some(parent) = socket_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let inner = UnixListener::bind(&socket_path)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&socket_path, std::fs::Permissions::from_mode(0o660))?;
        }
        info!(socket = %socket_path.display(), "listener bound");
        Ok(Self { inner, socket_path, max_connections })
    }

    /// Accepts connections until `shutdown` fires, spawning a
    /// [`connection::run`] task per accepted stream. Connections beyond
    /// `max_connections` are answered with a single resource-exhausted
    /// error and closed immediately rather than being handed a task.
    pub async fn serve(
        self,
        worker_pool: Arc<WorkerPool>,
        limits: ConnectionLimits,
        shutdown: CancellationToken,
        stats: Arc<LiveStats>,
    ) {
        let next_id = AtomicU64::new(1);
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("listener shutting down, no longer accepting connections");
                    break;
                }
                accepted = self.inner.accept() => {
                    match accepted {
                        Ok((stream, _addr)) => {
                            let id = next_id.fetch_add(1, Ordering::Relaxed);
                            let active = stats.active_connections.load(Ordering::Relaxed);
                            if active >= self.max_connections as usize {
                                warn!(connection_id = id, active, cap = self.max_connections, "connection cap reached, rejecting");
                                reject_over_capacity(stream).await;
                                continue;
                            }
                            info!(connection_id = id, "accepted connection");
                            tokio::spawn(connection::run(
                                stream,
                                id,
                                Arc::clone(&worker_pool),
                                limits,
                                shutdown.clone(),
                                Arc::clone(&stats),
                            ));
                        }
                        Err(e) => {
                            warn!(error = %e, "accept failed");
                        }
                    }
                }
            }
        }
    }

    pub fn socket_path(&self) -> &std::path::Path {
        &self.socket_path
    }
}

/// Writes a single resource-exhausted response to a stream we aren't
/// keeping, then drops it. Best-effort: a client that disconnects before
/// this completes is not an error worth logging.
async fn reject_over_capacity(stream: UnixStream) {
    use tokio::io::AsyncWriteExt;
    let response = RawResponse::err(Id::Null, RpcError::new(APP_RESOURCE_EXHAUSTED, "connection limit reached"));
    let bytes = encode_response(&response);
    let mut stream = stream;
    let _ = stream.write_all(&bytes).await;
    let _ = stream.shutdown().await;
}

#[cfg(test)]
#[path = "listener_tests.rs"]
mod tests;
