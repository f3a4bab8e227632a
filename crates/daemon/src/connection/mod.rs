// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The connection state machine (C6): one long-lived task per accepted
//! stream. Reads keep flowing after every response so a client may have
//! many requests outstanding at once; responses are matched back to
//! requests purely by id and may complete out of order.

pub mod pending;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use voxel_wire::error::APP_RESOURCE_EXHAUSTED;
use voxel_wire::{encode_response, parse_frame, Framer, Id, ParsedFrame, RawRequest, RawResponse, RpcError};

use crate::supervisor::LiveStats;
use crate::worker_pool::{BatchSink, Job, Outgoing, WorkerPool};

use pending::PendingTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    New,
    Active,
    Idle,
    Draining,
    Closed,
}

#[derive(Debug, Clone, Copy)]
pub struct ConnectionLimits {
    pub max_pending: u16,
    pub max_frame_bytes: u32,
    /// `None` means unbounded: the connection never transitions to Idle on
    /// its own (it may still be observed idle by operators via stats).
    pub idle_timeout: Option<Duration>,
    pub drain_deadline: Duration,
    pub request_deadline: Duration,
}

impl ConnectionLimits {
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self {
            max_pending: config.max_pending_per_connection,
            max_frame_bytes: config.max_frame_bytes,
            idle_timeout: None,
            drain_deadline: crate::env::drain_timeout(),
            request_deadline: crate::env::ipc_timeout(),
        }
    }
}

/// Runs one accepted connection to completion. Consumes the stream;
/// returns once the connection has fully drained or the forced-close
/// deadline elapses. Dispatch itself lives in the worker pool; this task
/// only frames, tracks pending ids, and ferries bytes.
pub async fn run(
    stream: UnixStream,
    id: u64,
    worker_pool: Arc<WorkerPool>,
    limits: ConnectionLimits,
    shutdown: CancellationToken,
    stats: Arc<LiveStats>,
) {
    let (mut reader, mut writer) = stream.into_split();
    let mut framer = Framer::new();
    let mut read_buf = vec![0u8; 16 * 1024];
    let mut pending = PendingTable::new();
    let (send_tx, mut send_rx) = mpsc::unbounded_channel::<Outgoing>();
    let mut state = ConnectionState::New;
    let mut last_activity = Instant::now();
    let session_id = format!("conn{id}");

    stats.active_connections.fetch_add(1, Ordering::Relaxed);
    info!(connection_id = id, "connection active");
    state = ConnectionState::Active;

    loop {
        let reading_paused = pending.len() as u16 >= limits.max_pending || state == ConnectionState::Draining;

        let idle_sleep = async {
            match limits.idle_timeout {
                Some(timeout) => {
                    tokio::time::sleep(timeout.saturating_sub(last_activity.elapsed())).await;
                }
                None => std::future::pending::<()>().await,
            }
        };

        // While draining, nothing else may ever wake this loop again (the
        // peer is gone, no more responses are coming) — this tick is what
        // lets the overdue check below actually re-run so the forced-close
        // deadline is enforced instead of hanging forever.
        let drain_tick = async {
            if state == ConnectionState::Draining {
                tokio::time::sleep(Duration::from_millis(250)).await;
            } else {
                std::future::pending::<()>().await;
            }
        };

        tokio::select! {
            biased;

            _ = shutdown.cancelled(), if state != ConnectionState::Draining => {
                debug!(connection_id = id, "supervisor requested shutdown, draining connection");
                pending.cancel_all();
                state = ConnectionState::Draining;
            }

            read_result = reader.read(&mut read_buf), if !reading_paused => {
                match read_result {
                    Ok(0) => {
                        debug!(connection_id = id, "peer closed connection");
                        pending.cancel_all();
                        state = ConnectionState::Draining;
                    }
                    Ok(n) => {
                        last_activity = Instant::now();
                        state = ConnectionState::Active;
                        framer.feed(&read_buf[..n]);
                        if framer.buffered_len() > limits.max_frame_bytes as usize {
                            let bytes = encode_response(&RawResponse::err(Id::Null, RpcError::invalid_request()));
                            let _ = send_tx.send(Outgoing { ids_to_clear: Vec::new(), bytes });
                            pending.cancel_all();
                            state = ConnectionState::Draining;
                        } else {
                            while let Some(frame) = framer.next_frame() {
                                handle_frame(
                                    &frame,
                                    id,
                                    &session_id,
                                    limits.request_deadline,
                                    &mut pending,
                                    &worker_pool,
                                    &send_tx,
                                );
                            }
                        }
                    }
                    Err(e) => {
                        warn!(connection_id = id, error = %e, "read error");
                        pending.cancel_all();
                        state = ConnectionState::Draining;
                    }
                }
            }

            Some(outgoing) = send_rx.recv() => {
                for completed_id in &outgoing.ids_to_clear {
                    pending.remove(completed_id);
                }
                if let Err(e) = writer.write_all(&outgoing.bytes).await {
                    warn!(connection_id = id, error = %e, "write error");
                    pending.cancel_all();
                    state = ConnectionState::Draining;
                }
            }

            _ = idle_sleep, if state == ConnectionState::Active && pending.is_empty() => {
                state = ConnectionState::Idle;
            }

            _ = drain_tick => {}
        }

        if state == ConnectionState::Draining {
            let drained = pending.is_empty();
            let overdue = pending
                .oldest_dispatched_at()
                .map(|t| t.elapsed() > limits.drain_deadline)
                .unwrap_or(false);
            if drained || overdue {
                if overdue {
                    warn!(connection_id = id, "forced close: drain deadline exceeded");
                }
                break;
            }
        }
    }

    state = ConnectionState::Closed;
    debug!(connection_id = id, ?state, "flushing remaining responses before close");
    while let Ok(outgoing) = send_rx.try_recv() {
        let _ = writer.write_all(&outgoing.bytes).await;
    }
    let _ = writer.shutdown().await;
    stats.active_connections.fetch_sub(1, Ordering::Relaxed);
    info!(connection_id = id, "connection closed");
}

fn handle_frame(
    frame: &[u8],
    connection_id: u64,
    session_id: &str,
    request_deadline: Duration,
    pending: &mut PendingTable,
    worker_pool: &Arc<WorkerPool>,
    send_tx: &mpsc::UnboundedSender<Outgoing>,
) {
    match parse_frame(frame) {
        Ok(ParsedFrame::Single(raw)) => {
            enqueue(raw, connection_id, session_id, request_deadline, pending, worker_pool, send_tx, None);
        }
        Ok(ParsedFrame::Batch(items)) => {
            // Every item that will produce a response (parse failures and
            // non-notification requests) is awaited by one shared sink so
            // the whole batch is answered as a single JSON array frame,
            // regardless of which items complete first.
            let awaited = items
                .iter()
                .filter(|item| match item {
                    Ok(raw) => !raw.is_notification(),
                    Err(_) => true,
                })
                .count();
            if awaited == 0 {
                for item in items.into_iter().flatten() {
                    enqueue(item, connection_id, session_id, request_deadline, pending, worker_pool, send_tx, None);
                }
                return;
            }
            let ids: Vec<Id> = items
                .iter()
                .filter_map(|item| match item {
                    Ok(raw) if !raw.is_notification() => raw.id.clone(),
                    _ => None,
                })
                .collect();
            let batch = BatchSink::new(send_tx.clone(), ids, awaited);
            for item in items {
                match item {
                    Ok(raw) => enqueue(
                        raw,
                        connection_id,
                        session_id,
                        request_deadline,
                        pending,
                        worker_pool,
                        send_tx,
                        Some(Arc::clone(&batch)),
                    ),
                    Err(e) => batch.push(RawResponse::err(Id::Null, e)),
                }
            }
        }
        Err(e) => {
            let bytes = encode_response(&RawResponse::err(Id::Null, e));
            let _ = send_tx.send(Outgoing { ids_to_clear: Vec::new(), bytes });
        }
    }
}

fn enqueue(
    raw: RawRequest,
    connection_id: u64,
    session_id: &str,
    request_deadline: Duration,
    pending: &mut PendingTable,
    worker_pool: &Arc<WorkerPool>,
    send_tx: &mpsc::UnboundedSender<Outgoing>,
    batch: Option<Arc<BatchSink>>,
) {
    let is_notification = raw.is_notification();
    let id_for_removal = raw.id.clone();
    let cancel_flag = raw.id.clone().map(|id| pending.insert(id)).unwrap_or_default();

    let job = Job {
        raw,
        deadline: Some(Instant::now() + request_deadline),
        session_id: session_id.to_string(),
        cancel_flag,
        respond: send_tx.clone(),
        batch: batch.clone(),
    };

    if worker_pool.submit(job).is_err() {
        warn!(connection_id, "worker pool saturated, rejecting request");
        if !is_notification {
            if let Some(id) = id_for_removal {
                let error = RawResponse::err(id.clone(), RpcError::new(APP_RESOURCE_EXHAUSTED, "worker pool is saturated"));
                match &batch {
                    Some(batch) => batch.push(error),
                    None => {
                        let bytes = encode_response(&error);
                        let _ = send_tx.send(Outgoing { ids_to_clear: vec![id], bytes });
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
