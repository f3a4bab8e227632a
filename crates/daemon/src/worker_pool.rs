// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The worker pool (C8): a fixed-size pool of tasks draining a bounded
//! queue of dispatched requests, calling into the method dispatcher, and
//! posting responses back to the originating connection's send queue.
//!
//! Workers never touch the Scene directly and never hold any connection's
//! lock; all engine access goes through [`crate::engine::EngineGuard`] via
//! the [`crate::rpc::Dispatcher`].

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{atomic::AtomicBool, Arc};
use std::time::Instant;

use tokio::sync::{mpsc, Mutex};
use tracing::warn;
use voxel_core::Clock;
use voxel_wire::{encode_batch, encode_response, Id, RawRequest, RawResponse};

use crate::rpc::Dispatcher;

/// One message posted onto a connection's send queue: the encoded frame
/// plus the ids it answers, so the connection task can retire the matching
/// [`crate::connection::pending::PendingTable`] entries when it writes the
/// frame (not before — a response that never makes it onto the wire should
/// not be forgotten).
pub struct Outgoing {
    pub ids_to_clear: Vec<Id>,
    pub bytes: Vec<u8>,
}

/// Accumulates the responses for one JSON-RPC batch until every item has
/// completed, then posts a single encoded batch frame. Items that fail to
/// parse are seeded in directly (they never reach the worker pool); items
/// that parse are routed here by their [`Job`] instead of responding
/// individually.
pub struct BatchSink {
    awaited: usize,
    ids: Vec<Id>,
    buffer: parking_lot::Mutex<Vec<RawResponse>>,
    respond: mpsc::UnboundedSender<Outgoing>,
}

impl BatchSink {
    pub fn new(respond: mpsc::UnboundedSender<Outgoing>, ids: Vec<Id>, awaited: usize) -> Arc<Self> {
        Arc::new(Self { awaited, ids, buffer: parking_lot::Mutex::new(Vec::new()), respond })
    }

    /// Adds one item's response. Once every awaited item has reported in,
    /// the whole batch is encoded and posted as a single frame.
    pub fn push(&self, response: RawResponse) {
        let responses = {
            let mut buf = self.buffer.lock();
            buf.push(response);
            if buf.len() < self.awaited {
                return;
            }
            std::mem::take(&mut *buf)
        };
        let bytes = encode_batch(&responses);
        let _ = self.respond.send(Outgoing { ids_to_clear: self.ids.clone(), bytes });
    }
}

/// One dispatched request, queued for a worker.
pub struct Job {
    pub raw: RawRequest,
    pub deadline: Option<Instant>,
    pub session_id: String,
    pub cancel_flag: Arc<AtomicBool>,
    pub respond: mpsc::UnboundedSender<Outgoing>,
    /// `Some` when this job is one item of a JSON-RPC batch: its response is
    /// posted to the shared sink instead of answered individually.
    pub batch: Option<Arc<BatchSink>>,
}

/// Returned by [`WorkerPool::submit`] when the bounded queue is full; the
/// dispatcher should respond to the originating request with -32000
/// directly rather than blocking the connection task.
#[derive(Debug)]
pub struct Backpressure;

pub struct WorkerPool {
    sender: mpsc::Sender<Job>,
    queue_depth: Arc<AtomicUsize>,
}

impl WorkerPool {
    pub fn spawn<C: Clock + 'static>(worker_count: usize, dispatcher: Arc<Dispatcher<C>>, queue_capacity: usize) -> Self {
        let (sender, receiver) = mpsc::channel(queue_capacity);
        let receiver = Arc::new(Mutex::new(receiver));
        let queue_depth = Arc::new(AtomicUsize::new(0));

        for worker_id in 0..worker_count.max(1) {
            let receiver = Arc::clone(&receiver);
            let dispatcher = Arc::clone(&dispatcher);
            let queue_depth = Arc::clone(&queue_depth);
            tokio::spawn(async move {
                loop {
                    let job = {
                        let mut guard = receiver.lock().await;
                        guard.recv().await
                    };
                    let Some(job) = job else { break };
                    queue_depth.fetch_sub(1, Ordering::Relaxed);
                    run_job(worker_id, &dispatcher, job).await;
                }
            });
        }

        Self { sender, queue_depth }
    }

    /// Non-blocking enqueue; returns `Backpressure` if the queue is full.
    pub fn submit(&self, job: Job) -> Result<(), Backpressure> {
        self.sender.try_send(job).map_err(|_| Backpressure)?;
        self.queue_depth.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    pub fn queue_depth(&self) -> usize {
        self.queue_depth.load(Ordering::Relaxed)
    }
}

async fn run_job<C: Clock + 'static>(worker_id: usize, dispatcher: &Dispatcher<C>, job: Job) {
    if job.cancel_flag.load(Ordering::Acquire) {
        return;
    }
    let id = job.raw.id.clone();
    let response = dispatcher.dispatch(job.raw, job.deadline, &job.session_id, &job.cancel_flag).await;
    if job.cancel_flag.load(Ordering::Acquire) {
        return;
    }
    let Some(response) = response else { return };
    match job.batch {
        Some(batch) => batch.push(response),
        None => {
            let ids_to_clear = id.into_iter().collect();
            let bytes = encode_response(&response);
            if job.respond.send(Outgoing { ids_to_clear, bytes }).is_err() {
                warn!(worker_id, "connection gone before response could be posted");
            }
        }
    }
}

#[cfg(test)]
#[path = "worker_pool_tests.rs"]
mod tests;
