// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use tokio::sync::mpsc;
use voxel_core::{FakeClock, HealthSnapshot};
use voxel_wire::{Id, Params, RawRequest};

use super::*;
use crate::artifacts::ArtifactManager;
use crate::engine::EngineGuard;
use crate::rpc::StatusProvider;

struct FixedStatus;
impl StatusProvider for FixedStatus {
    fn snapshot(&self) -> HealthSnapshot {
        HealthSnapshot::default()
    }
}

fn make_dispatcher(dir: &std::path::Path) -> Arc<Dispatcher<FakeClock>> {
    let artifacts = ArtifactManager::new(dir.to_path_buf(), 3600, 1_000_000, FakeClock::new()).unwrap();
    Arc::new(Dispatcher::new(Arc::new(EngineGuard::new()), Arc::new(artifacts), Arc::new(FixedStatus)))
}

fn ping_request(id: i64) -> RawRequest {
    RawRequest {
        jsonrpc: voxel_wire::JsonRpcVersion,
        method: "ping".to_string(),
        params: Params::None,
        id: Some(Id::Number(id)),
    }
}

#[tokio::test]
async fn submitted_job_produces_a_response_on_the_send_queue() {
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = make_dispatcher(dir.path());
    let pool = WorkerPool::spawn(2, dispatcher, 16);
    let (tx, mut rx) = mpsc::unbounded_channel();

    pool.submit(Job {
        raw: ping_request(1),
        deadline: None,
        session_id: "sess".into(),
        cancel_flag: Arc::new(AtomicBool::new(false)),
        respond: tx,
        batch: None,
    })
    .unwrap();

    let outgoing = rx.recv().await.unwrap();
    assert_eq!(outgoing.ids_to_clear, vec![Id::Number(1)]);
    let text = String::from_utf8(outgoing.bytes).unwrap();
    assert!(text.contains("\"pong\":true"));
}

#[tokio::test]
async fn cancelled_job_produces_no_response() {
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = make_dispatcher(dir.path());
    let pool = WorkerPool::spawn(1, dispatcher, 16);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let cancel_flag = Arc::new(AtomicBool::new(true));

    pool.submit(Job {
        raw: ping_request(1),
        deadline: None,
        session_id: "sess".into(),
        cancel_flag,
        respond: tx,
        batch: None,
    })
    .unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn full_queue_reports_backpressure() {
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = make_dispatcher(dir.path());
    let pool = WorkerPool::spawn(1, dispatcher, 1);
    let (tx, _rx) = mpsc::unbounded_channel();

    pool.submit(Job {
        raw: ping_request(1),
        deadline: None,
        session_id: "sess".into(),
        cancel_flag: Arc::new(AtomicBool::new(false)),
        respond: tx.clone(),
        batch: None,
    })
    .unwrap();
    let err = pool.submit(Job {
        raw: ping_request(2),
        deadline: None,
        session_id: "sess".into(),
        cancel_flag: Arc::new(AtomicBool::new(false)),
        respond: tx,
        batch: None,
    });
    assert!(err.is_err());
}

#[test]
fn batch_sink_waits_for_every_awaited_item_before_posting() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let ids = vec![Id::Number(1), Id::Number(2)];
    let sink = BatchSink::new(tx, ids.clone(), 2);

    sink.push(voxel_wire::RawResponse::ok(Id::Number(1), serde_json::json!({})));
    assert!(rx.try_recv().is_err(), "batch must not post before every item has reported in");

    sink.push(voxel_wire::RawResponse::ok(Id::Number(2), serde_json::json!({})));
    let outgoing = rx.try_recv().expect("batch posts once the last item arrives");
    assert_eq!(outgoing.ids_to_clear, ids);
    let text = String::from_utf8(outgoing.bytes).unwrap();
    assert!(text.trim_end().starts_with('['), "batch frame must be a JSON array: {text}");
}
