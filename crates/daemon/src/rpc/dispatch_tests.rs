// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use serde_json::json;
use voxel_core::{FakeClock, HealthSnapshot};
use voxel_wire::{Id, Params, RawRequest};

use super::*;
use crate::artifacts::ArtifactManager;
use crate::engine::EngineGuard;

fn no_cancel() -> Arc<AtomicBool> {
    Arc::new(AtomicBool::new(false))
}

struct FixedStatus;
impl StatusProvider for FixedStatus {
    fn snapshot(&self) -> HealthSnapshot {
        HealthSnapshot { version: "test".into(), ..Default::default() }
    }
}

fn make_dispatcher(dir: &std::path::Path) -> Dispatcher<FakeClock> {
    let artifacts = ArtifactManager::new(dir.to_path_buf(), 3600, 1_000_000, FakeClock::new()).unwrap();
    Dispatcher::new(Arc::new(EngineGuard::new()), Arc::new(artifacts), Arc::new(FixedStatus))
}

fn req(method: &str, params: serde_json::Value, id: i64) -> RawRequest {
    RawRequest {
        jsonrpc: voxel_wire::JsonRpcVersion,
        method: method.to_string(),
        params: match params {
            serde_json::Value::Object(m) => Params::ByName(m),
            serde_json::Value::Null => Params::None,
            _ => panic!("expected object or null"),
        },
        id: Some(Id::Number(id)),
    }
}

#[tokio::test]
async fn ping_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = make_dispatcher(dir.path());
    let resp = dispatcher.dispatch(req("ping", json!(null), 1), None, "sess", &no_cancel()).await.unwrap();
    assert!(resp.is_success());
    assert_eq!(resp.id, Id::Number(1));
}

#[tokio::test]
async fn unknown_method_yields_method_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = make_dispatcher(dir.path());
    let resp = dispatcher.dispatch(req("not_a_method", json!(null), 2), None, "sess", &no_cancel()).await.unwrap();
    assert_eq!(resp.error.unwrap().code, voxel_wire::error::METHOD_NOT_FOUND);
}

#[tokio::test]
async fn notification_produces_no_response() {
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = make_dispatcher(dir.path());
    let mut request = req("ping", json!(null), 0);
    request.id = None;
    let resp = dispatcher.dispatch(request, None, "sess", &no_cancel()).await;
    assert!(resp.is_none());
}

#[tokio::test]
async fn status_method_uses_injected_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = make_dispatcher(dir.path());
    let resp = dispatcher.dispatch(req("status", json!(null), 3), None, "sess", &no_cancel()).await.unwrap();
    let result = resp.result.unwrap();
    assert_eq!(result["version"], "test");
}

#[tokio::test]
async fn create_project_then_add_voxel_then_get_voxel() {
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = make_dispatcher(dir.path());
    dispatcher
        .dispatch(req("create_project", json!({ "name": "demo" }), 1), None, "sess", &no_cancel())
        .await
        .unwrap();
    dispatcher
        .dispatch(
            req("add_voxel", json!({ "x": 0, "y": 0, "z": 0, "color": [1, 2, 3, 255] }), 2),
            None,
            "sess",
            &no_cancel(),
        )
        .await
        .unwrap();
    let resp = dispatcher
        .dispatch(req("get_voxel", json!({ "x": 0, "y": 0, "z": 0 }), 3), None, "sess", &no_cancel())
        .await
        .unwrap();
    let result = resp.result.unwrap();
    assert_eq!(result["exists"], true);
    assert_eq!(result["color"], json!([1, 2, 3, 255]));
}

#[tokio::test]
async fn render_scene_registers_a_retrievable_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = make_dispatcher(dir.path());
    dispatcher
        .dispatch(req("create_project", json!({ "name": "demo" }), 1), None, "sess", &no_cancel())
        .await
        .unwrap();
    let resp = dispatcher
        .dispatch(req("render_scene", json!({ "width": 16, "height": 16 }), 2), None, "sess", &no_cancel())
        .await
        .unwrap();
    let result = resp.result.unwrap();
    let path = result["file"]["path"].as_str().unwrap();
    assert!(std::path::Path::new(path).exists());
    assert_eq!(dispatcher.artifacts.count(), 1);
}

#[tokio::test]
async fn list_methods_includes_ping() {
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = make_dispatcher(dir.path());
    let resp = dispatcher.dispatch(req("list_methods", json!(null), 1), None, "sess", &no_cancel()).await.unwrap();
    let methods = resp.result.unwrap()["methods"].as_array().unwrap().clone();
    assert!(methods.iter().any(|m| m == "ping"));
}

#[tokio::test]
async fn legacy_prefixed_method_name_is_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = make_dispatcher(dir.path());
    let resp = dispatcher.dispatch(req("goxel.ping", json!(null), 1), None, "sess", &no_cancel()).await.unwrap();
    assert!(resp.is_success());
}

#[tokio::test]
async fn a_pre_cancelled_job_aborts_script_execution() {
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = make_dispatcher(dir.path());
    dispatcher
        .dispatch(req("create_project", json!({ "name": "demo" }), 1), None, "sess", &no_cancel())
        .await
        .unwrap();
    let cancel = Arc::new(AtomicBool::new(true));
    let resp = dispatcher
        .dispatch(req("execute_script", json!({ "script": "add_voxel 0 0 0 1 1 1 1" }), 2), None, "sess", &cancel)
        .await
        .unwrap();
    assert!(resp.error.is_some());
}
