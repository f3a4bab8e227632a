// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use voxel_core::Color;

fn no_cancel() -> Arc<AtomicBool> {
    Arc::new(AtomicBool::new(false))
}

#[tokio::test]
async fn ping_returns_pong() {
    let guard = EngineGuard::new();
    let result = guard.submit(EngineOp::Ping, None, no_cancel()).await.unwrap();
    assert!(matches!(result, EngineOpResult::Pong));
}

#[tokio::test]
async fn create_project_resets_scene_atomically() {
    let guard = EngineGuard::new();
    guard
        .submit(
            EngineOp::AddVoxel { at: Coord::new(0, 0, 0), color: Color::opaque(1, 2, 3), layer_id: None },
            None,
            no_cancel(),
        )
        .await
        .unwrap();
    guard
        .submit(EngineOp::CreateProject { name: "fresh".into(), width: 16, height: 16, depth: 16 }, None, no_cancel())
        .await
        .unwrap();
    let voxel =
        guard.submit(EngineOp::GetVoxel { at: Coord::new(0, 0, 0), layer_id: None }, None, no_cancel()).await.unwrap();
    assert!(matches!(voxel, EngineOpResult::Voxel { exists: false, .. }));
}

#[tokio::test]
async fn past_deadline_short_circuits_without_touching_scene() {
    let guard = EngineGuard::new();
    let past = Instant::now() - std::time::Duration::from_secs(1);
    let err = guard
        .submit(
            EngineOp::AddVoxel { at: Coord::ORIGIN, color: Color::opaque(1, 1, 1), layer_id: None },
            Some(past),
            no_cancel(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::DeadlineExceeded));
    let voxel =
        guard.submit(EngineOp::GetVoxel { at: Coord::ORIGIN, layer_id: None }, None, no_cancel()).await.unwrap();
    assert!(matches!(voxel, EngineOpResult::Voxel { exists: false, .. }));
}

#[tokio::test]
async fn operations_are_serialized() {
    let guard = std::sync::Arc::new(EngineGuard::new());
    let mut handles = Vec::new();
    for i in 0..50 {
        let guard = std::sync::Arc::clone(&guard);
        handles.push(tokio::spawn(async move {
            guard
                .submit(
                    EngineOp::AddVoxel {
                        at: Coord::new(i, 0, 0),
                        color: Color::opaque(1, 1, 1),
                        layer_id: None,
                    },
                    None,
                    no_cancel(),
                )
                .await
        }));
    }
    for h in handles {
        h.await.unwrap().unwrap();
    }
    let bbox = guard.submit(EngineOp::GetBoundingBox, None, no_cancel()).await.unwrap();
    match bbox {
        EngineOpResult::BoundingBox(Some(b)) => assert_eq!(b.dimensions().0, 50),
        other => panic!("unexpected result: {other:?}"),
    }
}
