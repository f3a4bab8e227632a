// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::config::Config;

fn test_config(dir: &std::path::Path) -> Config {
    Config {
        socket_path: dir.join("voxd.sock"),
        pid_file: Some(dir.join("voxd.pid")),
        workers: Some(2),
        max_connections: 256,
        max_pending_per_connection: 64,
        max_frame_bytes: 64 * 1024 * 1024,
        shutdown_deadline_sec: 30,
        artifact_dir: dir.join("artifacts"),
        artifact_ttl_sec: 3600,
        artifact_cache_bytes: 1024 * 1024,
        artifact_cleanup_interval_sec: 300,
        script_timeout_default_ms: 30_000,
    }
}

#[tokio::test]
async fn start_creates_pid_file_and_artifact_dir() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let supervisor = Supervisor::start(&config).await.unwrap();
    assert!(config.pid_file.unwrap().exists());
    assert!(config.artifact_dir.exists());
    let snapshot = supervisor.health_snapshot();
    assert!(matches!(snapshot.mode, voxel_core::DaemonMode::Healthy));
}

#[tokio::test]
async fn second_start_against_same_pid_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let first = Supervisor::start(&config).await.unwrap();
    let err = Supervisor::start(&config).await.unwrap_err();
    assert!(matches!(err, SupervisorError::AlreadyRunning));
    drop(first);
}

#[tokio::test]
async fn overlong_socket_path_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path());
    config.socket_path = dir.path().join("a".repeat(200));
    config.pid_file = None;
    let err = Supervisor::start(&config).await.unwrap_err();
    assert!(matches!(err, SupervisorError::PathTooLong(_)));
}

#[tokio::test]
async fn finish_shutdown_removes_pid_file_and_socket() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    std::fs::write(&config.socket_path, b"").unwrap();
    let pid_path = config.pid_file.clone().unwrap();
    let supervisor = Supervisor::start(&config).await.unwrap();
    supervisor.finish_shutdown();
    assert!(!pid_path.exists());
    assert!(!config.socket_path.exists());
}

#[tokio::test]
async fn degraded_engine_reflects_in_health_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let supervisor = Supervisor::start(&config).await.unwrap();
    supervisor.mark_degraded();
    let snapshot = supervisor.health_snapshot();
    assert!(matches!(snapshot.mode, voxel_core::DaemonMode::Degraded));
}
