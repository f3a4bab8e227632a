// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

#[test]
#[serial]
fn state_dir_prefers_explicit_override() {
    std::env::set_var("VOXD_STATE_DIR", "/tmp/voxd-test-state");
    let dir = state_dir().unwrap();
    std::env::remove_var("VOXD_STATE_DIR");
    assert_eq!(dir, PathBuf::from("/tmp/voxd-test-state"));
}

#[test]
#[serial]
fn ipc_timeout_defaults_when_unset() {
    std::env::remove_var("VOXD_IPC_TIMEOUT_MS");
    assert_eq!(ipc_timeout(), Duration::from_secs(30));
}

#[test]
#[serial]
fn ipc_timeout_reads_override() {
    std::env::set_var("VOXD_IPC_TIMEOUT_MS", "1500");
    assert_eq!(ipc_timeout(), Duration::from_millis(1500));
    std::env::remove_var("VOXD_IPC_TIMEOUT_MS");
}
