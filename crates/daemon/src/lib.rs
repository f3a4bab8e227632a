// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! voxd: the headless voxel engine daemon.
//!
//! Wires the JSON-RPC 2.0 service described by `voxel-wire` onto a shared
//! engine instance, guarded so that exactly one operation touches the
//! scene at a time.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod artifacts;
pub mod config;
pub mod connection;
pub mod engine;
pub mod env;
pub mod listener;
pub mod rpc;
pub mod supervisor;
pub mod worker_pool;

pub use config::Config;
pub use engine::EngineGuard;
pub use supervisor::{Supervisor, SupervisorError};
