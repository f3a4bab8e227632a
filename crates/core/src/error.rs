// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors produced by the engine facade and engine guard.

use thiserror::Error;

/// A failure surfaced by the engine facade, the engine guard, or an
/// in-flight `execute_script` evaluation.
///
/// Each variant corresponds to a JSON-RPC application error code in the
/// `-32000..-32099` range; the mapping lives in `voxel-wire` so that this
/// crate stays free of wire-format concerns.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("project not found: {0}")]
    ProjectNotFound(String),

    #[error("invalid coordinates: {0:?}")]
    InvalidCoordinates(crate::coord::Coord),

    #[error("layer not found: {0}")]
    LayerNotFound(String),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("operation failed: {0}")]
    OperationFailed(String),

    #[error("resource exhausted: {0}")]
    ResourceExhausted(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("io error: {0}")]
    Io(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error("deadline exceeded")]
    DeadlineExceeded,

    #[error("script error: {0}")]
    Script(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<std::io::Error> for EngineError {
    fn from(e: std::io::Error) -> Self {
        EngineError::Io(e.to_string())
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
