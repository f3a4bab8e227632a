// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The JSON-RPC 2.0 error object and its mapping from [`voxel_core::EngineError`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use voxel_core::EngineError;

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;

pub const APP_PROJECT_NOT_FOUND: i64 = -32001;
pub const APP_INVALID_COORDINATES: i64 = -32002;
pub const APP_LAYER_NOT_FOUND: i64 = -32003;
pub const APP_UNSUPPORTED_FORMAT: i64 = -32004;
pub const APP_OPERATION_FAILED: i64 = -32005;
pub const APP_RESOURCE_EXHAUSTED: i64 = -32006;
pub const APP_PERMISSION_DENIED: i64 = -32007;
pub const APP_IO_ERROR: i64 = -32008;
pub const APP_CANCELLED: i64 = -32010;
pub const APP_DEADLINE_EXCEEDED: i64 = -32011;
pub const APP_SCRIPT_ERROR: i64 = -32020;

/// A JSON-RPC 2.0 error object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self { code, message: message.into(), data: None }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn parse_error() -> Self {
        Self::new(PARSE_ERROR, "Parse error")
    }

    pub fn invalid_request() -> Self {
        Self::new(INVALID_REQUEST, "Invalid Request")
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(METHOD_NOT_FOUND, format!("Method not found: {method}"))
    }

    pub fn invalid_params(offending: &str, expected: &str) -> Self {
        Self::new(INVALID_PARAMS, format!("Invalid params: {offending}"))
            .with_data(serde_json::json!({ "parameter": offending, "expected": expected }))
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(INTERNAL_ERROR, message.into())
    }
}

/// Maps an engine-domain failure to its JSON-RPC application error code.
impl From<&EngineError> for RpcError {
    fn from(e: &EngineError) -> Self {
        let code = match e {
            EngineError::ProjectNotFound(_) => APP_PROJECT_NOT_FOUND,
            EngineError::InvalidCoordinates(_) => APP_INVALID_COORDINATES,
            EngineError::LayerNotFound(_) => APP_LAYER_NOT_FOUND,
            EngineError::UnsupportedFormat(_) => APP_UNSUPPORTED_FORMAT,
            EngineError::OperationFailed(_) => APP_OPERATION_FAILED,
            EngineError::ResourceExhausted(_) => APP_RESOURCE_EXHAUSTED,
            EngineError::PermissionDenied(_) => APP_PERMISSION_DENIED,
            EngineError::Io(_) => APP_IO_ERROR,
            EngineError::Cancelled => APP_CANCELLED,
            EngineError::DeadlineExceeded => APP_DEADLINE_EXCEEDED,
            EngineError::Script(_) => APP_SCRIPT_ERROR,
            EngineError::Internal(_) => INTERNAL_ERROR,
        };
        RpcError::new(code, e.to_string())
    }
}

impl From<EngineError> for RpcError {
    fn from(e: EngineError) -> Self {
        RpcError::from(&e)
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
