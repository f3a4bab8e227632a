// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The on-wire JSON-RPC 2.0 response object.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RpcError;
use crate::id::Id;
use crate::request::JsonRpcVersion;

/// One JSON-RPC 2.0 response. `result` and `error` are mutually exclusive;
/// that invariant is enforced by [`RawResponse::ok`] / [`RawResponse::err`]
/// rather than by the type (a hand-rolled tagged representation would not
/// round-trip the exact wire shape other JSON-RPC implementations expect).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawResponse {
    pub jsonrpc: JsonRpcVersion,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
    pub id: Id,
}

impl RawResponse {
    pub fn ok(id: Id, result: Value) -> Self {
        Self { jsonrpc: JsonRpcVersion, result: Some(result), error: None, id }
    }

    pub fn err(id: Id, error: RpcError) -> Self {
        Self { jsonrpc: JsonRpcVersion, result: None, error: Some(error), id }
    }

    /// A parse-error response, for which the request id could not be
    /// determined; carries `id: null` per JSON-RPC 2.0.
    pub fn parse_error() -> Self {
        Self::err(Id::Null, RpcError::parse_error())
    }

    pub fn is_success(&self) -> bool {
        self.result.is_some()
    }
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
