// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The on-wire JSON-RPC 2.0 request object.

use serde::{Deserialize, Serialize};

use crate::id::Id;
use crate::params::Params;

/// One JSON-RPC 2.0 request as it appears on the wire, before the method
/// registry has validated `params` against a method's schema.
///
/// `id` is absent for notifications — callers distinguish "notification"
/// from "request with id" via [`RawRequest::id`] being `None`, not via
/// [`Id::Null`] (an explicit JSON `null` id is a valid, if unusual, request
/// id and is preserved as such).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRequest {
    pub jsonrpc: JsonRpcVersion,
    pub method: String,
    #[serde(default, skip_serializing_if = "Params::is_none")]
    pub params: Params,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
}

impl RawRequest {
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// Marker type enforcing the literal `"jsonrpc": "2.0"` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JsonRpcVersion;

impl Serialize for JsonRpcVersion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str("2.0")
    }
}

impl<'de> Deserialize<'de> for JsonRpcVersion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if s == "2.0" {
            Ok(JsonRpcVersion)
        } else {
            Err(serde::de::Error::custom(format!("unsupported jsonrpc version: {s}")))
        }
    }
}

/// A request after method-registry validation: an independently-owned,
/// fully-typed unit of work, carrying the connection and deadline context
/// the worker pool needs but that never appeared on the wire.
#[derive(Debug, Clone)]
pub struct Request {
    pub id: Option<Id>,
    pub method: String,
    pub params: Params,
    pub deadline: Option<std::time::Instant>,
    pub origin: u64,
}

impl Request {
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
