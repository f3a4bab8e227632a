// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The JSON-RPC 2.0 `params` member: positional, named, or absent.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// `params` is optional; when present it is either a JSON array (positional)
/// or a JSON object (named). Values here are fully owned — they are parsed
/// out of the incoming frame and never borrow from it, so the frame buffer
/// can be dropped immediately after parsing without invalidating a request
/// still in flight.
#[derive(Debug, Clone, PartialEq)]
pub enum Params {
    ByPosition(Vec<Value>),
    ByName(serde_json::Map<String, Value>),
    None,
}

impl Default for Params {
    fn default() -> Self {
        Params::None
    }
}

impl Params {
    /// Looks up a parameter by position (for `ByPosition`) or by key (for
    /// `ByName`). Returns `None` for `Params::None` or an out-of-range
    /// lookup.
    pub fn get(&self, index: usize, name: &str) -> Option<&Value> {
        match self {
            Params::ByPosition(v) => v.get(index),
            Params::ByName(m) => m.get(name),
            Params::None => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Params::None)
    }
}

impl Serialize for Params {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Params::ByPosition(v) => v.serialize(serializer),
            Params::ByName(m) => m.serialize(serializer),
            Params::None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Params {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = Value::deserialize(deserializer)?;
        match v {
            Value::Array(items) => Ok(Params::ByPosition(items)),
            Value::Object(map) => Ok(Params::ByName(map)),
            Value::Null => Ok(Params::None),
            other => Err(serde::de::Error::custom(format!(
                "params must be an array, object, or absent, got {other}"
            ))),
        }
    }
}

#[cfg(test)]
#[path = "params_tests.rs"]
mod tests;
