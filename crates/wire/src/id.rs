// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The JSON-RPC 2.0 request/response identifier.

use serde::{Deserialize, Serialize};

/// A JSON-RPC `id`: a string, a number, or null per JSON-RPC 2.0.
/// Structural equality (not numeric equality) is what matters for matching
/// a response back to its request — `1` and `"1"` are distinct ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Number(i64),
    String(String),
    Null,
}

impl Id {
    pub fn is_null(&self) -> bool {
        matches!(self, Id::Null)
    }
}

impl From<i64> for Id {
    fn from(n: i64) -> Self {
        Id::Number(n)
    }
}

impl From<String> for Id {
    fn from(s: String) -> Self {
        Id::String(s)
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Id::String(s.to_string())
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
