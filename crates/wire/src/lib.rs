// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON-RPC 2.0 wire format for daemon communication.
//!
//! Framing: newline-delimited JSON, depth- and string-state-aware so a
//! frame may contain embedded, pretty-printed newlines (see [`codec`]).

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod codec;
pub mod error;
pub mod id;
pub mod method;
pub mod params;
pub mod request;
pub mod response;

pub use codec::{encode_batch, encode_response, parse_frame, Framer, ParsedFrame};
pub use error::RpcError;
pub use id::Id;
pub use method::{canonicalize, is_known_method, METHODS};
pub use params::Params;
pub use request::{JsonRpcVersion, RawRequest, Request};
pub use response::RawResponse;
