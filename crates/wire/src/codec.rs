// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Newline-delimited JSON-RPC 2.0 framing.
//!
//! Frames are terminated by a newline, but a newline *inside* a JSON string*
//! does not end the frame: the scanner tracks brace/bracket depth and
//! string-open state so that both pretty-printed and minified senders are
//! accepted. This is deliberately more permissive than "split on \n", which
//! breaks for any client that pretty-prints its JSON.

use serde_json::Value;

use crate::error::RpcError;
use crate::request::RawRequest;
use crate::response::RawResponse;

/// Incrementally scans a byte stream for complete top-level JSON frames.
///
/// Bytes are fed in with [`Framer::feed`]; complete frames are drained with
/// [`Framer::next_frame`]. The buffer only ever grows by what has not yet
/// been consumed — a drained frame's bytes (plus its terminating newline)
/// are removed from the front of the buffer.
#[derive(Debug, Default)]
pub struct Framer {
    buf: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct ScanState {
    depth: i32,
    in_string: bool,
    escaped: bool,
}

impl Framer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn buffered_len(&self) -> usize {
        self.buf.len()
    }

    /// Returns the next complete frame (bytes up to and including the
    /// terminating newline are consumed; the returned slice excludes it),
    /// or `None` if the buffer does not yet contain one.
    pub fn next_frame(&mut self) -> Option<Vec<u8>> {
        let end = scan_frame_end(&self.buf)?;
        let frame: Vec<u8> = self.buf[..end].to_vec();
        let consumed = if self.buf.get(end) == Some(&b'\n') { end + 1 } else { end };
        self.buf.drain(..consumed);
        Some(frame)
    }
}

/// Finds the index one past the last byte of the first complete top-level
/// JSON value in `buf`, or `None` if no complete value is buffered yet.
/// Leading whitespace (including stray newlines between frames) is skipped.
fn scan_frame_end(buf: &[u8]) -> Option<usize> {
    let mut state = ScanState::default();
    let mut started = false;
    let mut i = 0;
    while i < buf.len() {
        let b = buf[i];
        if !started {
            if b.is_ascii_whitespace() {
                i += 1;
                continue;
            }
            started = true;
        }
        if state.in_string {
            if state.escaped {
                state.escaped = false;
            } else if b == b'\\' {
                state.escaped = true;
            } else if b == b'"' {
                state.in_string = false;
            }
        } else {
            match b {
                b'"' => state.in_string = true,
                b'{' | b'[' => state.depth += 1,
                b'}' | b']' => {
                    state.depth -= 1;
                    if state.depth == 0 {
                        return Some(i + 1);
                    }
                }
                _ => {}
            }
        }
        i += 1;
    }
    None
}

/// A parsed frame: either a single request or a batch of requests. An empty
/// batch (`[]`) is invalid per JSON-RPC 2.0 and is reported as such by the
/// caller, not by this type.
#[derive(Debug)]
pub enum ParsedFrame {
    Single(RawRequest),
    Batch(Vec<Result<RawRequest, RpcError>>),
}

/// Parses one complete frame (as returned by [`Framer::next_frame`]) into
/// either a single request or a batch. Each element of a batch is parsed
/// independently so that one malformed entry doesn't invalidate the rest.
pub fn parse_frame(bytes: &[u8]) -> Result<ParsedFrame, RpcError> {
    let value: Value = serde_json::from_slice(bytes).map_err(|_| RpcError::parse_error())?;
    match value {
        Value::Array(items) => {
            if items.is_empty() {
                return Err(RpcError::invalid_request());
            }
            let parsed = items
                .into_iter()
                .map(|item| {
                    serde_json::from_value::<RawRequest>(item)
                        .map_err(|_| RpcError::invalid_request())
                })
                .collect();
            Ok(ParsedFrame::Batch(parsed))
        }
        other => {
            let req = serde_json::from_value::<RawRequest>(other)
                .map_err(|_| RpcError::invalid_request())?;
            Ok(ParsedFrame::Single(req))
        }
    }
}

/// Serializes one response as a single newline-terminated frame.
pub fn encode_response(resp: &RawResponse) -> Vec<u8> {
    let mut out = serde_json::to_vec(resp).expect("RawResponse always serializes");
    out.push(b'\n');
    out
}

/// Serializes a batch of responses (notifications already excluded by the
/// caller) as one newline-terminated JSON array frame.
pub fn encode_batch(responses: &[RawResponse]) -> Vec<u8> {
    let mut out = serde_json::to_vec(responses).expect("RawResponse always serializes");
    out.push(b'\n');
    out
}

#[cfg(test)]
#[path = "codec_tests.rs"]
mod tests;
