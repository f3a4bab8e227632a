// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn feeds_and_drains_single_frame() {
    let mut framer = Framer::new();
    framer.feed(b"{\"jsonrpc\":\"2.0\",\"method\":\"ping\",\"id\":1}\n");
    let frame = framer.next_frame().unwrap();
    assert_eq!(frame, b"{\"jsonrpc\":\"2.0\",\"method\":\"ping\",\"id\":1}");
    assert_eq!(framer.buffered_len(), 0);
}

#[test]
fn partial_frame_yields_none() {
    let mut framer = Framer::new();
    framer.feed(b"{\"jsonrpc\":\"2.0\",\"method\":\"pi");
    assert!(framer.next_frame().is_none());
}

#[test]
fn embedded_newline_in_string_does_not_split_frame() {
    let mut framer = Framer::new();
    framer.feed(b"{\"jsonrpc\":\"2.0\",\"method\":\"echo\",\"params\":[\"a\\nb\"],\"id\":1}\n");
    let frame = framer.next_frame().unwrap();
    let parsed = parse_frame(&frame).unwrap();
    assert!(matches!(parsed, ParsedFrame::Single(_)));
}

#[test]
fn pretty_printed_frame_with_real_newlines_parses() {
    let mut framer = Framer::new();
    framer.feed(b"{\n  \"jsonrpc\": \"2.0\",\n  \"method\": \"ping\",\n  \"id\": 1\n}\n");
    let frame = framer.next_frame().unwrap();
    let parsed = parse_frame(&frame).unwrap();
    match parsed {
        ParsedFrame::Single(req) => assert_eq!(req.method, "ping"),
        _ => panic!("expected single request"),
    }
}

#[test]
fn multiple_frames_in_one_feed_drain_in_order() {
    let mut framer = Framer::new();
    framer.feed(b"{\"jsonrpc\":\"2.0\",\"method\":\"a\",\"id\":1}\n{\"jsonrpc\":\"2.0\",\"method\":\"b\",\"id\":2}\n");
    let first = framer.next_frame().unwrap();
    let second = framer.next_frame().unwrap();
    assert!(String::from_utf8(first).unwrap().contains("\"a\""));
    assert!(String::from_utf8(second).unwrap().contains("\"b\""));
    assert!(framer.next_frame().is_none());
}

#[test]
fn parse_frame_rejects_malformed_json() {
    let err = parse_frame(b"{oops}").unwrap_err();
    assert_eq!(err.code, crate::error::PARSE_ERROR);
}

#[test]
fn parse_frame_rejects_empty_batch() {
    let err = parse_frame(b"[]").unwrap_err();
    assert_eq!(err.code, crate::error::INVALID_REQUEST);
}

#[test]
fn parse_frame_batch_parses_each_entry_independently() {
    let batch = parse_frame(
        br#"[{"jsonrpc":"2.0","method":"a","id":1},{"not":"valid"}]"#,
    )
    .unwrap();
    match batch {
        ParsedFrame::Batch(entries) => {
            assert_eq!(entries.len(), 2);
            assert!(entries[0].is_ok());
            assert!(entries[1].is_err());
        }
        _ => panic!("expected batch"),
    }
}

#[test]
fn encode_response_is_newline_terminated() {
    let resp = RawResponse::ok(crate::id::Id::Number(1), serde_json::json!({}));
    let bytes = encode_response(&resp);
    assert_eq!(bytes.last(), Some(&b'\n'));
}
