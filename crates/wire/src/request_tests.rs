// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn parses_minimal_request() {
    let raw: RawRequest =
        serde_json::from_str(r#"{"jsonrpc":"2.0","method":"ping","id":1}"#).unwrap();
    assert_eq!(raw.method, "ping");
    assert_eq!(raw.id, Some(Id::Number(1)));
    assert!(raw.params.is_none());
    assert!(!raw.is_notification());
}

#[test]
fn notification_has_no_id() {
    let raw: RawRequest =
        serde_json::from_str(r#"{"jsonrpc":"2.0","method":"ping"}"#).unwrap();
    assert!(raw.is_notification());
}

#[test]
fn explicit_null_id_is_not_a_notification() {
    let raw: RawRequest =
        serde_json::from_str(r#"{"jsonrpc":"2.0","method":"ping","id":null}"#).unwrap();
    assert!(!raw.is_notification());
    assert_eq!(raw.id, Some(Id::Null));
}

#[test]
fn rejects_wrong_jsonrpc_version() {
    let result: Result<RawRequest, _> =
        serde_json::from_str(r#"{"jsonrpc":"1.0","method":"ping","id":1}"#);
    assert!(result.is_err());
}

#[test]
fn parses_positional_and_named_params() {
    let positional: RawRequest = serde_json::from_str(
        r#"{"jsonrpc":"2.0","method":"add_voxel","params":[1,2,3],"id":1}"#,
    )
    .unwrap();
    assert!(matches!(positional.params, Params::ByPosition(_)));

    let named: RawRequest = serde_json::from_str(
        r#"{"jsonrpc":"2.0","method":"add_voxel","params":{"x":1},"id":1}"#,
    )
    .unwrap();
    assert!(matches!(named.params, Params::ByName(_)));
}

#[test]
fn round_trips_through_serialize() {
    let raw: RawRequest =
        serde_json::from_str(r#"{"jsonrpc":"2.0","method":"ping","id":1}"#).unwrap();
    let text = serde_json::to_string(&raw).unwrap();
    let reparsed: RawRequest = serde_json::from_str(&text).unwrap();
    assert_eq!(reparsed.method, "ping");
    assert_eq!(reparsed.id, Some(Id::Number(1)));
}
