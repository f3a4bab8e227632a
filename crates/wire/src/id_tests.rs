// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn number_and_string_id_are_distinct() {
    assert_ne!(Id::from(1), Id::from("1"));
}

#[test]
fn null_is_null() {
    assert!(Id::Null.is_null());
    assert!(!Id::from(0).is_null());
}

#[test]
fn serializes_untagged() {
    assert_eq!(serde_json::to_string(&Id::Number(7)).unwrap(), "7");
    assert_eq!(serde_json::to_string(&Id::String("a".into())).unwrap(), "\"a\"");
    assert_eq!(serde_json::to_string(&Id::Null).unwrap(), "null");
}

#[test]
fn deserializes_untagged() {
    let n: Id = serde_json::from_str("42").unwrap();
    assert_eq!(n, Id::Number(42));
    let s: Id = serde_json::from_str("\"x\"").unwrap();
    assert_eq!(s, Id::String("x".into()));
    let null: Id = serde_json::from_str("null").unwrap();
    assert_eq!(null, Id::Null);
}
