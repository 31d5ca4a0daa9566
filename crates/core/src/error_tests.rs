// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[parameterized(
    reserved_id = { Error::ReservedId("pending_42".into()), "pending_42" },
    corrupted = { Error::CorruptedData("bad decimal".into()), "bad decimal" },
    invalid_input = { Error::InvalidInput("not a date".into()), "not a date" },
    validation = { Error::Validation(ValidationError::InvalidDriverId), "invalid driver id" },
)]
fn error_display_contains(err: Error, expected: &str) {
    assert!(err.to_string().contains(expected));
}

#[test]
fn error_from_io() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: Error = io_err.into();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn error_from_json() {
    let json_err = serde_json::from_str::<()>("invalid").unwrap_err();
    let err: Error = json_err.into();
    assert!(matches!(err, Error::Json(_)));
}

#[test]
fn validation_error_is_transparent() {
    let err: Error = ValidationError::NegativeOrderTotal.into();
    assert_eq!(err.to_string(), "negative order total");
}

#[test]
fn io_errors_are_unavailable() {
    let err: Error = std::io::Error::other("share unmounted").into();
    assert!(err.is_unavailable());
}

#[test]
fn refusals_are_not_unavailable() {
    assert!(!Error::ReservedId("pending_1".into()).is_unavailable());
    assert!(!Error::CorruptedData("x".into()).is_unavailable());
}
