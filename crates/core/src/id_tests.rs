// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use chrono::TimeZone;
use std::collections::HashSet;

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

#[test]
fn generate_id_format() {
    let id = generate_id(3, 1000, &at(1_700_000_000));
    assert!(id.starts_with("tx-"));
    assert_eq!(id.len(), 11);
    assert!(id[3..].chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn generate_id_is_deterministic() {
    assert_eq!(generate_id(1, 5, &at(10)), generate_id(1, 5, &at(10)));
    assert_ne!(generate_id(1, 5, &at(10)), generate_id(2, 5, &at(10)));
}

#[test]
fn generated_ids_never_use_pending_prefix() {
    let id = generate_id(1, 1, &at(1));
    assert!(!id.starts_with(crate::transaction::PENDING_ID_PREFIX));
}

#[test]
fn generate_unique_id_without_collision() {
    let base = generate_id(1, 1, &at(1));
    let id = generate_unique_id(1, 1, &at(1), |_| false);
    assert_eq!(id, base);
}

#[test]
fn generate_unique_id_appends_suffix() {
    let base = generate_id(1, 1, &at(1));
    let taken: HashSet<String> = [base.clone(), format!("{}-2", base)].into_iter().collect();
    let id = generate_unique_id(1, 1, &at(1), |candidate| taken.contains(candidate));
    assert_eq!(id, format!("{}-3", base));
}

#[test]
fn device_id_is_hex() {
    let id = generate_device_id(&Utc::now());
    assert_eq!(id.len(), 16);
    assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
}
