// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use chrono::NaiveDate;
use rust_decimal::Decimal;

fn record(driver_id: u32, timestamp: i64) -> Transaction {
    Transaction {
        id: None,
        driver_id,
        order_total: Decimal::new(1000, 2),
        amount_received: Decimal::new(2000, 2),
        change_amount: Decimal::new(1000, 2),
        date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
        timestamp,
        is_pending: false,
    }
}

fn pending(driver_id: u32, timestamp: i64) -> Transaction {
    record(driver_id, timestamp).into_pending()
}

fn confirmed(driver_id: u32, timestamp: i64, id: &str) -> Transaction {
    record(driver_id, timestamp).into_confirmed(RecordId::remote(id).unwrap())
}

fn timestamps(records: &[Transaction]) -> Vec<i64> {
    records.iter().map(|r| r.timestamp).collect()
}

#[test]
fn disjoint_sets_are_complete_and_sorted() {
    let p = vec![pending(1, 50), pending(2, 10), pending(3, 30)];
    let c = vec![confirmed(1, 40, "tx-a"), confirmed(2, 20, "tx-b")];

    let merged = merge_views(p, c);

    assert_eq!(merged.len(), 5);
    assert_eq!(timestamps(&merged), vec![50, 40, 30, 20, 10]);
}

#[test]
fn disjoint_sets_of_many_sizes() {
    for n in 0..6i64 {
        for m in 0..6i64 {
            let p: Vec<_> = (0..n).map(|i| pending(1, i * 2)).collect();
            let c: Vec<_> = (0..m).map(|i| confirmed(2, i * 2 + 1, &format!("tx-{i}"))).collect();
            let merged = merge_views(p, c);

            assert_eq!(merged.len() as i64, n + m);
            assert!(merged.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
        }
    }
}

#[test]
fn synced_but_unpruned_record_appears_once() {
    let p = vec![pending(1, 100)];
    let c = vec![confirmed(1, 100, "tx-remote")];

    let merged = merge_views(p, c);

    assert_eq!(merged.len(), 1);
    assert!(merged[0].is_pending);
    assert_eq!(merged[0].id, Some(RecordId::pending(100)));
}

#[test]
fn pending_sorts_ahead_of_confirmed_on_timestamp_tie() {
    let p = vec![pending(1, 100)];
    let c = vec![confirmed(2, 100, "tx-other")];

    let merged = merge_views(p, c);

    assert_eq!(merged.len(), 2);
    assert!(merged[0].is_pending);
    assert!(!merged[1].is_pending);
}

#[test]
fn duplicate_remote_ids_are_collapsed() {
    let c = vec![confirmed(1, 10, "tx-a"), confirmed(1, 10, "tx-a")];
    assert_eq!(merge_views(Vec::new(), c).len(), 1);
}

#[test]
fn distinct_remote_records_with_same_key_are_kept() {
    let c = vec![confirmed(1, 10, "tx-a"), confirmed(1, 10, "tx-b")];
    assert_eq!(merge_views(Vec::new(), c).len(), 2);
}

#[test]
fn duplicate_queue_entries_are_collapsed() {
    let p = vec![pending(1, 10), pending(1, 10)];
    assert_eq!(merge_views(p, Vec::new()).len(), 1);
}

#[test]
fn flags_follow_the_source_list() {
    let mut stale = record(1, 10);
    stale.is_pending = false;
    let mut wrong = confirmed(2, 20, "tx-x");
    wrong.is_pending = true;

    let merged = merge_views(vec![stale], vec![wrong]);

    assert!(!merged[0].is_pending);
    assert!(merged[1].is_pending);
}

#[test]
fn merge_is_idempotent() {
    let p = vec![pending(1, 30), pending(2, 10)];
    let c = vec![confirmed(1, 30, "tx-a"), confirmed(3, 20, "tx-b")];

    let once = merge_views(p.clone(), c.clone());
    let (again_p, again_c): (Vec<_>, Vec<_>) = once.iter().cloned().partition(|r| r.is_pending);
    let twice = merge_views(again_p, again_c);

    assert_eq!(once, twice);
}

#[test]
fn empty_inputs() {
    assert!(merge_views(Vec::new(), Vec::new()).is_empty());
}
