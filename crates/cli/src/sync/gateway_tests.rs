// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::sync::test_helpers::{day, make_tx, make_tx_on, MockStore};
use yare::parameterized;

fn gateway() -> (Arc<MockStore>, RemoteGateway<MockStore>) {
    let store = Arc::new(MockStore::new());
    (Arc::clone(&store), RemoteGateway::new(store))
}

#[test]
fn to_row_translates_field_names() {
    let row = to_row(&make_tx_on(1234, 3, "2026-02-28"));
    assert_eq!(row.driver_id, 3);
    assert_eq!(row.date, "2026-02-28");
    assert_eq!(row.timestamp, 1234);
    assert!(row.id.is_none());
}

#[test]
fn to_row_drops_pending_id() {
    let queued = make_tx(1, 1).into_pending();
    assert!(to_row(&queued).id.is_none());
}

#[tokio::test]
async fn write_returns_confirmed_record() {
    let (store, gateway) = gateway();
    let input = make_tx(1000, 2).into_pending();

    let confirmed = gateway.write(&input).await.unwrap();
    assert!(!confirmed.is_pending);
    assert!(!confirmed.id.as_ref().unwrap().is_pending());
    assert_eq!(confirmed.key(), input.key());
    assert_eq!(confirmed.change_amount, input.change_amount);
    assert_eq!(store.rows().len(), 1);
}

#[parameterized(
    unreachable = { StoreError::Unreachable("down".into()), "unreachable" },
    rejected = { StoreError::Rejected("no".into()), "rejected" },
)]
fn store_errors_map_to_database_errors(err: StoreError, expected: &str) {
    let err: DatabaseError = err.into();
    assert!(err.to_string().contains(expected));
}

#[tokio::test]
async fn write_failure_is_database_error() {
    let store = Arc::new(MockStore::unreachable());
    let gateway = RemoteGateway::new(store);
    let err = gateway.write(&make_tx(1, 1)).await.unwrap_err();
    assert!(matches!(err, DatabaseError::Unreachable(_)));
}

#[tokio::test]
async fn write_batch_reports_per_record() {
    let (store, gateway) = gateway();
    store.fail_insert_at(2);
    let records = vec![make_tx(1, 1), make_tx(2, 2), make_tx(3, 3)];

    let outcomes = gateway.write_batch(&records).await;
    assert_eq!(outcomes.len(), 3);
    assert!(outcomes[0].result.is_ok());
    assert!(matches!(outcomes[1].result, Err(DatabaseError::Rejected(_))));
    assert!(outcomes[2].result.is_ok());
    assert_eq!(outcomes[1].record, records[1]);
    assert_eq!(store.batch_calls(), 1);
}

#[tokio::test]
async fn read_all_orders_newest_first() {
    let (store, gateway) = gateway();
    store.seed(&make_tx(2000, 1));
    store.seed(&make_tx(3000, 2));
    store.seed(&make_tx(1000, 3));

    let records = gateway.read_all(&TransactionFilter::all()).await.unwrap();
    let timestamps: Vec<i64> = records.iter().map(|r| r.timestamp).collect();
    assert_eq!(timestamps, vec![3000, 2000, 1000]);
    assert!(records.iter().all(|r| !r.is_pending));
}

#[tokio::test]
async fn read_all_applies_filter() {
    let (store, gateway) = gateway();
    store.seed(&make_tx_on(1, 1, "2026-03-01"));
    store.seed(&make_tx_on(2, 2, "2026-03-01"));
    store.seed(&make_tx_on(3, 1, "2026-03-02"));

    let by_date = gateway
        .read_all(&TransactionFilter::on_date(day("2026-03-01")))
        .await
        .unwrap();
    assert_eq!(by_date.len(), 2);

    let by_driver = gateway
        .read_all(&TransactionFilter::for_driver(1))
        .await
        .unwrap();
    assert_eq!(by_driver.len(), 2);
    assert!(by_driver.iter().all(|r| r.driver_id == 1));
}

#[tokio::test]
async fn read_all_rejects_pending_prefixed_rows() {
    let (store, gateway) = gateway();
    let mut row = to_row(&make_tx(1, 1));
    row.id = Some("pending_1".to_string());
    store.seed_row(row);

    let err = gateway.read_all(&TransactionFilter::all()).await.unwrap_err();
    assert!(matches!(err, DatabaseError::InvalidRecord(_)));
}

#[tokio::test]
async fn read_all_rejects_negative_driver() {
    let (store, gateway) = gateway();
    let mut row = to_row(&make_tx(1, 1));
    row.id = Some("tx-1".to_string());
    row.driver_id = -4;
    store.seed_row(row);

    let err = gateway.read_all(&TransactionFilter::all()).await.unwrap_err();
    assert!(matches!(err, DatabaseError::InvalidRecord(_)));
}

#[tokio::test]
async fn ping_reflects_store() {
    let (store, gateway) = gateway();
    assert!(gateway.ping().await.is_ok());
    store.set_unreachable(true);
    assert!(gateway.ping().await.is_err());
}
