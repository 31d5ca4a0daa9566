// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for sync module tests.

#![allow(clippy::unwrap_used)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use cb_core::{RowQuery, Transaction, TransactionRow};
use chrono::NaiveDate;
use rust_decimal::Decimal;

pub(crate) use super::gateway::to_row;
use super::store::{RemoteStore, StoreError, StoreFuture, StoreResult};

pub fn d(value: &str) -> Decimal {
    value.parse().unwrap()
}

pub fn day(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

/// A confirmed-shape record without an id, as produced by validation.
pub fn make_tx(timestamp: i64, driver_id: u32) -> Transaction {
    make_tx_on(timestamp, driver_id, "2026-03-01")
}

pub fn make_tx_on(timestamp: i64, driver_id: u32, date: &str) -> Transaction {
    Transaction {
        id: None,
        driver_id,
        order_total: d("10.00"),
        amount_received: d("20.00"),
        change_amount: d("10.00"),
        date: day(date),
        timestamp,
        is_pending: false,
    }
}

/// In-memory remote store with scriptable failures.
#[derive(Default)]
pub struct MockStore {
    rows: Mutex<Vec<TransactionRow>>,
    next_id: AtomicUsize,
    unreachable: AtomicBool,
    yield_on_insert: AtomicBool,
    fail_insert_at: Mutex<Option<usize>>,
    select_failures: AtomicUsize,
    inserts: AtomicUsize,
    selects: AtomicUsize,
    batches: AtomicUsize,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that fails every call as unreachable.
    pub fn unreachable() -> Self {
        let store = Self::default();
        store.set_unreachable(true);
        store
    }

    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    /// Yield to the scheduler before each insert, so concurrent callers
    /// interleave.
    pub fn yield_on_insert(&self) {
        self.yield_on_insert.store(true, Ordering::SeqCst);
    }

    /// Reject the n-th insert (1-based, counted across single and batch inserts).
    pub fn fail_insert_at(&self, n: usize) {
        *self.fail_insert_at.lock().unwrap() = Some(n);
    }

    /// Fail the next `n` selects as unreachable.
    pub fn fail_next_selects(&self, n: usize) {
        self.select_failures.store(n, Ordering::SeqCst);
    }

    /// Seed a confirmed row directly.
    pub fn seed(&self, tx: &Transaction) -> String {
        let id = format!("tx-{:08x}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let mut row = to_row(tx);
        row.id = Some(id.clone());
        self.rows.lock().unwrap().push(row);
        id
    }

    /// Seed a raw row, including ones a real store would never hold.
    pub fn seed_row(&self, row: TransactionRow) {
        self.rows.lock().unwrap().push(row);
    }

    pub fn rows(&self) -> Vec<TransactionRow> {
        self.rows.lock().unwrap().clone()
    }

    pub fn insert_calls(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    pub fn select_calls(&self) -> usize {
        self.selects.load(Ordering::SeqCst)
    }

    pub fn batch_calls(&self) -> usize {
        self.batches.load(Ordering::SeqCst)
    }

    fn check_reachable(&self) -> StoreResult<()> {
        if self.unreachable.load(Ordering::SeqCst) {
            Err(StoreError::Unreachable("mock store offline".to_string()))
        } else {
            Ok(())
        }
    }

    fn insert_row(&self, mut row: TransactionRow) -> StoreResult<TransactionRow> {
        let n = self.inserts.fetch_add(1, Ordering::SeqCst) + 1;
        self.check_reachable()?;
        if *self.fail_insert_at.lock().unwrap() == Some(n) {
            return Err(StoreError::Rejected(format!("insert {n} rejected")));
        }
        let id = format!("tx-{:08x}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        row.id = Some(id);
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }
}

impl RemoteStore for MockStore {
    fn insert_one(&self, row: TransactionRow) -> StoreFuture<'_, StoreResult<TransactionRow>> {
        Box::pin(async move {
            if self.yield_on_insert.load(Ordering::SeqCst) {
                tokio::task::yield_now().await;
            }
            self.insert_row(row)
        })
    }

    fn insert_batch(
        &self,
        rows: Vec<TransactionRow>,
    ) -> StoreFuture<'_, Vec<StoreResult<TransactionRow>>> {
        Box::pin(async move {
            self.batches.fetch_add(1, Ordering::SeqCst);
            rows.into_iter().map(|row| self.insert_row(row)).collect()
        })
    }

    fn select(&self, query: RowQuery) -> StoreFuture<'_, StoreResult<Vec<TransactionRow>>> {
        Box::pin(async move {
            self.selects.fetch_add(1, Ordering::SeqCst);
            self.check_reachable()?;
            let failing = self
                .select_failures
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if failing {
                return Err(StoreError::Unreachable("transient failure".to_string()));
            }
            let mut rows: Vec<TransactionRow> = self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|r| query.driver_id.is_none_or(|id| r.driver_id == id))
                .filter(|r| query.date_from.as_ref().is_none_or(|from| &r.date >= from))
                .filter(|r| query.date_to.as_ref().is_none_or(|to| &r.date <= to))
                .cloned()
                .collect();
            rows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            Ok(rows)
        })
    }

    fn ping(&self) -> StoreFuture<'_, StoreResult<()>> {
        Box::pin(async move { self.check_reachable() })
    }
}
