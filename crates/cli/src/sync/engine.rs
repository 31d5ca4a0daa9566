// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Reconciliation of pending and confirmed transactions.
//!
//! The [`Reconciler`] ties the pending queue, the remote gateway and the
//! connectivity monitor together:
//!
//! - **Submission**: validated records go to the remote store when online.
//!   When offline, or when the write fails, they go to the pending queue
//!   instead. A submission never fails for connectivity reasons.
//! - **Reads**: the remote store is read with bounded, linearly backed-off
//!   retries while online, then merged with the queue. If every attempt
//!   fails the queue alone is returned.
//! - **Sync**: queued records are written one at a time (or as one batch)
//!   and removed from the queue individually as they are confirmed.
//!   Failures are reported, never raised.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use cb_core::{merge_views, Clock, DriverRange, NewTransaction, Transaction, TransactionFilter};
use chrono::NaiveDate;

use super::gateway::{DatabaseError, RemoteGateway};
use super::monitor::ConnectivityMonitor;
use super::queue::{PendingQueue, QueueMatch};
use super::store::RemoteStore;
use crate::error::TransactionError;

/// Tuning for the reconciler.
#[derive(Debug, Clone)]
pub struct ReconcilerConfig {
    /// Valid driver ids.
    pub drivers: DriverRange,
    /// Maximum remote read attempts per call.
    pub read_attempts: u32,
    /// Delay unit for read retries; attempt `n` waits `n * base`.
    pub retry_base_delay: Duration,
    /// Flush the queue with one batch insert instead of one write per record.
    pub batch: bool,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        ReconcilerConfig {
            drivers: DriverRange::default(),
            read_attempts: 3,
            retry_base_delay: Duration::from_millis(1000),
            batch: false,
        }
    }
}

/// How a sync pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// The queue was processed. Individual records may still have failed.
    Completed,
    /// Skipped because connectivity is down.
    Offline,
    /// Skipped because nothing was queued.
    Empty,
    /// Skipped because another pass is in flight.
    AlreadySyncing,
}

/// A queued record that could not be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncFailure {
    pub record: Transaction,
    pub error: DatabaseError,
}

/// Aggregate result of a sync pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub status: SyncStatus,
    pub succeeded: usize,
    pub failed: usize,
    pub failures: Vec<SyncFailure>,
}

impl SyncReport {
    fn skipped(status: SyncStatus) -> Self {
        SyncReport {
            status,
            succeeded: 0,
            failed: 0,
            failures: Vec::new(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Clears the syncing flag when a pass ends, however it ends.
struct SyncGuard<'a>(&'a AtomicBool);

impl Drop for SyncGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Coordinates submission, reads and sync over the queue and the remote store.
pub struct Reconciler<S: ?Sized> {
    queue: PendingQueue,
    gateway: RemoteGateway<S>,
    monitor: ConnectivityMonitor,
    clock: Arc<dyn Clock>,
    config: ReconcilerConfig,
    syncing: AtomicBool,
}

impl<S: RemoteStore + ?Sized> Reconciler<S> {
    pub fn new(
        queue: PendingQueue,
        gateway: RemoteGateway<S>,
        monitor: ConnectivityMonitor,
        clock: Arc<dyn Clock>,
        config: ReconcilerConfig,
    ) -> Self {
        Reconciler {
            queue,
            gateway,
            monitor,
            clock,
            config,
            syncing: AtomicBool::new(false),
        }
    }

    pub fn queue(&self) -> &PendingQueue {
        &self.queue
    }

    pub fn gateway(&self) -> &RemoteGateway<S> {
        &self.gateway
    }

    pub fn monitor(&self) -> &ConnectivityMonitor {
        &self.monitor
    }

    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    pub fn is_syncing(&self) -> bool {
        self.syncing.load(Ordering::Acquire)
    }

    /// Record a new transaction.
    ///
    /// Returns the confirmed record when the remote write succeeds, or the
    /// queued record tagged pending otherwise.
    ///
    /// # Errors
    ///
    /// `Validation` if the input breaks a domain rule (nothing is queued),
    /// `Storage` if the record could not be queued.
    pub async fn add_transaction(
        &self,
        input: NewTransaction,
    ) -> Result<Transaction, TransactionError> {
        let record = input.into_record(&self.config.drivers, self.clock.today(), self.clock.now_ms())?;

        if !self.monitor.is_online() {
            return Ok(self.queue.append(record)?);
        }

        match self.gateway.write(&record).await {
            Ok(confirmed) => {
                tracing::debug!(id = ?confirmed.id, "transaction confirmed");
                Ok(confirmed)
            }
            Err(e) => {
                tracing::warn!("remote write failed, queueing transaction: {}", e);
                Ok(self.queue.append(record)?)
            }
        }
    }

    /// Merged view of pending and confirmed records matching `filter`.
    ///
    /// Falls back to pending records only when the remote store cannot be
    /// read.
    pub async fn get_transactions(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, TransactionError> {
        let pending: Vec<Transaction> = self
            .queue
            .list()?
            .into_iter()
            .filter(|tx| filter.matches(tx))
            .collect();

        match self.read_with_retry(filter).await {
            Ok(confirmed) => Ok(merge_views(pending, confirmed)),
            Err(e) => {
                tracing::warn!("remote read failed, showing pending transactions only: {}", e);
                Ok(merge_views(pending, Vec::new()))
            }
        }
    }

    pub async fn get_all_transactions(&self) -> Result<Vec<Transaction>, TransactionError> {
        self.get_transactions(&TransactionFilter::all()).await
    }

    pub async fn get_transactions_by_date(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<Transaction>, TransactionError> {
        self.get_transactions(&TransactionFilter::on_date(date)).await
    }

    pub async fn get_transactions_by_driver(
        &self,
        driver_id: u32,
    ) -> Result<Vec<Transaction>, TransactionError> {
        self.get_transactions(&TransactionFilter::for_driver(driver_id)).await
    }

    /// Confirmed records only, read once with no fallback.
    ///
    /// # Errors
    ///
    /// `Network` if offline or the store cannot be reached, `Database` if
    /// the store refused the query or returned records that cannot be read.
    pub async fn fetch_remote(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, TransactionError> {
        if !self.monitor.is_online() {
            return Err(TransactionError::Network(DatabaseError::Unreachable(
                "offline".to_string(),
            )));
        }
        self.gateway
            .read_all(filter)
            .await
            .map_err(|e| match e {
                DatabaseError::Unreachable(_) => TransactionError::Network(e),
                DatabaseError::Rejected(_) | DatabaseError::InvalidRecord(_) => {
                    TransactionError::Database(e)
                }
            })
    }

    async fn read_with_retry(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, DatabaseError> {
        let attempts = self.config.read_attempts.max(1);
        let mut last_error = DatabaseError::Unreachable("offline".to_string());

        for attempt in 1..=attempts {
            if !self.monitor.is_online() {
                break;
            }
            match self.gateway.read_all(filter).await {
                Ok(records) => return Ok(records),
                Err(e) => {
                    tracing::debug!(attempt, "remote read failed: {}", e);
                    last_error = e;
                }
            }
            if attempt < attempts {
                tokio::select! {
                    _ = tokio::time::sleep(self.config.retry_base_delay * attempt) => {}
                    _ = self.monitor.wait_offline() => {
                        tracing::debug!(attempt, "went offline, abandoning read retries");
                        break;
                    }
                }
            }
        }
        Err(last_error)
    }

    /// Flush the pending queue to the remote store.
    ///
    /// Partial failures are reported in the returned [`SyncReport`] and the
    /// failed records stay queued.
    ///
    /// # Errors
    ///
    /// `Storage` if the queue itself cannot be read or updated.
    pub async fn sync_pending_transactions(&self) -> Result<SyncReport, TransactionError> {
        if self.syncing.swap(true, Ordering::AcqRel) {
            tracing::debug!("sync already in progress");
            return Ok(SyncReport::skipped(SyncStatus::AlreadySyncing));
        }
        let _guard = SyncGuard(&self.syncing);

        if !self.monitor.is_online() {
            return Ok(SyncReport::skipped(SyncStatus::Offline));
        }
        // Other processes sharing the queue (`watch` and a one-shot `sync`)
        // must not flush the same snapshot twice.
        let Some(_sync_lock) = self.queue.try_lock_sync()? else {
            tracing::debug!("sync in progress in another process");
            return Ok(SyncReport::skipped(SyncStatus::AlreadySyncing));
        };
        let pending = self.queue.list()?;
        if pending.is_empty() {
            return Ok(SyncReport::skipped(SyncStatus::Empty));
        }

        tracing::info!(count = pending.len(), batch = self.config.batch, "syncing pending transactions");
        let mut report = SyncReport::skipped(SyncStatus::Completed);
        if self.config.batch {
            for outcome in self.gateway.write_batch(&pending).await {
                self.settle(&mut report, outcome.record, outcome.result)?;
            }
        } else {
            for record in pending {
                let result = self.gateway.write(&record).await;
                self.settle(&mut report, record, result)?;
            }
        }
        report.failed = report.failures.len();

        tracing::info!(succeeded = report.succeeded, failed = report.failed, "sync finished");
        Ok(report)
    }

    /// Drop a confirmed record from the queue, or note the failure.
    fn settle(
        &self,
        report: &mut SyncReport,
        record: Transaction,
        result: Result<Transaction, DatabaseError>,
    ) -> Result<(), TransactionError> {
        match result {
            Ok(confirmed) => {
                self.queue.remove(&QueueMatch::for_record(&record))?;
                tracing::debug!(from = ?record.id, to = ?confirmed.id, "pending transaction confirmed");
                report.succeeded += 1;
            }
            Err(error) => {
                tracing::warn!(id = ?record.id, "failed to sync transaction: {}", error);
                report.failures.push(SyncFailure { record, error });
            }
        }
        Ok(())
    }

    pub fn pending_count(&self) -> Result<usize, TransactionError> {
        Ok(self.queue.len()?)
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
