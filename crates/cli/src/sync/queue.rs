// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Pending queue for transactions not yet confirmed by the remote store.
//!
//! The queue is a single storage key holding a JSON array of records in
//! insertion order. Every call re-reads persisted state, and every mutation
//! is a locked read-modify-write, so no caller ever works from a stale
//! in-memory copy.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use cb_core::{RecordId, Transaction};

use super::storage::{FileStorage, HeldLock, KeyValueStorage, StorageError};

/// Storage key holding the pending records.
pub const PENDING_TRANSACTIONS_KEY: &str = "pendingTransactions";

/// Lock held for the duration of a sync pass.
const SYNC_LOCK_NAME: &str = "sync";

/// Result type for queue operations.
pub type QueueResult<T> = Result<T, StorageError>;

/// How to find a queued record for removal.
///
/// Records get their synthetic id when queued, but records persisted before
/// that have none and are found by their `(timestamp, driver_id)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueMatch {
    Id(RecordId),
    Key { timestamp: i64, driver_id: u32 },
}

impl QueueMatch {
    /// Match by id when the record has one, otherwise by key.
    pub fn for_record(tx: &Transaction) -> Self {
        match &tx.id {
            Some(id) => QueueMatch::Id(id.clone()),
            None => QueueMatch::Key {
                timestamp: tx.timestamp,
                driver_id: tx.driver_id,
            },
        }
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        match self {
            QueueMatch::Id(id) => tx.id.as_ref() == Some(id),
            QueueMatch::Key {
                timestamp,
                driver_id,
            } => tx.timestamp == *timestamp && tx.driver_id == *driver_id,
        }
    }
}

/// Durable queue of pending transactions.
#[derive(Clone)]
pub struct PendingQueue {
    storage: Arc<dyn KeyValueStorage>,
}

impl PendingQueue {
    /// Create a queue over the given storage.
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        PendingQueue { storage }
    }

    /// Open a file-backed queue in the given directory.
    pub fn open(dir: &Path) -> QueueResult<Self> {
        let storage = FileStorage::open(dir)?;
        Ok(PendingQueue::new(Arc::new(storage)))
    }

    /// Read all queued records in insertion order.
    ///
    /// A missing or corrupt value reads as an empty queue.
    pub fn list(&self) -> QueueResult<Vec<Transaction>> {
        let stored = self.storage.get(PENDING_TRANSACTIONS_KEY)?;
        Ok(decode(stored.as_deref()))
    }

    /// Queue a record, marking it pending. Returns the stored record.
    ///
    /// The `pending_<timestamp>` id is checked against the queued records
    /// under the storage lock, so records queued in the same millisecond by
    /// different processes still get distinct ids.
    pub fn append(&self, tx: Transaction) -> QueueResult<Transaction> {
        let mut record = Some(tx);
        let mut queued = None;
        self.storage.update(PENDING_TRANSACTIONS_KEY, &mut |current| {
            let mut pending = decode(current.as_deref());
            if let Some(tx) = record.take() {
                let tx = with_unique_id(tx, &pending);
                queued = Some(tx.clone());
                pending.push(tx);
            }
            Ok(serde_json::to_string(&pending)?)
        })?;
        let queued = queued.ok_or_else(|| {
            StorageError::Unavailable("record was not queued".to_string())
        })?;
        tracing::debug!(id = ?queued.id, "queued pending transaction");
        Ok(queued)
    }

    /// Remove every record matching `identity`. Returns how many were removed.
    ///
    /// Removing an absent record is not an error.
    pub fn remove(&self, identity: &QueueMatch) -> QueueResult<usize> {
        let mut removed = 0;
        self.storage.update(PENDING_TRANSACTIONS_KEY, &mut |current| {
            let mut pending = decode(current.as_deref());
            let before = pending.len();
            pending.retain(|tx| !identity.matches(tx));
            removed = before - pending.len();
            Ok(serde_json::to_string(&pending)?)
        })?;
        if removed > 0 {
            tracing::debug!(?identity, removed, "removed pending transaction");
        }
        Ok(removed)
    }

    /// Take the cross-process sync lock. `None` while another pass holds it.
    pub fn try_lock_sync(&self) -> QueueResult<Option<HeldLock>> {
        self.storage.try_lock(SYNC_LOCK_NAME)
    }

    /// Drop all queued records.
    pub fn clear(&self) -> QueueResult<()> {
        self.storage.remove(PENDING_TRANSACTIONS_KEY)
    }

    /// Get the number of queued records.
    pub fn len(&self) -> QueueResult<usize> {
        Ok(self.list()?.len())
    }

    /// Check if the queue is empty.
    pub fn is_empty(&self) -> QueueResult<bool> {
        Ok(self.len()? == 0)
    }
}

/// Mark `tx` pending with an id no queued record uses.
fn with_unique_id(mut tx: Transaction, queued: &[Transaction]) -> Transaction {
    let taken: HashSet<&RecordId> = queued.iter().filter_map(|q| q.id.as_ref()).collect();
    let needs_id = tx.id.as_ref().is_none_or(|id| taken.contains(id));
    if needs_id {
        let mut stamp = tx.timestamp;
        while taken.contains(&RecordId::pending(stamp)) {
            stamp += 1;
        }
        tx.id = Some(RecordId::pending(stamp));
    }
    tx.into_pending()
}

fn decode(stored: Option<&str>) -> Vec<Transaction> {
    let Some(stored) = stored else {
        return Vec::new();
    };
    if stored.trim().is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Vec<Transaction>>(stored) {
        Ok(mut pending) => {
            for tx in &mut pending {
                tx.is_pending = true;
            }
            pending
        }
        Err(e) => {
            tracing::warn!("pending queue is corrupt, treating as empty: {}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
