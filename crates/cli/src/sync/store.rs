// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote store abstraction.
//!
//! The remote store is an opaque append-only collection with insert-one,
//! insert-batch and select-by-predicate. This trait keeps the reconciler
//! independent of where that collection lives:
//! - [`SqliteStore`] for a collection file (local disk or a network share)
//! - mock stores for unit testing

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Mutex;

use cb_core::{Database, RowQuery, TransactionRow};

/// Error type for remote store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached.
    #[error("store unreachable: {0}")]
    Unreachable(String),

    /// The store was reached but refused the operation.
    #[error("store rejected operation: {0}")]
    Rejected(String),
}

/// Result type for remote store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Boxed future returned by store operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Remote transaction collection.
pub trait RemoteStore: Send + Sync {
    /// Insert one row and return it with the store-assigned id.
    fn insert_one(&self, row: TransactionRow) -> StoreFuture<'_, StoreResult<TransactionRow>>;

    /// Insert several rows, reporting an outcome per row in input order.
    fn insert_batch(
        &self,
        rows: Vec<TransactionRow>,
    ) -> StoreFuture<'_, Vec<StoreResult<TransactionRow>>>;

    /// Select matching rows ordered by timestamp, newest first.
    fn select(&self, query: RowQuery) -> StoreFuture<'_, StoreResult<Vec<TransactionRow>>>;

    /// Check that the store is reachable.
    fn ping(&self) -> StoreFuture<'_, StoreResult<()>>;
}

/// Remote store backed by a SQLite collection file.
///
/// The file is opened lazily. If its directory is missing (an unmounted
/// share, a removed drive) the store reports itself unreachable rather than
/// creating it.
pub struct SqliteStore {
    path: PathBuf,
    db: Mutex<Option<Database>>,
}

impl SqliteStore {
    pub fn new(path: &Path) -> Self {
        SqliteStore {
            path: path.to_path_buf(),
            db: Mutex::new(None),
        }
    }

    fn with_db<T>(&self, f: impl FnOnce(&Database) -> cb_core::Result<T>) -> StoreResult<T> {
        let mut guard = self.db.lock().unwrap_or_else(|e| e.into_inner());
        if guard.is_none() {
            let parent_missing = self
                .path
                .parent()
                .is_some_and(|p| !p.as_os_str().is_empty() && !p.is_dir());
            if parent_missing {
                return Err(StoreError::Unreachable(format!(
                    "{} is not reachable",
                    self.path.display()
                )));
            }
            let db = Database::open(&self.path)
                .map_err(|e| StoreError::Unreachable(e.to_string()))?;
            *guard = Some(db);
        }
        match guard.as_ref() {
            Some(db) => f(db).map_err(|e| classify(&e)),
            None => Err(StoreError::Unreachable("store not open".to_string())),
        }
    }
}

fn classify(err: &cb_core::Error) -> StoreError {
    if err.is_unavailable() {
        StoreError::Unreachable(err.to_string())
    } else {
        StoreError::Rejected(err.to_string())
    }
}

impl RemoteStore for SqliteStore {
    fn insert_one(&self, row: TransactionRow) -> StoreFuture<'_, StoreResult<TransactionRow>> {
        Box::pin(async move { self.with_db(|db| db.insert(&row)) })
    }

    fn insert_batch(
        &self,
        rows: Vec<TransactionRow>,
    ) -> StoreFuture<'_, Vec<StoreResult<TransactionRow>>> {
        Box::pin(async move {
            let outcome = self.with_db(|db| Ok(db.insert_batch(&rows)));
            match outcome {
                Ok(results) => results
                    .into_iter()
                    .map(|r| r.map_err(|e| classify(&e)))
                    .collect(),
                Err(e) => rows.iter().map(|_| Err(e.clone())).collect(),
            }
        })
    }

    fn select(&self, query: RowQuery) -> StoreFuture<'_, StoreResult<Vec<TransactionRow>>> {
        Box::pin(async move { self.with_db(|db| db.select(&query)) })
    }

    fn ping(&self) -> StoreFuture<'_, StoreResult<()>> {
        Box::pin(async move { self.with_db(|db| db.count().map(|_| ())) })
    }
}

/// Stand-in store for installations with no remote configured.
///
/// Every operation fails as unreachable, so records stay queued.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedStore;

impl DetachedStore {
    fn unreachable() -> StoreError {
        StoreError::Unreachable("no remote store configured".to_string())
    }
}

impl RemoteStore for DetachedStore {
    fn insert_one(&self, _row: TransactionRow) -> StoreFuture<'_, StoreResult<TransactionRow>> {
        Box::pin(async { Err(Self::unreachable()) })
    }

    fn insert_batch(
        &self,
        rows: Vec<TransactionRow>,
    ) -> StoreFuture<'_, Vec<StoreResult<TransactionRow>>> {
        Box::pin(async move { rows.iter().map(|_| Err(Self::unreachable())).collect() })
    }

    fn select(&self, _query: RowQuery) -> StoreFuture<'_, StoreResult<Vec<TransactionRow>>> {
        Box::pin(async { Err(Self::unreachable()) })
    }

    fn ping(&self) -> StoreFuture<'_, StoreResult<()>> {
        Box::pin(async { Err(Self::unreachable()) })
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
