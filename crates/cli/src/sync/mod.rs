// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline-durable recording and sync of transactions.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ Reconciler  │────►│   Gateway   │────►│ RemoteStore │
//! │  (engine)   │◄────│  (typed)    │◄────│   (trait)   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!    │       ▲
//!    ▼       │
//! ┌─────────────┐     ┌─────────────┐
//! │   Pending   │     │Connectivity │
//! │    Queue    │     │   Monitor   │
//! └─────────────┘     └─────────────┘
//!        │                   ▲
//!        ▼                   │ probe
//! ┌─────────────┐     ┌─────────────┐
//! │ KeyValue    │     │ SyncRunner  │  (debounce, interval, requests)
//! │ Storage     │     └─────────────┘
//! └─────────────┘
//! ```
//!
//! # Features
//!
//! - Pending queue persisted under a single storage key, locked per update
//! - Submission falls back to the queue when offline or when a write fails
//! - Reads retry with linear backoff while online and degrade to the queue
//! - Merged view deduplicates records seen both pending and confirmed
//! - Debounced sync on reconnect, driven by message passing
//! - Injectable store and storage traits for testing

mod engine;
mod gateway;
mod monitor;
mod queue;
mod runner;
mod storage;
mod store;

pub use engine::{Reconciler, ReconcilerConfig, SyncFailure, SyncReport, SyncStatus};
pub use gateway::{DatabaseError, RemoteGateway, WriteOutcome};
pub use monitor::{probe, spawn_probe_task, ConnectivityMonitor, ConnectivityStatus};
pub use queue::{PendingQueue, QueueMatch, PENDING_TRANSACTIONS_KEY};
pub use runner::{RunnerConfig, RunnerError, SyncCommand, SyncHandle, SyncRunner};
pub use storage::{FileStorage, HeldLock, KeyValueStorage, MemoryStorage, StorageError};
pub use store::{DetachedStore, RemoteStore, SqliteStore, StoreError};

#[cfg(test)]
mod test_helpers;
