// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sync scheduling.
//!
//! The [`SyncRunner`] is a single task that owns all sync triggers:
//! - connectivity transitions, debounced so a sync only starts after the
//!   connection has stayed up for the debounce window
//! - explicit requests from a [`SyncHandle`]
//! - an optional periodic timer while online
//!
//! Triggers arrive as messages, so at most one pass runs at a time and a
//! flapping connection only ever moves a single deadline.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::engine::{Reconciler, SyncReport, SyncStatus};
use super::monitor::ConnectivityStatus;
use super::store::RemoteStore;
use crate::error::TransactionError;

/// Messages accepted by the runner.
#[derive(Debug)]
pub enum SyncCommand {
    /// Sync immediately and reply with the report.
    SyncNow {
        reply: oneshot::Sender<Result<SyncReport, TransactionError>>,
    },
    /// Stop the runner.
    Shutdown,
}

/// Error returned by [`SyncHandle`] requests.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("sync runner has stopped")]
    Stopped,

    #[error(transparent)]
    Transaction(#[from] TransactionError),
}

/// Runner timing.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// How long connectivity must stay up before a sync starts.
    pub debounce: Duration,
    /// Periodic sync while online. `None` disables it.
    pub interval: Option<Duration>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        RunnerConfig {
            debounce: Duration::from_millis(1000),
            interval: None,
        }
    }
}

/// Handle for talking to a running [`SyncRunner`].
#[derive(Clone)]
pub struct SyncHandle {
    tx: mpsc::Sender<SyncCommand>,
    cancel_token: CancellationToken,
}

impl SyncHandle {
    /// Ask the runner to sync now and wait for the report.
    pub async fn request_sync(&self) -> Result<SyncReport, RunnerError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(SyncCommand::SyncNow { reply })
            .await
            .map_err(|_| RunnerError::Stopped)?;
        Ok(rx.await.map_err(|_| RunnerError::Stopped)??)
    }

    /// Ask the runner to stop after any pass in flight.
    pub async fn shutdown(&self) {
        if self.tx.send(SyncCommand::Shutdown).await.is_err() {
            tracing::debug!("sync runner already stopped");
        }
    }

    /// Token that stops the runner when cancelled.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }
}

/// Task that decides when to flush the pending queue.
pub struct SyncRunner<S: ?Sized> {
    reconciler: Arc<Reconciler<S>>,
    commands: mpsc::Receiver<SyncCommand>,
    connectivity: watch::Receiver<ConnectivityStatus>,
    config: RunnerConfig,
    /// When the debounced sync fires, if one is armed.
    debounce_deadline: Option<Instant>,
    interval: Option<Interval>,
    cancel_token: CancellationToken,
}

impl<S: RemoteStore + ?Sized> SyncRunner<S> {
    /// Create a runner and its handle.
    pub fn new(reconciler: Arc<Reconciler<S>>, config: RunnerConfig) -> (Self, SyncHandle) {
        let (tx, commands) = mpsc::channel(16);
        let cancel_token = CancellationToken::new();
        let connectivity = reconciler.monitor().subscribe();

        let runner = SyncRunner {
            reconciler,
            commands,
            connectivity,
            config,
            debounce_deadline: None,
            interval: None,
            cancel_token: cancel_token.clone(),
        };
        let handle = SyncHandle { tx, cancel_token };
        (runner, handle)
    }

    /// Run until shut down or cancelled.
    pub async fn run(mut self) {
        if self.connectivity.borrow_and_update().is_online() {
            self.arm_debounce();
        }
        if let Some(period) = self.config.interval.filter(|p| !p.is_zero()) {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            self.interval = Some(interval);
        }

        loop {
            let deadline = self.debounce_deadline;
            let periodic = self.interval.is_some() && self.connectivity.borrow().is_online();

            tokio::select! {
                _ = self.cancel_token.cancelled() => break,

                command = self.commands.recv() => match command {
                    Some(SyncCommand::SyncNow { reply }) => {
                        let result = self.sync_once("requested").await;
                        if reply.send(result).is_err() {
                            tracing::debug!("sync requester went away");
                        }
                    }
                    Some(SyncCommand::Shutdown) | None => break,
                },

                changed = self.connectivity.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let status = *self.connectivity.borrow_and_update();
                    if status.is_online() {
                        self.arm_debounce();
                    } else if self.debounce_deadline.take().is_some() {
                        tracing::debug!("connectivity lost, pending sync cancelled");
                    }
                }

                _ = sleep_until(deadline), if deadline.is_some() => {
                    self.debounce_deadline = None;
                    let _ = self.sync_once("reconnected").await;
                }

                _ = tick(self.interval.as_mut()), if periodic => {
                    let _ = self.sync_once("periodic").await;
                }
            }
        }

        tracing::debug!("sync runner stopped");
    }

    fn arm_debounce(&mut self) {
        self.debounce_deadline = Some(Instant::now() + self.config.debounce);
        tracing::debug!(debounce = ?self.config.debounce, "sync scheduled");
    }

    async fn sync_once(&self, trigger: &str) -> Result<SyncReport, TransactionError> {
        let result = self.reconciler.sync_pending_transactions().await;
        match &result {
            Ok(report) if report.status == SyncStatus::Completed => {
                tracing::info!(
                    trigger,
                    succeeded = report.succeeded,
                    failed = report.failed,
                    "sync pass finished"
                );
            }
            Ok(report) => tracing::debug!(trigger, status = ?report.status, "sync skipped"),
            Err(e) => tracing::error!(trigger, "sync failed: {}", e),
        }
        result
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

async fn tick(interval: Option<&mut Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
