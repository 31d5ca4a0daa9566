// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity monitoring.
//!
//! [`ConnectivityMonitor`] holds the current online/offline flag and fans
//! changes out to subscribers. The flag is fed either by the host (via
//! [`ConnectivityMonitor::set_online`]) or by a background probe task that
//! periodically pings the remote store through the gateway.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::gateway::RemoteGateway;
use super::store::RemoteStore;

/// Connectivity as reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityStatus {
    Online,
    Offline,
    /// Offline by operator choice; probes and host signals are ignored.
    ForcedOffline,
}

impl ConnectivityStatus {
    pub fn is_online(self) -> bool {
        self == ConnectivityStatus::Online
    }

    pub fn label(self) -> &'static str {
        match self {
            ConnectivityStatus::Online => "online",
            ConnectivityStatus::Offline => "offline",
            ConnectivityStatus::ForcedOffline => "offline (forced)",
        }
    }
}

/// Shared connectivity flag with change notification.
///
/// Cloning is cheap; all clones observe the same flag.
#[derive(Clone)]
pub struct ConnectivityMonitor {
    tx: Arc<watch::Sender<ConnectivityStatus>>,
}

impl ConnectivityMonitor {
    /// Create a monitor with the given initial state.
    pub fn new(online: bool) -> Self {
        let initial = if online {
            ConnectivityStatus::Online
        } else {
            ConnectivityStatus::Offline
        };
        let (tx, _rx) = watch::channel(initial);
        ConnectivityMonitor { tx: Arc::new(tx) }
    }

    /// Create a monitor pinned offline.
    pub fn forced_offline() -> Self {
        let (tx, _rx) = watch::channel(ConnectivityStatus::ForcedOffline);
        ConnectivityMonitor { tx: Arc::new(tx) }
    }

    pub fn status(&self) -> ConnectivityStatus {
        *self.tx.borrow()
    }

    pub fn is_online(&self) -> bool {
        self.status().is_online()
    }

    /// Record a connectivity observation.
    ///
    /// Returns true if the flag changed. Subscribers are only woken on a
    /// change, and a forced-offline monitor never changes.
    pub fn set_online(&self, online: bool) -> bool {
        let next = if online {
            ConnectivityStatus::Online
        } else {
            ConnectivityStatus::Offline
        };
        let changed = self.tx.send_if_modified(|current| {
            if *current == ConnectivityStatus::ForcedOffline || *current == next {
                return false;
            }
            *current = next;
            true
        });
        if changed {
            tracing::info!("connectivity changed: {}", next.label());
        }
        changed
    }

    /// Subscribe to connectivity changes.
    pub fn subscribe(&self) -> watch::Receiver<ConnectivityStatus> {
        self.tx.subscribe()
    }

    /// Resolves once connectivity is down, immediately if it already is.
    pub async fn wait_offline(&self) {
        let mut rx = self.subscribe();
        let closed = rx.wait_for(|status| !status.is_online()).await.is_err();
        if closed {
            std::future::pending::<()>().await;
        }
    }
}

/// Ping the store once and record the result. Returns the new online state.
pub async fn probe<S: RemoteStore + ?Sized>(
    monitor: &ConnectivityMonitor,
    gateway: &RemoteGateway<S>,
) -> bool {
    if monitor.status() == ConnectivityStatus::ForcedOffline {
        return false;
    }
    let online = match gateway.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!("connectivity probe failed: {}", e);
            false
        }
    };
    monitor.set_online(online);
    online
}

/// Spawn a task that probes the store every `interval` until cancelled.
pub fn spawn_probe_task<S: RemoteStore + ?Sized + 'static>(
    monitor: ConnectivityMonitor,
    gateway: RemoteGateway<S>,
    interval: Duration,
    cancel_token: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = cancel_token.cancelled() => return,
                _ = ticker.tick() => {
                    probe(&monitor, &gateway).await;
                }
            }
        }
    })
}

#[cfg(test)]
#[path = "monitor_tests.rs"]
mod tests;
