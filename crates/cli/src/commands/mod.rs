// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod add;
pub mod init;
pub mod list;
pub mod queue;
pub mod status;
pub mod summary;
pub mod sync;
#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;
pub mod watch;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cb_core::{SystemClock, Transaction};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::{find_work_dir, get_queue_dir, get_remote_path, Config};
use crate::env;
use crate::error::Result;
use crate::sync::{
    probe, ConnectivityMonitor, ConnectivityStatus, DetachedStore, PendingQueue, Reconciler,
    RemoteGateway, RemoteStore, SqliteStore,
};

/// Everything a command needs: configuration and the reconciler, which owns
/// the queue, the remote gateway and the connectivity monitor.
pub struct Session {
    pub work_dir: PathBuf,
    pub config: Config,
    /// Resolved remote collection, if one is configured.
    pub remote_path: Option<PathBuf>,
    pub reconciler: Arc<Reconciler<dyn RemoteStore>>,
}

impl Session {
    /// Open the project found from the current directory, honoring
    /// `CASHBOX_OFFLINE` and `CASHBOX_REMOTE`.
    pub fn open_current(offline: bool) -> Result<Self> {
        let work_dir = find_work_dir()?;
        Self::open_with(
            &work_dir,
            offline || env::force_offline(),
            env::remote_override(),
        )
    }

    /// Open the project in the given `.cashbox/` directory.
    pub fn open(work_dir: &Path, offline: bool) -> Result<Self> {
        Self::open_with(work_dir, offline, None)
    }

    /// The monitor starts offline; call [`Session::probe`] to find out
    /// whether the remote store is reachable. A forced-offline session never
    /// goes online.
    fn open_with(work_dir: &Path, offline: bool, remote_override: Option<PathBuf>) -> Result<Self> {
        let config = Config::load(work_dir)?;
        let queue = PendingQueue::open(&get_queue_dir(work_dir))?;

        let remote_path = remote_override.or_else(|| {
            config
                .remote
                .as_ref()
                .map(|remote| get_remote_path(work_dir, remote))
        });
        let store: Arc<dyn RemoteStore> = match &remote_path {
            Some(path) => Arc::new(SqliteStore::new(path)),
            None => Arc::new(DetachedStore),
        };

        let monitor = if offline {
            ConnectivityMonitor::forced_offline()
        } else {
            ConnectivityMonitor::new(false)
        };

        let reconciler = Arc::new(Reconciler::new(
            queue,
            RemoteGateway::new(store),
            monitor,
            Arc::new(SystemClock::new()),
            config.reconciler_config(),
        ));

        Ok(Session {
            work_dir: work_dir.to_path_buf(),
            config,
            remote_path,
            reconciler,
        })
    }

    pub fn monitor(&self) -> &ConnectivityMonitor {
        self.reconciler.monitor()
    }

    /// Ping the remote store once and update connectivity.
    pub async fn probe(&self) -> ConnectivityStatus {
        probe(self.monitor(), self.reconciler.gateway()).await;
        self.monitor().status()
    }
}

/// Format an amount with two decimal places.
pub(crate) fn money(amount: Decimal) -> String {
    format!("{:.2}", amount)
}

/// One line per transaction for text output.
pub(crate) fn format_transaction(tx: &Transaction) -> String {
    let id = tx
        .id
        .as_ref()
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string());
    let mut line = format!(
        "{}  {:<22} driver {:<3} total {:>9}  received {:>9}  change {:>9}",
        tx.date,
        id,
        tx.driver_id,
        money(tx.order_total),
        money(tx.amount_received),
        money(tx.change_amount),
    );
    if tx.is_pending {
        line.push_str("  [pending]");
    }
    line
}

pub(crate) fn write_json<T: Serialize + ?Sized>(out: &mut impl Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
