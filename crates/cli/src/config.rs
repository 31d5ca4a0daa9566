// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Project configuration management.
//!
//! Configuration is stored in `.cashbox/config.toml` and includes:
//! - `[drivers]`: the valid driver id range
//! - `[remote]`: the path of the remote transaction collection (optional;
//!   if absent, every transaction stays pending)
//! - `[sync]`: debounce, retry and batching settings

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use cb_core::DriverRange;

use crate::error::{Error, Result};
use crate::sync::{ReconcilerConfig, RunnerConfig};

const WORK_DIR_NAME: &str = ".cashbox";
const CONFIG_FILE_NAME: &str = "config.toml";
const QUEUE_DIR_NAME: &str = "queue";
const LOG_FILE_NAME: &str = "cashbox.log";
const GITIGNORE_FILE_NAME: &str = ".gitignore";

/// Project configuration stored in `.cashbox/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub drivers: DriverRange,
    /// Remote collection (optional - if absent, runs in local-only mode).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<RemoteConfig>,
    #[serde(default)]
    pub sync: SyncSettings,
}

/// Remote collection configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Path to the collection file, absolute or relative to the project root.
    pub path: String,
}

/// Sync and retry tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    /// Stable connectivity required before a reconnect sync (default: 1000).
    pub debounce_ms: u64,
    /// Periodic sync while online in seconds (default: 0 = disabled).
    pub interval_secs: u64,
    /// Remote read attempts per call (default: 3).
    pub read_attempts: u32,
    /// Delay unit between read attempts in milliseconds (default: 1000).
    pub retry_base_delay_ms: u64,
    /// Flush the queue with one batch insert (default: false).
    pub batch: bool,
    /// Connectivity probe period for `watch` in seconds (default: 5).
    pub probe_interval_secs: u64,
}

impl Default for SyncSettings {
    fn default() -> Self {
        SyncSettings {
            debounce_ms: 1000,
            interval_secs: 0,
            read_attempts: 3,
            retry_base_delay_ms: 1000,
            batch: false,
            probe_interval_secs: 5,
        }
    }
}

impl SyncSettings {
    pub fn probe_interval(&self) -> Duration {
        Duration::from_secs(self.probe_interval_secs.max(1))
    }

    pub fn runner_config(&self) -> RunnerConfig {
        RunnerConfig {
            debounce: Duration::from_millis(self.debounce_ms),
            interval: (self.interval_secs > 0).then(|| Duration::from_secs(self.interval_secs)),
        }
    }
}

impl Config {
    /// Creates a new config with the given driver range and remote path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDriverRange`] if the range is empty.
    pub fn new(drivers: DriverRange, remote: Option<String>) -> Result<Self> {
        let config = Config {
            drivers,
            remote: remote.map(|path| RemoteConfig { path }),
            sync: SyncSettings::default(),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.drivers.min > self.drivers.max {
            return Err(Error::InvalidDriverRange(format!(
                "{}-{}",
                self.drivers.min, self.drivers.max
            )));
        }
        if let Some(remote) = &self.remote {
            if remote.path.trim().is_empty() {
                return Err(Error::Config("remote path cannot be empty".to_string()));
            }
        }
        Ok(())
    }

    /// Loads configuration from the given `.cashbox/` directory.
    pub fn load(work_dir: &Path) -> Result<Self> {
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        let content = fs::read_to_string(&config_path)
            .map_err(|e| Error::Config(format!("failed to read config: {}", e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to the given `.cashbox/` directory.
    pub fn save(&self, work_dir: &Path) -> Result<()> {
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn reconciler_config(&self) -> ReconcilerConfig {
        ReconcilerConfig {
            drivers: self.drivers,
            read_attempts: self.sync.read_attempts,
            retry_base_delay: Duration::from_millis(self.sync.retry_base_delay_ms),
            batch: self.sync.batch,
        }
    }
}

/// Parse a driver range written `MIN-MAX`.
pub fn parse_driver_range(value: &str) -> Result<DriverRange> {
    let invalid = || Error::InvalidDriverRange(value.to_string());
    let (min, max) = value.split_once('-').ok_or_else(invalid)?;
    let min: u32 = min.trim().parse().map_err(|_| invalid())?;
    let max: u32 = max.trim().parse().map_err(|_| invalid())?;
    if min > max {
        return Err(invalid());
    }
    Ok(DriverRange::new(min, max))
}

/// Find the .cashbox directory by walking up from the current directory
pub fn find_work_dir() -> Result<PathBuf> {
    let mut current = std::env::current_dir()?;
    loop {
        let work_dir = current.join(WORK_DIR_NAME);
        if work_dir.is_dir() {
            return Ok(work_dir);
        }
        if !current.pop() {
            return Err(Error::NotInitialized);
        }
    }
}

/// Resolve the remote collection path.
///
/// Relative paths are taken from the project root (the parent of `.cashbox/`).
pub fn get_remote_path(work_dir: &Path, remote: &RemoteConfig) -> PathBuf {
    let path = Path::new(&remote.path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        work_dir.parent().unwrap_or(work_dir).join(path)
    }
}

/// Directory holding the pending queue.
pub fn get_queue_dir(work_dir: &Path) -> PathBuf {
    work_dir.join(QUEUE_DIR_NAME)
}

/// Log file for long-running commands.
pub fn get_log_path(work_dir: &Path) -> PathBuf {
    work_dir.join(LOG_FILE_NAME)
}

/// Initialize a new .cashbox directory at the given path
pub fn init_work_dir(path: &Path, config: &Config) -> Result<PathBuf> {
    let work_dir = path.join(WORK_DIR_NAME);

    if work_dir.exists() {
        return Err(Error::AlreadyInitialized(work_dir.display().to_string()));
    }

    fs::create_dir_all(get_queue_dir(&work_dir))?;
    config.save(&work_dir)?;
    write_gitignore(&work_dir)?;

    Ok(work_dir)
}

/// Write a .gitignore file to the work directory.
///
/// The queue, logs and device id are per-installation state.
pub fn write_gitignore(work_dir: &Path) -> Result<()> {
    let gitignore_path = work_dir.join(GITIGNORE_FILE_NAME);
    let content = "# Pending transactions (per device)\nqueue/\n\n# Runtime state\ncashbox.log\ndevice_id\n";
    fs::write(&gitignore_path, content)?;
    Ok(())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
