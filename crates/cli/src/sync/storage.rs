// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Key-value persistence for local state.
//!
//! Each key holds one serialized value. [`FileStorage`] keeps every key in
//! its own file and guards read-modify-write cycles with an exclusive file
//! lock, so a `watch` process and a one-shot command never lose each
//! other's writes. Named locks ([`KeyValueStorage::try_lock`]) let those
//! processes keep longer operations, such as a sync pass, exclusive.

use std::collections::{HashMap, HashSet};
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use fs2::FileExt;

/// Error type for local persistence.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The value would not fit in the configured quota.
    #[error("storage quota exceeded: {needed} bytes needed, {limit} allowed")]
    QuotaExceeded { needed: usize, limit: usize },

    /// Storage cannot be reached at all.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Callback for [`KeyValueStorage::update`]: receives the current value and
/// returns the value to store.
pub type UpdateFn<'a> = dyn FnMut(Option<String>) -> StorageResult<String> + 'a;

/// An exclusive named lock, released on drop.
pub struct HeldLock {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl HeldLock {
    fn new(release: impl FnOnce() + Send + 'static) -> Self {
        HeldLock {
            release: Some(Box::new(release)),
        }
    }
}

impl Drop for HeldLock {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

/// Synchronous key-value persistence.
pub trait KeyValueStorage: Send + Sync {
    /// Read the value for a key. Absent keys read as `None`.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Replace the value for a key.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Delete a key. Deleting an absent key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;

    /// Read-modify-write a key without letting another writer interleave.
    fn update(&self, key: &str, apply: &mut UpdateFn<'_>) -> StorageResult<()>;

    /// Take the named lock without waiting. `None` if someone else holds it,
    /// in this process or another one sharing the storage.
    fn try_lock(&self, name: &str) -> StorageResult<Option<HeldLock>>;
}

fn check_quota(quota: Option<usize>, value: &str) -> StorageResult<()> {
    match quota {
        Some(limit) if value.len() > limit => Err(StorageError::QuotaExceeded {
            needed: value.len(),
            limit,
        }),
        _ => Ok(()),
    }
}

/// File-per-key storage in a directory.
pub struct FileStorage {
    dir: PathBuf,
    quota: Option<usize>,
}

impl FileStorage {
    /// Open storage in the given directory, creating it if needed.
    pub fn open(dir: &Path) -> StorageResult<Self> {
        fs::create_dir_all(dir)?;
        Ok(FileStorage {
            dir: dir.to_path_buf(),
            quota: None,
        })
    }

    /// Limit the size of any single value, in bytes.
    pub fn with_quota(mut self, limit: usize) -> Self {
        self.quota = Some(limit);
        self
    }

    fn value_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn lock_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.lock"))
    }

    fn lock(&self, key: &str) -> StorageResult<File> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.lock_path(key))?;
        file.lock_exclusive()?;
        Ok(file)
    }

    fn read_unlocked(&self, key: &str) -> StorageResult<Option<String>> {
        match fs::read_to_string(self.value_path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write to a temp file, fsync, then rename over the old value.
    fn write_unlocked(&self, key: &str, value: &str) -> StorageResult<()> {
        check_quota(self.quota, value)?;
        let path = self.value_path(key);
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        {
            let mut file = File::create(&tmp)?;
            file.write_all(value.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let lock = self.lock(key)?;
        let value = self.read_unlocked(key);
        let _ = FileExt::unlock(&lock);
        value
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let lock = self.lock(key)?;
        let result = self.write_unlocked(key, value);
        let _ = FileExt::unlock(&lock);
        result
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let lock = self.lock(key)?;
        let result = match fs::remove_file(self.value_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        };
        let _ = FileExt::unlock(&lock);
        result
    }

    fn update(&self, key: &str, apply: &mut UpdateFn<'_>) -> StorageResult<()> {
        let lock = self.lock(key)?;
        let result = self
            .read_unlocked(key)
            .and_then(|current| apply(current))
            .and_then(|next| self.write_unlocked(key, &next));
        let _ = FileExt::unlock(&lock);
        result
    }

    fn try_lock(&self, name: &str) -> StorageResult<Option<HeldLock>> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.lock_path(name))?;
        match file.try_lock_exclusive() {
            Ok(()) => Ok(Some(HeldLock::new(move || {
                let _ = FileExt::unlock(&file);
            }))),
            Err(e) if e.kind() == fs2::lock_contended_error().kind() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process storage, used by tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
    locks: Arc<Mutex<HashSet<String>>>,
    quota: Option<usize>,
    unavailable: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the size of any single value, in bytes.
    pub fn with_quota(mut self, limit: usize) -> Self {
        self.quota = Some(limit);
        self
    }

    /// Storage whose every operation fails.
    pub fn unavailable() -> Self {
        MemoryStorage {
            unavailable: true,
            ..Self::default()
        }
    }

    fn check_available(&self) -> StorageResult<()> {
        if self.unavailable {
            return Err(StorageError::Unavailable("storage disabled".to_string()));
        }
        Ok(())
    }

    fn values(&self) -> StorageResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.check_available()?;
        Ok(self.values.lock().unwrap_or_else(|e| e.into_inner()))
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.values()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut values = self.values()?;
        check_quota(self.quota, value)?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.values()?.remove(key);
        Ok(())
    }

    fn update(&self, key: &str, apply: &mut UpdateFn<'_>) -> StorageResult<()> {
        let mut values = self.values()?;
        let next = apply(values.get(key).cloned())?;
        check_quota(self.quota, &next)?;
        values.insert(key.to_string(), next);
        Ok(())
    }

    fn try_lock(&self, name: &str) -> StorageResult<Option<HeldLock>> {
        self.check_available()?;
        let mut held = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        if !held.insert(name.to_string()) {
            return Ok(None);
        }
        let locks = Arc::clone(&self.locks);
        let name = name.to_string();
        Ok(Some(HeldLock::new(move || {
            locks
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .remove(&name);
        })))
    }
}

#[cfg(test)]
#[path = "storage_tests.rs"]
mod tests;
