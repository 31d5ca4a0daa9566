// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Time sources for record timestamps and logical dates.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use chrono::{Local, NaiveDate, Utc};

/// Source of creation timestamps and the current logical day.
///
/// This allows injecting a fixed clock for testing.
pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> i64;

    /// The calendar day new records belong to by default.
    fn today(&self) -> NaiveDate;
}

/// Wall clock that never repeats a millisecond within one process.
///
/// Pending ids are derived from timestamps, so two records created in the
/// same millisecond must still get distinct values.
#[derive(Debug, Default)]
pub struct SystemClock {
    last_ms: Mutex<i64>,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        let physical = Utc::now().timestamp_millis();
        let mut last = self.last_ms.lock().unwrap_or_else(|e| e.into_inner());
        let next = if physical > *last { physical } else { *last + 1 };
        *last = next;
        next
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Manually driven clock. Each call to `now_ms` advances by one millisecond.
#[derive(Debug)]
pub struct FixedClock {
    next_ms: AtomicI64,
    today: NaiveDate,
}

impl FixedClock {
    pub fn new(start_ms: i64, today: NaiveDate) -> Self {
        FixedClock { next_ms: AtomicI64::new(start_ms), today }
    }

    /// Moves the clock forward without handing out a timestamp.
    pub fn advance(&self, ms: i64) {
        self.next_ms.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_ms(&self) -> i64 {
        self.next_ms.fetch_add(1, Ordering::SeqCst)
    }

    fn today(&self) -> NaiveDate {
        self.today
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
