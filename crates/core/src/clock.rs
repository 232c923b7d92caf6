// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction so ingestion timestamps are testable

use chrono::{DateTime, SecondsFormat, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Source of monotonic and wall-clock time.
pub trait Clock: Clone + Send + Sync + 'static {
    /// Monotonic instant, for measuring elapsed time
    fn now(&self) -> Instant;

    /// Wall-clock milliseconds since the Unix epoch
    fn epoch_ms(&self) -> u64;

    /// Wall-clock time as an RFC 3339 / ISO 8601 UTC string with millisecond precision.
    fn rfc3339(&self) -> String {
        let ms = i64::try_from(self.epoch_ms()).unwrap_or(i64::MAX);
        DateTime::<Utc>::from_timestamp_millis(ms)
            .unwrap_or_default()
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// Real system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn epoch_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

struct FakeClockState {
    base: Instant,
    offset: Duration,
    epoch_ms: u64,
}

/// Manually driven clock for tests.
///
/// Starts at 2026-01-01T00:00:00Z. Clones share the same time.
#[derive(Clone)]
pub struct FakeClock {
    inner: Arc<Mutex<FakeClockState>>,
}

impl FakeClock {
    pub const START_EPOCH_MS: u64 = 1_767_225_600_000;

    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeClockState {
                base: Instant::now(),
                offset: Duration::ZERO,
                epoch_ms: Self::START_EPOCH_MS,
            })),
        }
    }

    /// Move both monotonic and wall-clock time forward.
    pub fn advance(&self, by: Duration) {
        let mut inner = self.inner.lock();
        inner.offset += by;
        inner.epoch_ms += by.as_millis() as u64;
    }

    pub fn set_epoch_ms(&self, epoch_ms: u64) {
        self.inner.lock().epoch_ms = epoch_ms;
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        let inner = self.inner.lock();
        inner.base + inner.offset
    }

    fn epoch_ms(&self) -> u64 {
        self.inner.lock().epoch_ms
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
