//! Time sources for the ledger.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use yield_common::types::Timestamp;

/// Source of the current unix time in seconds.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        chrono::Utc::now().timestamp().max(0) as Timestamp
    }
}

/// Manually advanced clock. Clones share the same reading, so a test can keep
/// a handle while the ledger owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start)),
        }
    }

    /// Move time forward by `seconds`.
    pub fn advance(&self, seconds: u64) {
        let previous = self.now.fetch_add(seconds, Ordering::SeqCst);
        tracing::debug!(from = previous, seconds, "Clock advanced");
    }

    pub fn set(&self, timestamp: Timestamp) {
        self.now.store(timestamp, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.load(Ordering::SeqCst)
    }
}
