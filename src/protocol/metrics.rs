use std::sync::atomic::{AtomicU64, Ordering};

/// Track decode metrics without external dependencies.
pub(crate) struct Metrics;

static BLOCKS_DECODED: AtomicU64 = AtomicU64::new(0);
static BLOCKS_REJECTED: AtomicU64 = AtomicU64::new(0);
static MESSAGES_ACCEPTED: AtomicU64 = AtomicU64::new(0);
static MESSAGES_SKIPPED: AtomicU64 = AtomicU64::new(0);

impl Metrics {
    #[inline]
    pub(crate) fn record_block(accepted: usize) {
        BLOCKS_DECODED.fetch_add(1, Ordering::Relaxed);
        MESSAGES_ACCEPTED.fetch_add(accepted as u64, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_rejected() {
        BLOCKS_REJECTED.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_skipped() {
        MESSAGES_SKIPPED.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn totals() -> MetricsSnapshot {
        MetricsSnapshot {
            blocks_decoded: BLOCKS_DECODED.load(Ordering::Relaxed),
            blocks_rejected: BLOCKS_REJECTED.load(Ordering::Relaxed),
            messages_accepted: MESSAGES_ACCEPTED.load(Ordering::Relaxed),
            messages_skipped: MESSAGES_SKIPPED.load(Ordering::Relaxed),
        }
    }
}

/// Process-wide decode counters.
#[must_use]
pub fn snapshot() -> MetricsSnapshot {
    Metrics::totals()
}

/// Lightweight snapshot of decode counters.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Blocks returned to callers
    pub blocks_decoded: u64,
    /// Blocks that failed to decode
    pub blocks_rejected: u64,
    /// Messages placed into returned blocks
    pub messages_accepted: u64,
    /// Messages dropped for a missing platform id or bad flags
    pub messages_skipped: u64,
}

impl MetricsSnapshot {
    /// Share of seen messages that were skipped, in percent.
    #[must_use]
    pub fn skip_rate_pct(&self) -> Option<u64> {
        let seen = self.messages_accepted + self.messages_skipped;
        if seen == 0 {
            return None;
        }
        Some(self.messages_skipped * 100 / seen)
    }
}
