use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::SummarizerError;

/// Point-in-time copy of the request counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub total_requests: u64,
    pub succeeded: u64,
    pub rate_limited: u64,
    pub rejected: u64,
    pub failed: u64,
    pub since: u64,
}

/// Counts summarize requests by outcome.
#[derive(Debug)]
pub struct MetricsCollector {
    total_requests: AtomicU64,
    succeeded: AtomicU64,
    rate_limited: AtomicU64,
    rejected: AtomicU64,
    failed: AtomicU64,
    since: u64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            total_requests: AtomicU64::new(0),
            succeeded: AtomicU64::new(0),
            rate_limited: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            since: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs(),
        }
    }

    pub fn record<T>(&self, outcome: &Result<T, SummarizerError>) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        let counter = match outcome {
            Ok(_) => &self.succeeded,
            Err(SummarizerError::RateLimited { .. }) => &self.rate_limited,
            Err(SummarizerError::Validation(_)) => &self.rejected,
            Err(_) => &self.failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            rate_limited: self.rate_limited.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            since: self.since,
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}
