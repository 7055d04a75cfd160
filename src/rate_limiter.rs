use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::SummarizerError;
use crate::rate_limit_config::RateLimitRule;

/// Source of the current time in milliseconds.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// Wall clock backed by `SystemTime`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

/// Outcome of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Denied { retry_after_secs: u64 },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed)
    }
}

/// Per-key window state
#[derive(Debug, Clone, Copy)]
struct WindowEntry {
    window_start: u64,
    count: u32,
}

/// Fixed-window request counter keyed by client.
///
/// Each key gets a window that opens on its first request and closes
/// `rule.window` later; up to `rule.max_requests` are admitted inside it.
/// Bursts straddling a window boundary can briefly see twice the nominal rate.
pub struct RateLimiter {
    rule: RateLimitRule,
    clock: Arc<dyn Clock>,
    windows: Mutex<HashMap<String, WindowEntry>>,
}

impl RateLimiter {
    pub fn new(rule: RateLimitRule) -> Self {
        Self::with_clock(rule, Arc::new(SystemClock))
    }

    pub fn with_clock(rule: RateLimitRule, clock: Arc<dyn Clock>) -> Self {
        Self {
            rule,
            clock,
            windows: Mutex::new(HashMap::new()),
        }
    }

    pub fn rule(&self) -> RateLimitRule {
        self.rule
    }

    /// Check and consume one request for `key` at the clock's current time.
    pub fn check_and_consume(&self, key: &str) -> Result<Decision, SummarizerError> {
        self.check_and_consume_at(key, self.clock.now_ms())
    }

    /// Check and consume one request for `key` at `now_ms`.
    ///
    /// The lookup and the update happen under a single lock so concurrent
    /// requests for the same key cannot both observe a free slot.
    pub fn check_and_consume_at(&self, key: &str, now_ms: u64) -> Result<Decision, SummarizerError> {
        let window_ms = self.rule.window_ms();
        let mut windows = self.lock()?;

        let entry = windows.entry(key.to_string()).or_insert(WindowEntry {
            window_start: now_ms,
            count: 0,
        });

        if now_ms.saturating_sub(entry.window_start) >= window_ms {
            entry.window_start = now_ms;
            entry.count = 0;
        }

        if entry.count >= self.rule.max_requests {
            let remaining_ms = (entry.window_start + window_ms).saturating_sub(now_ms);
            return Ok(Decision::Denied {
                retry_after_secs: remaining_ms.div_ceil(1000),
            });
        }

        entry.count += 1;
        Ok(Decision::Allowed)
    }

    /// Requests counted in the current window for `key`, if one is open.
    pub fn window_count(&self, key: &str) -> Result<Option<u32>, SummarizerError> {
        let now_ms = self.clock.now_ms();
        let window_ms = self.rule.window_ms();
        let windows = self.lock()?;

        Ok(windows
            .get(key)
            .filter(|entry| now_ms.saturating_sub(entry.window_start) < window_ms)
            .map(|entry| entry.count))
    }

    /// Drop entries whose window has elapsed. Returns how many were removed.
    pub fn purge_expired(&self) -> Result<usize, SummarizerError> {
        let now_ms = self.clock.now_ms();
        let window_ms = self.rule.window_ms();
        let mut windows = self.lock()?;

        let initial_count = windows.len();
        windows.retain(|_, entry| now_ms.saturating_sub(entry.window_start) < window_ms);

        Ok(initial_count - windows.len())
    }

    /// Number of keys currently tracked.
    pub fn tracked_clients(&self) -> Result<usize, SummarizerError> {
        Ok(self.lock()?.len())
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, WindowEntry>>, SummarizerError> {
        self.windows
            .lock()
            .map_err(|_| SummarizerError::Internal("Failed to acquire rate limiter lock".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::Duration;

    /// Clock that only moves when told to.
    #[derive(Default)]
    pub struct ManualClock(AtomicU64);

    impl ManualClock {
        pub fn at(ms: u64) -> Arc<Self> {
            Arc::new(Self(AtomicU64::new(ms)))
        }

        pub fn advance(&self, ms: u64) {
            self.0.fetch_add(ms, Ordering::SeqCst);
        }
    }

    impl Clock for ManualClock {
        fn now_ms(&self) -> u64 {
            self.0.load(Ordering::SeqCst)
        }
    }

    fn limiter(max: u32, clock: Arc<ManualClock>) -> RateLimiter {
        RateLimiter::with_clock(RateLimitRule::new(max, Duration::from_secs(60)), clock)
    }

    #[test]
    fn test_allows_up_to_max_then_denies() {
        let clock = ManualClock::at(1_000_000);
        let limiter = limiter(3, clock.clone());

        for _ in 0..3 {
            assert_eq!(limiter.check_and_consume("10.0.0.1").unwrap(), Decision::Allowed);
        }

        clock.advance(15_500);
        match limiter.check_and_consume("10.0.0.1").unwrap() {
            Decision::Denied { retry_after_secs } => {
                // 44.5s left in the window rounds up
                assert_eq!(retry_after_secs, 45);
            }
            Decision::Allowed => panic!("fourth request should be denied"),
        }
        assert_eq!(limiter.window_count("10.0.0.1").unwrap(), Some(3));
    }

    #[test]
    fn test_retry_after_is_within_window() {
        let clock = ManualClock::at(0);
        let limiter = limiter(1, clock.clone());

        assert!(limiter.check_and_consume("a").unwrap().is_allowed());
        match limiter.check_and_consume("a").unwrap() {
            Decision::Denied { retry_after_secs } => {
                assert!(retry_after_secs > 0);
                assert!(retry_after_secs <= 60);
            }
            Decision::Allowed => panic!("expected denial"),
        }

        clock.advance(59_999);
        assert_eq!(
            limiter.check_and_consume("a").unwrap(),
            Decision::Denied { retry_after_secs: 1 }
        );
    }

    #[test]
    fn test_window_reset_after_elapsed() {
        let clock = ManualClock::at(5_000);
        let limiter = limiter(2, clock.clone());

        assert!(limiter.check_and_consume("client").unwrap().is_allowed());
        assert!(limiter.check_and_consume("client").unwrap().is_allowed());
        assert!(!limiter.check_and_consume("client").unwrap().is_allowed());

        clock.advance(60_000);
        assert!(limiter.check_and_consume("client").unwrap().is_allowed());
        assert_eq!(limiter.window_count("client").unwrap(), Some(1));
    }

    #[test]
    fn test_explicit_timestamps() {
        let limiter = limiter(1, ManualClock::at(0));

        assert!(limiter.check_and_consume_at("k", 100).unwrap().is_allowed());
        assert_eq!(
            limiter.check_and_consume_at("k", 1_100).unwrap(),
            Decision::Denied { retry_after_secs: 59 }
        );
        assert!(limiter.check_and_consume_at("k", 60_100).unwrap().is_allowed());
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = limiter(1, ManualClock::at(0));

        assert!(limiter.check_and_consume("alice").unwrap().is_allowed());
        assert!(!limiter.check_and_consume("alice").unwrap().is_allowed());
        assert!(limiter.check_and_consume("bob").unwrap().is_allowed());
        assert_eq!(limiter.window_count("alice").unwrap(), Some(1));
        assert_eq!(limiter.window_count("bob").unwrap(), Some(1));
    }

    #[test]
    fn test_concurrent_requests_never_exceed_max() {
        let limiter = Arc::new(limiter(5, ManualClock::at(0)));

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                std::thread::spawn(move || limiter.check_and_consume("shared").unwrap().is_allowed())
            })
            .collect();

        let admitted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|allowed| *allowed)
            .count();
        assert_eq!(admitted, 5);
    }

    #[test]
    fn test_purge_expired() {
        let clock = ManualClock::at(0);
        let limiter = limiter(2, clock.clone());

        limiter.check_and_consume("old").unwrap();
        clock.advance(30_000);
        limiter.check_and_consume("fresh").unwrap();
        assert_eq!(limiter.tracked_clients().unwrap(), 2);

        clock.advance(30_000);
        assert_eq!(limiter.purge_expired().unwrap(), 1);
        assert_eq!(limiter.tracked_clients().unwrap(), 1);
        assert_eq!(limiter.window_count("old").unwrap(), None);
        assert_eq!(limiter.window_count("fresh").unwrap(), Some(1));
    }
}
