use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Quota applied to every client key: at most `max_requests` per `window`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitRule {
    pub max_requests: u32,
    #[serde(with = "humantime_serde")]
    pub window: Duration,
}

impl Default for RateLimitRule {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window: Duration::from_secs(60),
        }
    }
}

impl RateLimitRule {
    /// Create a new rate limit rule
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
        }
    }

    /// Window length in milliseconds
    pub fn window_ms(&self) -> u64 {
        self.window.as_millis() as u64
    }

    /// Validate rule parameters
    pub fn validate(&self) -> Result<(), String> {
        if self.max_requests == 0 {
            return Err("Max requests per window must be greater than 0".to_string());
        }
        if self.window.is_zero() {
            return Err("Window size must be greater than 0".to_string());
        }
        Ok(())
    }
}
