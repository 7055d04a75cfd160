use serde::{Deserialize, Serialize};
use std::time::SystemTime;

use crate::handlers::AppState;
use crate::rate_limit_config::RateLimitRule;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub provider_model: String,
    pub rate_limit: RateLimitRule,
    pub tracked_clients: usize,
    pub stored_summaries: usize,
}

static START_TIME: std::sync::LazyLock<SystemTime> = std::sync::LazyLock::new(SystemTime::now);

/// Touch the start time so uptime counts from server startup.
pub fn mark_started() {
    std::sync::LazyLock::force(&START_TIME);
}

pub struct HealthChecker<'a> {
    state: &'a AppState,
}

impl<'a> HealthChecker<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    pub async fn check_health(&self) -> HealthStatus {
        let now = SystemTime::now();
        let uptime = now.duration_since(*START_TIME).unwrap_or_default().as_secs();

        // Lock or store failures degrade the report instead of failing it
        let tracked_clients = self.state.rate_limiter.tracked_clients();
        let stored_summaries = self.state.store.count().await;
        let status = if tracked_clients.is_ok() && stored_summaries.is_ok() {
            "healthy"
        } else {
            "degraded"
        };

        HealthStatus {
            status: status.to_string(),
            timestamp: now
                .duration_since(SystemTime::UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: uptime,
            provider_model: self.state.provider_model.clone(),
            rate_limit: self.state.rate_limiter.rule(),
            tracked_clients: tracked_clients.unwrap_or_default(),
            stored_summaries: stored_summaries.unwrap_or_default(),
        }
    }
}
