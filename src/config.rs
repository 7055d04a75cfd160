use envconfig::Envconfig;
use std::net::SocketAddr;
use std::time::Duration;

use crate::rate_limit_config::RateLimitRule;

#[derive(Debug, Envconfig, Clone)]
pub struct Config {
    /// Server bind address
    #[envconfig(from = "BIND_ADDR", default = "0.0.0.0:5000")]
    pub bind_addr: SocketAddr,

    /// API key for the text generation provider
    #[envconfig(from = "OPENAI_API_KEY", default = "")]
    pub openai_api_key: String,

    /// Base URL of the chat completion API
    #[envconfig(from = "OPENAI_BASE_URL", default = "https://api.openai.com/v1")]
    pub openai_base_url: String,

    /// Model used for all three analysis calls
    #[envconfig(from = "OPENAI_MODEL", default = "gpt-4o")]
    pub openai_model: String,

    /// Requests allowed per client per window
    #[envconfig(from = "RATE_LIMIT_MAX_REQUESTS", default = "10")]
    pub rate_limit_max_requests: u32,

    /// Rate limit window length in seconds
    #[envconfig(from = "RATE_LIMIT_WINDOW_SECS", default = "60")]
    pub rate_limit_window_secs: u64,

    /// Timeout for each provider call in seconds
    #[envconfig(from = "PROVIDER_TIMEOUT_SECS", default = "30")]
    pub provider_timeout_secs: u64,

    /// Issue the three provider calls concurrently
    #[envconfig(from = "PARALLEL_ANALYSIS", default = "false")]
    pub parallel_analysis: bool,

    /// Derive client keys from proxy headers
    #[envconfig(from = "TRUST_FORWARDED_HEADERS", default = "true")]
    pub trust_forwarded_headers: bool,

    /// Rate limiter cleanup interval in seconds
    #[envconfig(from = "CLEANUP_INTERVAL", default = "300")]
    pub cleanup_interval_secs: u64,

    /// Log level used when RUST_LOG is not set
    #[envconfig(from = "LOG_LEVEL", default = "info")]
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, envconfig::Error> {
        Config::init_from_env()
    }

    pub fn rate_limit_rule(&self) -> RateLimitRule {
        RateLimitRule::new(
            self.rate_limit_max_requests,
            Duration::from_secs(self.rate_limit_window_secs),
        )
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }
}
