use regex::Regex;
use std::sync::LazyLock;

use crate::config::Config;
use crate::error::SummarizerError;

static HTTP_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://[^\s/]+(/\S*)?$").expect("valid url pattern"));

/// Validates configuration objects for consistency and correctness
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates the full service configuration
    pub fn validate(config: &Config) -> Result<(), SummarizerError> {
        Self::validate_api_key(&config.openai_api_key)?;
        Self::validate_base_url(&config.openai_base_url)?;
        Self::validate_model(&config.openai_model)?;
        config
            .rate_limit_rule()
            .validate()
            .map_err(SummarizerError::Configuration)?;

        if config.provider_timeout_secs == 0 {
            return Err(SummarizerError::Configuration(
                "Provider timeout must be greater than 0".to_string(),
            ));
        }

        if config.cleanup_interval_secs == 0 {
            return Err(SummarizerError::Configuration(
                "Cleanup interval must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Validates the provider API key
    pub fn validate_api_key(key: &str) -> Result<(), SummarizerError> {
        if key.trim().is_empty() {
            return Err(SummarizerError::Configuration(
                "OPENAI_API_KEY must be set".to_string(),
            ));
        }
        Ok(())
    }

    /// Validates the provider base URL
    pub fn validate_base_url(url: &str) -> Result<(), SummarizerError> {
        if !HTTP_URL.is_match(url) {
            return Err(SummarizerError::Configuration(format!(
                "Provider base URL must start with 'http://' or 'https://', got '{}'",
                url
            )));
        }
        Ok(())
    }

    /// Validates the model name
    pub fn validate_model(model: &str) -> Result<(), SummarizerError> {
        if model.trim().is_empty() {
            return Err(SummarizerError::Configuration(
                "Model name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}
