use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::time::Duration;

use crate::response::ErrorBody;

pub type Result<T> = std::result::Result<T, SummarizerError>;

/// Message returned to clients that exceed their request quota.
pub const RATE_LIMIT_MESSAGE: &str = "Too many requests. Please try again in a minute.";

/// Errors surfaced by the summarization pipeline.
#[derive(Debug, thiserror::Error)]
pub enum SummarizerError {
    #[error("{0}")]
    Validation(String),

    #[error("Too many requests. Please try again in a minute.")]
    RateLimited { retry_after: u64 },

    #[error("Failed to analyze text: {0}")]
    Analysis(#[from] ProviderError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failures of a single call to the text generation provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("{step} request timed out after {}ms", .after.as_millis())]
    Timeout { step: &'static str, after: Duration },

    #[error("{0}")]
    Other(String),
}

impl SummarizerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SummarizerError::Validation(_) => StatusCode::BAD_REQUEST,
            SummarizerError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            SummarizerError::Analysis(_)
            | SummarizerError::Configuration(_)
            | SummarizerError::Io(_)
            | SummarizerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for SummarizerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            SummarizerError::RateLimited { retry_after } => {
                ErrorBody::with_retry(self.to_string(), *retry_after)
            }
            _ => ErrorBody::new(self.to_string()),
        };

        let mut response = (status, Json(body)).into_response();
        if let SummarizerError::RateLimited { retry_after } = self {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
        }
        response
    }
}
