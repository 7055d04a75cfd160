use axum::{
    extract::{rejection::JsonRejection, ConnectInfo, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::analyzer::TextAnalyzer;
use crate::error::SummarizerError;
use crate::formatter::format_analysis;
use crate::health::HealthChecker;
use crate::key_generator::KeyGenerator;
use crate::metrics::MetricsCollector;
use crate::rate_limiter::{Decision, RateLimiter};
use crate::response::SummaryResponse;
use crate::store::SummaryStore;
use crate::validation::RequestValidator;

/// Components shared by every request
#[derive(Clone)]
pub struct AppState {
    pub rate_limiter: Arc<RateLimiter>,
    pub analyzer: Arc<TextAnalyzer>,
    pub store: Arc<dyn SummaryStore>,
    pub key_generator: KeyGenerator,
    pub metrics: Arc<MetricsCollector>,
    pub provider_model: String,
}

impl AppState {
    pub fn new(
        rate_limiter: Arc<RateLimiter>,
        analyzer: Arc<TextAnalyzer>,
        store: Arc<dyn SummaryStore>,
        key_generator: KeyGenerator,
        provider_model: impl Into<String>,
    ) -> Self {
        Self {
            rate_limiter,
            analyzer,
            store,
            key_generator,
            metrics: Arc::new(MetricsCollector::new()),
            provider_model: provider_model.into(),
        }
    }
}

/// `POST /api/summarize`
pub async fn summarize(
    State(state): State<AppState>,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SummaryResponse>, SummarizerError> {
    let client_key = state
        .key_generator
        .client_key(&headers, peer.map(|ConnectInfo(addr)| addr));

    let outcome = process_summarize(&state, &client_key, payload).await;
    state.metrics.record(&outcome);

    outcome.map(Json)
}

async fn process_summarize(
    state: &AppState,
    client_key: &str,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<SummaryResponse, SummarizerError> {
    if let Decision::Denied { retry_after_secs } = state.rate_limiter.check_and_consume(client_key)? {
        warn!(client = %client_key, retry_after = retry_after_secs, "Rate limit exceeded");
        return Err(SummarizerError::RateLimited {
            retry_after: retry_after_secs,
        });
    }

    let Json(body) = payload.map_err(|rejection| SummarizerError::Validation(rejection.body_text()))?;
    let text = RequestValidator::validate_summarize_payload(&body)?;

    let analysis = state.analyzer.analyze(&text).await.map_err(|e| {
        error!(client = %client_key, error = %e, "Text analysis failed");
        e
    })?;
    let summary = format_analysis(&analysis);

    let record = state.store.create(text, summary.clone()).await?;
    info!(client = %client_key, id = record.id, "Stored summarization");

    Ok(SummaryResponse { summary })
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthChecker::new(&state).check_health().await)
}

/// Readiness check endpoint
pub async fn readiness_check() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ready" })))
}

/// Request outcome counters
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.metrics.snapshot())
}
