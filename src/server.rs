use crate::analyzer::TextAnalyzer;
use crate::config::Config;
use crate::error::SummarizerError;
use crate::handlers::{health_check, metrics, readiness_check, summarize, AppState};
use crate::health;
use crate::key_generator::KeyGenerator;
use crate::llm::OpenAiClient;
use crate::middleware::logging_middleware;
use crate::rate_limiter::RateLimiter;
use crate::store::MemoryStore;
use axum::routing::{get, post};
use axum::{middleware, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the router around an already assembled state.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/api/summarize", post(summarize))
        // Health and readiness endpoints
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn(logging_middleware)),
        )
}

/// Wire the production components described by `config`.
pub fn build_state(config: &Config) -> AppState {
    let client = OpenAiClient::new(
        &config.openai_base_url,
        &config.openai_api_key,
        &config.openai_model,
    );
    let analyzer = TextAnalyzer::new(Arc::new(client), config.provider_timeout())
        .with_parallel(config.parallel_analysis);

    AppState::new(
        Arc::new(RateLimiter::new(config.rate_limit_rule())),
        Arc::new(analyzer),
        Arc::new(MemoryStore::new()),
        KeyGenerator::from_trust(config.trust_forwarded_headers),
        config.openai_model.clone(),
    )
}

pub struct Server {
    state: AppState,
    bind_addr: SocketAddr,
    cleanup_interval: Duration,
}

impl Server {
    pub fn new(config: &Config) -> Result<Self, SummarizerError> {
        crate::config_validator::ConfigValidator::validate(config)?;

        Ok(Self {
            state: build_state(config),
            bind_addr: config.bind_addr,
            cleanup_interval: config.cleanup_interval(),
        })
    }

    pub async fn run(self) -> Result<(), SummarizerError> {
        health::mark_started();
        spawn_cleanup(Arc::clone(&self.state.rate_limiter), self.cleanup_interval);

        let listener = tokio::net::TcpListener::bind(self.bind_addr).await?;

        tracing::info!("Summarizer server listening on {}", self.bind_addr);
        tracing::info!("Health check available at /health");
        tracing::info!("Readiness check available at /ready");

        let app = create_app(self.state);

        // Run server with graceful shutdown
        axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

fn spawn_cleanup(rate_limiter: Arc<RateLimiter>, every: Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        // First tick completes immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            match rate_limiter.purge_expired() {
                Ok(0) => {}
                Ok(removed) => tracing::debug!(removed, "Purged expired rate limit windows"),
                Err(e) => tracing::warn!(error = %e, "Rate limit cleanup failed"),
            }
        }
    });
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        },
    }
}
