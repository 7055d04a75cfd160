pub mod analyzer;
pub mod config;
pub mod config_validator;
pub mod error;
pub mod formatter;
pub mod handlers;
pub mod health;
pub mod key_generator;
pub mod llm;
pub mod metrics;
pub mod middleware;
pub mod rate_limit_config;
pub mod rate_limiter;
pub mod response;
pub mod server;
pub mod store;
pub mod validation;

pub use config::Config;
pub use error::{ProviderError, Result, SummarizerError};
pub use handlers::AppState;
pub use response::{ErrorBody, SummaryResponse};
pub use server::{build_state, create_app};
