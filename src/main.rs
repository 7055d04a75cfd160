use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use summarizer::config::Config;
use summarizer::config_validator::ConfigValidator;
use summarizer::server::Server;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "summarizer")]
#[command(about = "Summarize text into a title, key facts and a short summary")]
struct Cli {
    /// Override BIND_ADDR
    #[arg(long)]
    bind_addr: Option<SocketAddr>,

    /// Validate configuration and exit
    #[arg(long)]
    check_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let mut config = Config::from_env()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;
    if let Some(bind_addr) = cli.bind_addr {
        config.bind_addr = bind_addr;
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("summarizer={},tower_http=debug", config.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if cli.check_config {
        ConfigValidator::validate(&config)?;
        tracing::info!("Configuration is valid");
        return Ok(());
    }

    tracing::info!("Starting summarizer service");
    tracing::info!(
        "Configuration: bind_addr={}, model={}, rate_limit={}/{}s, parallel_analysis={}",
        config.bind_addr,
        config.openai_model,
        config.rate_limit_max_requests,
        config.rate_limit_window_secs,
        config.parallel_analysis
    );

    let server = Server::new(&config)?;
    server.run().await?;

    Ok(())
}
