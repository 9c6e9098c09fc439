// Main entry point for the summary server

use anyhow::{Context, Result};
use url_summary::server::{build_app, ServerConfig};
use url_summary::{setup_logging, LogConfig, Summarizer};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::from_env().context("Failed to load configuration")?;

    setup_logging(LogConfig {
        log_level: config.log_level.clone(),
        json: config.log_json,
        ..LogConfig::default()
    });

    let summarizer = Summarizer::new();
    tracing::info!(strategies = ?summarizer.registry().names(), "Strategies registered");

    let app = build_app(summarizer, config.options.clone());

    let addr = format!("{}:{}", config.bind_addr, config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
