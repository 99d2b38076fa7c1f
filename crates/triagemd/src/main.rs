//! Triagem Daemon - intent classification service for banking customer care.
//!
//! Classifies free-form Brazilian Portuguese utterances into a fixed
//! catalog of credit-card services via an external completion API.

use anyhow::Result;
use tracing::{info, Level};
use triagemd::config::Config;
use triagemd::server;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("Triagem Daemon v{} starting", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env();
    info!(
        "Completion backend: {} via {}",
        config.llm.model, config.llm.api_url
    );

    server::run(config).await
}
