//! HTTP server for triagemd.

use crate::config::Config;
use crate::openrouter::OpenRouterClient;
use crate::resolver::IntentResolver;
use crate::routes;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use triagem_common::ServiceCatalog;

/// Application state shared across handlers
pub struct AppState {
    pub resolver: IntentResolver,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(resolver: IntentResolver) -> Self {
        Self {
            resolver,
            start_time: Instant::now(),
        }
    }
}

/// Run the HTTP server
pub async fn run(config: Config) -> Result<()> {
    let catalog = Arc::new(ServiceCatalog::default());
    info!("Catalog loaded: {} services", catalog.len());

    let client = OpenRouterClient::new(&config.llm);
    if !client.has_credential() {
        warn!("OPENROUTER_API_KEY is not set; classifications will fail until it is configured");
    }

    let resolver = IntentResolver::new(catalog, Arc::new(client));
    let state = Arc::new(AppState::new(resolver));

    let app = Router::new()
        .merge(routes::service_routes())
        .merge(routes::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("  Listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
