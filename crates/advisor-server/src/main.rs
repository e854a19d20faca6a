//! Wealth Advisor HTTP Server
//!
//! Axum-based REST API over the allocation table, investment planner,
//! growth estimator and LLM-backed explanations.

mod config;
mod handlers;
mod routes;
mod state;

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_core::{GenerationOptions, LlmProvider, MemorySessionStore, SessionStore};
use agent_runtime::{OpenRouterConfig, OpenRouterProvider};
use wealth_advisor::{MockPriceHistory, PriceHistorySource, YahooHistoryClient};

use crate::config::{PriceSourceKind, ServerConfig};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment first so RUST_LOG from .env applies
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    // Initialize LLM provider
    let provider = match OpenRouterProvider::from_env() {
        Ok(provider) => provider,
        Err(e) => {
            tracing::warn!("⚠ {} - explanations will fail", e);
            tracing::warn!("  Set OPENROUTER_API_KEY in .env");
            OpenRouterProvider::from_config(OpenRouterConfig::default())
        }
    };
    let generation = GenerationOptions::with_model(provider.config().model.clone());

    match provider.health_check().await {
        Ok(true) => tracing::info!("✓ Connected to OpenRouter (model {})", generation.model),
        Ok(false) | Err(_) => tracing::warn!("⚠ OpenRouter not reachable"),
    }

    let prices: Arc<dyn PriceHistorySource> = match config.price_source {
        PriceSourceKind::Yahoo => Arc::new(YahooHistoryClient::new()?),
        PriceSourceKind::Mock => {
            tracing::info!("Using synthetic price history");
            Arc::new(MockPriceHistory::with_benchmarks())
        }
    };

    let sessions: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
    tokio::spawn(purge_idle_sessions(Arc::clone(&sessions), config.session_idle()));

    let bind_addr = config.bind_addr.clone();
    let state = AppState::new(Arc::new(provider), prices, sessions, config)
    .with_generation(generation);

    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("💼 wealth advisor running on http://{}", bind_addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET    /health            - Health check");
    tracing::info!("  POST   /api/portfolio     - Allocation + explanation");
    tracing::info!("  POST   /api/plan          - Monthly investment plan");
    tracing::info!("  GET    /api/growth        - Trailing CAGR estimates");
    tracing::info!("  POST   /api/ask           - Follow-up question");
    tracing::info!("  POST   /api/report        - PDF or text report");
    tracing::info!("  POST   /api/feedback      - Rate the session");
    tracing::info!("  DELETE /api/session/{{id}} - Restart");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Drop idle sessions once per idle window
async fn purge_idle_sessions(sessions: Arc<dyn SessionStore>, max_idle: Duration) {
    let mut ticker = tokio::time::interval(max_idle);
    loop {
        ticker.tick().await;
        match sessions.purge_idle(max_idle).await {
            Ok(0) => {}
            Ok(purged) => tracing::info!(purged, "Expired idle sessions"),
            Err(e) => tracing::warn!("Session purge failed: {}", e),
        }
    }
}
