mod cache;
mod config;
mod errors;
mod interview;
mod llm_client;
mod profiler;
mod routes;
mod state;

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::RwLock;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cache::TtlCache;
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::profiler::HttpProfiler;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Coach API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize completions client
    let llm = LlmClient::new(
        config.completions_base_url.clone(),
        config.openai_api_key.clone(),
        config.model_name.clone(),
    );
    info!("LLM client initialized (model: {})", llm.model());

    // Initialize profiler client
    let profiler = Arc::new(HttpProfiler::new(
        config.profiler_url.clone(),
        config.model_provider.clone(),
        config.model_name.clone(),
    ));
    info!("Profiler client initialized ({})", config.profiler_url);

    // Build app state
    let state = AppState {
        llm,
        profiler,
        cache: Arc::new(TtlCache::new()),
        sessions: Arc::new(RwLock::new(HashMap::new())),
        config: config.clone(),
    };
    info!("Profiler cache TTL: {}s", config.cache_ttl_secs);

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
