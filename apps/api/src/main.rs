mod config;
mod errors;
mod exploration;
mod llm_client;
mod models;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::Mutex;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::exploration::session::ExplorationState;
use crate::llm_client::GeminiClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CareerGraph API v{}", env!("CARGO_PKG_VERSION"));

    // A missing credential must not prevent boot; it surfaces per fetch.
    if config.gemini_api_key.is_none() {
        warn!(
            "GEMINI_API_KEY not found in secrets file or environment — \
             exploration requests will fail until it is configured"
        );
    } else {
        info!("LLM client initialized (model: {})", llm_client::MODEL);
    }
    let llm = GeminiClient::new(config.gemini_api_key.clone());

    // Build app state: one exploration session for the whole process
    let state = AppState {
        llm: Arc::new(llm),
        exploration: Arc::new(Mutex::new(ExplorationState::default())),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
