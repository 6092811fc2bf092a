mod advice;
mod applications;
mod chat;
mod config;
mod errors;
mod models;
mod money;
mod notifications;
mod routes;
mod state;
mod store;
mod wallet;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::advice::gemini::{self, GeminiAdvice};
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::Store;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Sebenza API v{}", env!("CARGO_PKG_VERSION"));

    // Seed the in-memory session (single user, no persistence)
    let store = Store::seeded();
    info!("Session store seeded");

    // Initialize the AI coach provider
    let advice = GeminiAdvice::from_key(config.gemini_api_key.clone());
    if advice.is_configured() {
        info!("Advice provider initialized (model: {})", gemini::MODEL);
    } else {
        info!("GEMINI_API_KEY not set; AI coach will serve fallback replies");
    }

    let state = AppState::new(store, Arc::new(advice));

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
