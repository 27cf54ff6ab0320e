mod config;
mod documents;
mod errors;
mod intake;
mod llm_client;
mod models;
mod profile;
mod routes;
mod search;
mod state;
mod store;

#[cfg(test)]
mod testing;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::documents::native::NativeDocumentExtractor;
use crate::intake::session::SessionStore;
use crate::llm_client::LlmClient;
use crate::profile::extractor::LlmProfileExtractor;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::RecordStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing LLM credentials)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting intake API v{}", env!("CARGO_PKG_VERSION"));

    let llm = LlmClient::new(
        config.google_api_key.clone(),
        config.llm_model.clone(),
        config.llm_api_base.clone(),
    )?;
    info!("LLM client initialized (model: {})", llm.model());

    let store = RecordStore::new(&config.store_path);
    info!("Candidate table at {:?}", store.path());

    let state = AppState {
        documents: Arc::new(NativeDocumentExtractor),
        profiles: Arc::new(LlmProfileExtractor::new(llm)),
        store: Arc::new(store),
        sessions: SessionStore::new(chrono::Duration::minutes(config.session_ttl_minutes)),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
