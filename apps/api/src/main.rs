mod config;
mod errors;
mod generation;
mod models;
mod render;
mod resume;
mod routes;
mod state;
mod storage;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, StorageBackend};
use crate::generation::generator::GenerationSettings;
use crate::resume::validation::ValidationLimits;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::{DocumentStore, LocalDirStore, S3Store};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SmartCV API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize document storage; the directory/bucket check runs once, here.
    let store: Arc<dyn DocumentStore> = match &config.storage {
        StorageBackend::Local { dir } => Arc::new(LocalDirStore::new(dir.clone())),
        StorageBackend::S3(settings) => Arc::new(S3Store::from_settings(settings).await),
    };
    store
        .init()
        .await
        .context("Failed to initialize document storage")?;

    info!("Download links use base {}", config.public_base_url);

    // Build app state
    let state = AppState {
        store,
        generation: GenerationSettings {
            public_base_url: config.public_base_url.clone(),
            limits: ValidationLimits {
                max_field_len: config.max_field_len,
            },
        },
    };

    let cors = match &config.cors_allowed_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(
                origin
                    .parse::<HeaderValue>()
                    .context("CORS_ALLOWED_ORIGIN must be a valid origin")?,
            )
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any),
        None => CorsLayer::permissive(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
