//! Server initialization and lifecycle management
//!
//! This module handles all startup wiring:
//! - Tracing initialization (env-aware: JSON for prod, pretty for dev)
//! - Qdrant client construction
//! - Embedding provider construction
//! - Dictionary service initialization (store probe with bounded retries,
//!   model load, collection bootstrap with seed data)
//! - HTTP server with graceful shutdown

use std::sync::Arc;

use axum_helpers::server::{create_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_dictionary::{
    DictionaryService, EmbeddingProvider, FastEmbedProvider, QdrantConfig, QdrantRepository,
    handlers,
};
use eyre::{Result, WrapErr};
use tracing::info;

use crate::config::Config;

/// Run the HTTP server.
///
/// # Errors
///
/// Returns an error if:
/// - configuration is invalid
/// - the vector store stays unreachable through the startup retry window
/// - the embedding model fails to load
/// - the server fails to bind or errors while running
pub async fn run() -> Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let qdrant_config =
        QdrantConfig::from_env().wrap_err("Failed to load vector store configuration")?;
    info!("Using vector store at {}", qdrant_config.url());
    let repository = QdrantRepository::new(qdrant_config)
        .await
        .wrap_err("Failed to build vector store client")?;

    let embedder = Arc::new(FastEmbedProvider::new());
    info!("Embedding model: {}", embedder.model_name());

    let service = Arc::new(DictionaryService::new(repository, embedder));

    // Probe the store (bounded retries), load the model, ensure the
    // collection and seed it on first creation. Failure here is fatal.
    service
        .initialize()
        .await
        .wrap_err("Failed to initialize dictionary service")?;

    let api_routes = crate::api::routes(service);
    let router = create_router::<handlers::ApiDoc>(api_routes);
    let app = router.merge(health_router(config.app));

    create_app(app, &config.server)
        .await
        .wrap_err("Server error")?;

    info!("Dictionary API shutdown complete");
    Ok(())
}
