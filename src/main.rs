use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sitelens::api;
use sitelens::config::Config;
use sitelens::sites::SiteRegistry;
use sitelens::storage;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Loaded configuration");

    // Build the site registry
    let sites = match config.sites.path.as_deref() {
        Some(path) => SiteRegistry::load(path)
            .with_context(|| format!("failed to load site registry from {path}"))?,
        None => SiteRegistry::builtin(),
    };
    info!("Site registry ready with {} site(s)", sites.len());
    for (code, url) in sites.iter() {
        info!("   - {} -> {}", code, url);
    }

    // Initialize storage
    let storage = storage::connect(&config.database).await?;
    info!("Initializing database...");
    storage.init().await?;
    info!("Database initialized successfully");

    let api_router = api::create_api_router(
        Arc::clone(&storage),
        Arc::new(sites),
        config.cors.allowed_origin.as_deref(),
    );

    let api_addr = format!("{}:{}", config.api_server.host, config.api_server.port);
    let listener = tokio::net::TcpListener::bind(&api_addr)
        .await
        .with_context(|| format!("failed to bind {api_addr}"))?;
    info!("🚀 API server listening on http://{}", api_addr);
    info!("   - Analytics available at http://{}/api/analytics", api_addr);

    axum::serve(listener, api_router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    storage.close().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
