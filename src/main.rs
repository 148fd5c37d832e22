// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc, time::Duration};
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_service::DashboardService;
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::file_loader::FileLoader;
use crate::infrastructure::http_loader::HttpLoader;
use crate::infrastructure::source_router::SourceRouter;
use crate::presentation::app_state::AppState;
use crate::presentation::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_dashboard_config()?;

    // Create loaders (infrastructure layer)
    let remote = HttpLoader::new(Duration::from_secs(config.loader.timeout_secs))?;
    let local = FileLoader::new(&config.loader.static_dir);
    let loader = Arc::new(SourceRouter::new(Arc::new(remote), Arc::new(local)));

    // Create services (application layer)
    let dashboard = DashboardService::new(loader, config.sources, config.panels);

    // Build router (presentation layer)
    let state = Arc::new(AppState { dashboard });
    let router = build_router(state);

    // Start server
    let addr: SocketAddr = config.server.bind.parse()?;
    tracing::info!("Starting earth-dashboard service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
