// Presentation layer - HTTP surface over the panel adapters
pub mod app_state;
pub mod handlers;
pub mod http_response;

use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{health_check, list_panels, panel_report, panel_snapshot, refresh_panel};
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/panels", get(list_panels))
        .route("/panels/:id", get(panel_snapshot).post(refresh_panel))
        .route("/panels/:id/report", get(panel_report))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
