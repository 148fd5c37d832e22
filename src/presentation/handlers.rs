// HTTP request handlers
use crate::application::report::ReportTable;
use crate::domain::panel::{PanelId, PanelQuery, PanelState};
use crate::presentation::app_state::AppState;
use crate::presentation::http_response::csv_report_response;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
pub struct PanelSummary {
    pub id: PanelId,
    pub title: &'static str,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// List every panel the dashboard serves
pub async fn list_panels() -> Json<Vec<PanelSummary>> {
    Json(
        PanelId::ALL
            .iter()
            .map(|&id| PanelSummary { id, title: id.title() })
            .collect(),
    )
}

/// Current state of a panel; never starts a load
pub async fn panel_snapshot(Path(id): Path<PanelId>, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.dashboard.snapshot(id).await)
}

/// Start a new pipeline invocation for a panel with the given filters
pub async fn refresh_panel(
    Path(id): Path<PanelId>,
    Query(query): Query<PanelQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    Json(state.dashboard.refresh(id, query).await)
}

/// Download the panel's current data as a CSV table
pub async fn panel_report(Path(id): Path<PanelId>, State(state): State<Arc<AppState>>) -> Response {
    let snapshot = state.dashboard.snapshot(id).await;

    match &snapshot.state {
        PanelState::Ready { data, .. } => {
            let report = ReportTable::from_panel(id.title(), data);
            match csv_report_response(&report) {
                Ok(response) => response.into_response(),
                Err(status) => status.into_response(),
            }
        }
        PanelState::Error { .. } => (StatusCode::BAD_GATEWAY, Json(snapshot)).into_response(),
        PanelState::Idle | PanelState::Loading => (StatusCode::CONFLICT, Json(snapshot)).into_response(),
    }
}
