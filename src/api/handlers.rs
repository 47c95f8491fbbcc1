use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::sites::{SiteEntry, SiteRegistry};
use crate::storage::StatsStorage;

pub struct AppState {
    pub storage: Arc<dyn StatsStorage>,
    pub sites: Arc<SiteRegistry>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct SuccessResponse {
    pub message: String,
}

/// List the registered sites, ordered by code
pub async fn list_sites(State(state): State<Arc<AppState>>) -> Json<Vec<SiteEntry>> {
    Json(state.sites.entries())
}

/// Health check endpoint
pub async fn health_check() -> Json<SuccessResponse> {
    Json(SuccessResponse {
        message: "OK".to_string(),
    })
}
