//! Analytics API handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use super::handlers::{AppState, ErrorResponse};
use crate::filter;
use crate::models::VisitorStats;

#[derive(Debug, Default, Deserialize)]
pub struct AnalyticsQueryParams {
    /// Site code from the registry, or "all" for no site restriction
    pub site_filter: Option<String>,

    /// Raw URL filter, used only when no site is selected
    pub url_filter: Option<String>,
}

/// Aggregate visitor stats for the selected site or URL filter
pub async fn get_analytics(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AnalyticsQueryParams>,
) -> Result<Json<VisitorStats>, (StatusCode, Json<ErrorResponse>)> {
    let resolved = filter::resolve(
        &state.sites,
        params.site_filter.as_deref(),
        params.url_filter.as_deref(),
    );

    match state
        .storage
        .site_stats(resolved.effective_url_filter.as_deref())
        .await
    {
        Ok(record) => Ok(Json(record.stats)),
        Err(e) => {
            tracing::error!(
                url_filter = ?resolved.effective_url_filter,
                error = %e,
                "Failed to get analytics"
            );
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to retrieve analytics".to_string(),
                }),
            ))
        }
    }
}
