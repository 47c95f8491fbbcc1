use axum::{http::HeaderValue, routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::sites::SiteRegistry;
use crate::storage::StatsStorage;

use super::analytics::get_analytics;
use super::handlers::{health_check, list_sites, AppState};

pub fn create_api_router(
    storage: Arc<dyn StatsStorage>,
    sites: Arc<SiteRegistry>,
    cors_origin: Option<&str>,
) -> Router {
    let state = Arc::new(AppState { storage, sites });

    let api_routes = Router::new()
        .route("/analytics", get(get_analytics))
        .route("/sites", get(list_sites))
        .route("/health", get(health_check))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(cors_layer(cors_origin))
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    match origin.map(HeaderValue::from_str) {
        Some(Ok(value)) => layer.allow_origin(value),
        Some(Err(_)) => {
            tracing::warn!("Invalid CORS_ALLOWED_ORIGIN, allowing any origin");
            layer.allow_origin(Any)
        }
        None => layer.allow_origin(Any),
    }
}
