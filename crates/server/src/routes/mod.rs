use axum::{Router, extract::DefaultBodyLimit};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{AppState, error::ApiError};

pub mod contacts;
pub mod health;

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

pub fn router(cors: CorsLayer) -> Router<AppState> {
    Router::new()
        .merge(contacts::router())
        .merge(health::router())
        .fallback(route_not_found)
        .method_not_allowed_fallback(route_not_found)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

async fn route_not_found() -> ApiError {
    ApiError::RouteNotFound
}
