use axum::{Router, extract::State, response::Json as ResponseJson, routing::get};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct HealthStatus {
    pub status: String,
    pub database: String,
}

/// GET /health
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<HealthStatus>>, ApiError> {
    state.db().ping().await?;

    Ok(ResponseJson(ApiResponse::success(HealthStatus {
        status: "ok".to_string(),
        database: "ok".to_string(),
    })))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
