//! Routes for contact form submissions.

use axum::{
    Router,
    body::Bytes,
    extract::{Path, Query, State, rejection::BytesRejection},
    http::StatusCode,
    response::Json as ResponseJson,
    routing::get,
};
use db::models::contact::{Contact, Pagination};
use serde_json::Value;
use services::services::{contact_store::parse_contact_id, contact_validator::validate_contact};
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError};

/// First value of `key` in the query string. Repeated keys are not an error.
fn first_param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.as_str())
}

/// POST /contacts
pub async fn create_contact(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<Contact>>), ApiError> {
    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge
        } else {
            ApiError::MalformedBody(rejection.body_text())
        }
    })?;
    let payload: Value =
        serde_json::from_slice(&body).map_err(|e| ApiError::MalformedBody(e.to_string()))?;
    let input = validate_contact(&payload)?;

    let contact = state.contacts().create(&input).await?;

    Ok((StatusCode::CREATED, ResponseJson(ApiResponse::success(contact))))
}

/// GET /contacts?limit&offset
pub async fn list_contacts(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<ResponseJson<ApiResponse<Vec<Contact>>>, ApiError> {
    let pagination =
        Pagination::from_query(first_param(&params, "limit"), first_param(&params, "offset"));
    let (contacts, total) = state.contacts().list(pagination).await?;
    Ok(ResponseJson(ApiResponse::success_with_count(contacts, total)))
}

/// GET /contacts/{id}
pub async fn get_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<Contact>>, ApiError> {
    let id = parse_contact_id(&id)?;
    let contact = state.contacts().get_by_id(id).await?;
    Ok(ResponseJson(ApiResponse::success(contact)))
}

/// DELETE /contacts/{id}
pub async fn delete_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let id = parse_contact_id(&id)?;
    state.contacts().delete_by_id(id).await?;
    Ok(ResponseJson(ApiResponse::ok()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/contacts", get(list_contacts).post(create_contact))
        .route("/contacts/{id}", get(get_contact).delete(delete_contact))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_first_param_takes_first_occurrence() {
        let query = params(&[("limit", "1"), ("offset", "4"), ("limit", "2")]);
        assert_eq!(first_param(&query, "limit"), Some("1"));
        assert_eq!(first_param(&query, "offset"), Some("4"));
        assert_eq!(first_param(&query, "page"), None);
    }
}
