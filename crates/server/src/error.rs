use axum::{
    Json,
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use services::services::{contact_store::ContactStoreError, contact_validator::FieldErrors};
use strum_macros::{AsRefStr, Display};
use thiserror::Error;
use utils::response::ApiResponse;
use uuid::Uuid;

pub const CORRELATION_ID_HEADER: HeaderName = HeaderName::from_static("x-correlation-id");

const INTERNAL_ERROR_MESSAGE: &str = "An internal error occurred. Please try again later.";

/// Error kinds as they appear in the `error` field of a failure body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
pub enum ErrorKind {
    ValidationError,
    NotFoundError,
    PersistenceError,
}

impl ErrorKind {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorKind::ValidationError => StatusCode::BAD_REQUEST,
            ErrorKind::NotFoundError => StatusCode::NOT_FOUND,
            ErrorKind::PersistenceError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] FieldErrors),
    #[error("malformed request body: {0}")]
    MalformedBody(String),
    #[error("request body exceeds the size limit")]
    PayloadTooLarge,
    #[error(transparent)]
    ContactStore(#[from] ContactStoreError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("route not found")]
    RouteNotFound,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Validation(_)
            | ApiError::MalformedBody(_)
            | ApiError::PayloadTooLarge
            | ApiError::ContactStore(ContactStoreError::InvalidId(_)) => ErrorKind::ValidationError,
            ApiError::ContactStore(ContactStoreError::NotFound(_)) | ApiError::RouteNotFound => {
                ErrorKind::NotFoundError
            }
            ApiError::ContactStore(ContactStoreError::Persistence(_)) | ApiError::Database(_) => {
                ErrorKind::PersistenceError
            }
        }
    }
}

fn failure(kind: ErrorKind, body: ApiResponse<()>) -> Response {
    (kind.status(), Json(body)).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        match self {
            ApiError::Validation(errors) => {
                tracing::debug!(%errors, "Rejected contact submission");
                failure(
                    kind,
                    ApiResponse::error_with_fields(
                        kind.as_ref(),
                        "Invalid contact submission",
                        errors.into_map(),
                    ),
                )
            }
            ApiError::MalformedBody(detail) => {
                tracing::debug!(%detail, "Rejected malformed request body");
                failure(
                    kind,
                    ApiResponse::error(kind.as_ref(), "Request body must be valid JSON"),
                )
            }
            ApiError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                Json(ApiResponse::<()>::error(
                    kind.as_ref(),
                    "Request body is too large",
                )),
            )
                .into_response(),
            ApiError::ContactStore(ContactStoreError::InvalidId(raw)) => {
                tracing::debug!(id = %raw, "Rejected contact id");
                failure(
                    kind,
                    ApiResponse::error(kind.as_ref(), "Contact id must be a positive integer"),
                )
            }
            ApiError::ContactStore(ContactStoreError::NotFound(id)) => failure(
                kind,
                ApiResponse::error(kind.as_ref(), format!("Contact {id} not found")),
            ),
            ApiError::RouteNotFound => {
                failure(kind, ApiResponse::error(kind.as_ref(), "Route not found"))
            }
            err @ (ApiError::ContactStore(ContactStoreError::Persistence(_))
            | ApiError::Database(_)) => {
                // Detail stays in the logs; the client gets the id to quote.
                let correlation_id = Uuid::new_v4().to_string();
                tracing::error!(correlation_id = %correlation_id, error = %err, "Persistence failure");

                let mut response =
                    failure(kind, ApiResponse::error(kind.as_ref(), INTERNAL_ERROR_MESSAGE));
                if let Ok(value) = HeaderValue::from_str(&correlation_id) {
                    response.headers_mut().insert(CORRELATION_ID_HEADER, value);
                }
                response
            }
        }
    }
}
