use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// JSON envelope returned by every endpoint.
///
/// Success bodies carry `data` (and `count` for listings); failure bodies
/// carry `error` (the error kind), a human `message` and, for field-level
/// validation failures, `errors`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct ApiResponse<T> {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    errors: Option<BTreeMap<String, String>>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            count: None,
            error: None,
            message: None,
            errors: None,
        }
    }

    /// A page of results together with the size of the whole collection.
    pub fn success_with_count(data: T, count: i64) -> Self {
        Self {
            count: Some(count),
            ..Self::success(data)
        }
    }

    /// `{ "success": true }` with no payload.
    pub fn ok() -> Self {
        Self {
            success: true,
            data: None,
            count: None,
            error: None,
            message: None,
            errors: None,
        }
    }

    pub fn error(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            count: None,
            error: Some(kind.into()),
            message: Some(message.into()),
            errors: None,
        }
    }

    pub fn error_with_fields(
        kind: impl Into<String>,
        message: impl Into<String>,
        errors: BTreeMap<String, String>,
    ) -> Self {
        Self {
            errors: Some(errors),
            ..Self::error(kind, message)
        }
    }
}
