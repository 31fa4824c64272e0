//! Standard API response envelope.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Success envelope. Failures use [`ApiError`](crate::error::ApiError).
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
    /// Response metadata.
    pub meta: ResponseMeta,
}

/// Response metadata.
#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    /// Response timestamp.
    pub timestamp: String,
}

impl ResponseMeta {
    pub fn now() -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl<T> ApiResponse<T> {
    /// Create a successful response.
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
            meta: ResponseMeta::now(),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
