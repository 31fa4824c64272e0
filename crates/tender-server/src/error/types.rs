//! API error types.

use axum::{extract::rejection::JsonRejection, http::StatusCode};
use tender_rbac::{AccessDenied, Permission, Role};
use thiserror::Error;

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// API error enum covering all error cases.
#[derive(Debug, Error)]
pub enum ApiError {
    // 400 Bad Request
    #[error("Bad request: {0}")]
    BadRequest(String),

    // 401 Unauthorized
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid identity: {0}")]
    InvalidIdentity(String),

    // 403 Forbidden
    #[error("Insufficient permissions")]
    InsufficientPermissions { required: Permission, user_role: Role },

    #[error("Insufficient role permissions")]
    InsufficientRole { required: Vec<Role>, user_role: Role },

    // 404 Not Found
    #[error("{0} not found")]
    NotFound(String),

    // 500 Internal Server Error
    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),
}

impl ApiError {
    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,

            Self::Unauthorized
            | Self::InvalidIdentity(_) => StatusCode::UNAUTHORIZED,

            Self::InsufficientPermissions { .. }
            | Self::InsufficientRole { .. } => StatusCode::FORBIDDEN,

            Self::NotFound(_) => StatusCode::NOT_FOUND,

            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code for client handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::Unauthorized => "unauthorized",
            Self::InvalidIdentity(_) => "invalid_identity",
            Self::InsufficientPermissions { .. } => "insufficient_permissions",
            Self::InsufficientRole { .. } => "insufficient_role",
            Self::NotFound(_) => "not_found",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Check if this is a server error (5xx).
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

impl From<AccessDenied> for ApiError {
    fn from(denied: AccessDenied) -> Self {
        match denied {
            AccessDenied::Unauthenticated => ApiError::Unauthorized,
            AccessDenied::MissingPermission { required, user_role } => {
                ApiError::InsufficientPermissions { required, user_role }
            }
            AccessDenied::MissingRole { required, user_role } => {
                ApiError::InsufficientRole { required, user_role }
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
