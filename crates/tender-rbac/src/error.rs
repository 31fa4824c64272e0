//! Registry error types.

use thiserror::Error;

/// Result type for registry parsing.
pub type RbacResult<T> = Result<T, RbacError>;

/// Errors raised when an identifier falls outside the closed role or
/// permission sets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RbacError {
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Unknown permission: {0}")]
    UnknownPermission(String),
}
