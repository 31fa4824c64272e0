//! Error handling for the tender API server.

pub mod response;
pub mod types;

pub use types::{ApiError, ApiResult};
