//! Route configuration for the tender API server.

mod internal;
mod rbac;

pub use rbac::{CallerView, CheckRequest, CheckResponse, PermissionView, RoleView};

use crate::{error::ApiError, middleware::IdentityLayer, state::AppState};
use axum::{response::IntoResponse, Router};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.server.request_timeout_secs);

    // Common middleware stack applied to all routes
    let common_middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::new(timeout))
        // Identity must be attached before any route-level authorization runs
        .layer(IdentityLayer::new(state.config.identity.clone()));

    Router::new()
        .nest("/api/rbac", rbac::router(state.clone()))
        .merge(internal::router())
        .fallback(fallback_handler)
        .layer(common_middleware)
        .with_state(state)
}

async fn fallback_handler() -> impl IntoResponse {
    ApiError::NotFound("Route".into())
}
