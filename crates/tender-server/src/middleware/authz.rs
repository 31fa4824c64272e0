//! Authorization middleware layer.

use crate::error::ApiError;
use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tender_rbac::{
    require_admin, require_all, require_manager_or_admin, require_permission, require_role,
    AccessEnforcer, Identity, Permission, Requirement, Role,
};
use tower::{Layer, Service};

/// Authorization layer configuration.
#[derive(Clone)]
pub struct AuthzLayer {
    enforcer: AccessEnforcer,
    requirement: Arc<Requirement>,
}

impl AuthzLayer {
    pub fn new(enforcer: AccessEnforcer, requirement: Requirement) -> Self {
        Self {
            enforcer,
            requirement: Arc::new(requirement),
        }
    }

    /// Create layer requiring a single permission.
    pub fn permission(enforcer: AccessEnforcer, permission: Permission) -> Self {
        Self::new(enforcer, require_permission(permission))
    }

    /// Create layer requiring every listed permission.
    pub fn all(enforcer: AccessEnforcer, permissions: impl IntoIterator<Item = Permission>) -> Self {
        Self::new(enforcer, require_all(permissions))
    }

    /// Create layer admitting only the listed roles.
    pub fn role(enforcer: AccessEnforcer, roles: impl IntoIterator<Item = Role>) -> Self {
        Self::new(enforcer, require_role(roles))
    }

    /// Create layer admitting admins only.
    pub fn admin(enforcer: AccessEnforcer) -> Self {
        Self::new(enforcer, require_admin())
    }

    /// Create layer admitting admins and managers.
    pub fn manager_or_admin(enforcer: AccessEnforcer) -> Self {
        Self::new(enforcer, require_manager_or_admin())
    }
}

impl<S> Layer<S> for AuthzLayer {
    type Service = AuthzMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthzMiddleware {
            inner,
            enforcer: self.enforcer.clone(),
            requirement: self.requirement.clone(),
        }
    }
}

#[derive(Clone)]
pub struct AuthzMiddleware<S> {
    inner: S,
    enforcer: AccessEnforcer,
    requirement: Arc<Requirement>,
}

impl<S> Service<Request<Body>> for AuthzMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        // The decision is synchronous; only the inner call is awaited.
        let decision = self
            .enforcer
            .check(req.extensions().get::<Identity>(), &self.requirement);
        let mut inner = self.inner.clone();

        Box::pin(async move {
            if let Err(denied) = decision {
                return Ok(ApiError::from(denied).into_response());
            }

            inner.call(req).await
        })
    }
}
