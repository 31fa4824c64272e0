//! Identity attachment and extraction.
//!
//! Authentication happens upstream. An authenticating proxy forwards the
//! verified caller in two trusted headers, and [`IdentityLayer`] turns them
//! into an [`Identity`] in the request extensions. No headers means no
//! identity; malformed headers are rejected here so an unknown role never
//! reaches a permission check.

use crate::{config::IdentityConfig, error::ApiError};
use axum::{
    async_trait,
    body::Body,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, Request},
    response::{IntoResponse, Response},
};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tender_rbac::{Identity, Role};
use tower::{Layer, Service};
use tracing::debug;

/// Layer that attaches the upstream identity to each request.
#[derive(Clone)]
pub struct IdentityLayer {
    headers: Arc<IdentityConfig>,
}

impl IdentityLayer {
    pub fn new(headers: IdentityConfig) -> Self {
        Self {
            headers: Arc::new(headers),
        }
    }
}

impl Default for IdentityLayer {
    fn default() -> Self {
        Self::new(IdentityConfig::default())
    }
}

impl<S> Layer<S> for IdentityLayer {
    type Service = IdentityMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        IdentityMiddleware {
            inner,
            headers: self.headers.clone(),
        }
    }
}

/// Identity middleware service.
#[derive(Clone)]
pub struct IdentityMiddleware<S> {
    inner: S,
    headers: Arc<IdentityConfig>,
}

impl<S> Service<Request<Body>> for IdentityMiddleware<S>
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

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let headers = self.headers.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            match extract_identity(req.headers(), &headers) {
                Ok(Some(identity)) => {
                    debug!(user_id = identity.id, role = %identity.role, "Identity attached");
                    req.extensions_mut().insert(identity);
                }
                Ok(None) => {}
                Err(err) => return Ok(err.into_response()),
            }

            inner.call(req).await
        })
    }
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Result<Option<&'a str>, ApiError> {
    headers
        .get(name)
        .map(|value| {
            value
                .to_str()
                .map(str::trim)
                .map_err(|_| ApiError::InvalidIdentity(format!("{name} is not valid text")))
        })
        .transpose()
}

fn extract_identity(
    headers: &HeaderMap,
    config: &IdentityConfig,
) -> Result<Option<Identity>, ApiError> {
    let id = header_value(headers, &config.user_id_header)?;
    let role = header_value(headers, &config.role_header)?;

    match (id, role) {
        (None, None) => Ok(None),
        (Some(id), Some(role)) => {
            let id = id
                .parse::<i64>()
                .map_err(|_| ApiError::InvalidIdentity(format!("malformed user id '{id}'")))?;
            let role = role
                .parse::<Role>()
                .map_err(|err| ApiError::InvalidIdentity(err.to_string()))?;
            Ok(Some(Identity::new(id, role)))
        }
        (None, Some(_)) => Err(ApiError::InvalidIdentity(format!(
            "{} header missing",
            config.user_id_header
        ))),
        (Some(_), None) => Err(ApiError::InvalidIdentity(format!(
            "{} header missing",
            config.role_header
        ))),
    }
}

/// Extractor for the authenticated caller (required).
pub struct Caller(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(Caller)
            .ok_or(ApiError::Unauthorized)
    }
}

/// Extractor for an optional caller.
pub struct MaybeCaller(pub Option<Identity>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeCaller
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeCaller(parts.extensions.get::<Identity>().cloned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut req = Request::builder();
        for (name, value) in pairs {
            req = req.header(*name, *value);
        }
        req.body(()).unwrap().headers().clone()
    }

    #[test]
    fn test_extract_identity() {
        let identity = extract_identity(
            &headers(&[("x-user-id", "42"), ("x-user-role", "finance")]),
            &IdentityConfig::default(),
        )
        .unwrap();
        assert_eq!(identity, Some(Identity::new(42, Role::Finance)));
    }

    #[test]
    fn test_no_headers_means_no_identity() {
        let identity = extract_identity(&headers(&[]), &IdentityConfig::default()).unwrap();
        assert!(identity.is_none());
    }

    #[test]
    fn test_unknown_role_rejected() {
        let result = extract_identity(
            &headers(&[("x-user-id", "1"), ("x-user-role", "superuser")]),
            &IdentityConfig::default(),
        );
        assert!(matches!(result, Err(ApiError::InvalidIdentity(_))));
    }

    #[test]
    fn test_malformed_id_rejected() {
        let result = extract_identity(
            &headers(&[("x-user-id", "abc"), ("x-user-role", "user")]),
            &IdentityConfig::default(),
        );
        assert!(matches!(result, Err(ApiError::InvalidIdentity(_))));
    }

    #[test]
    fn test_partial_headers_rejected() {
        let result = extract_identity(
            &headers(&[("x-user-role", "admin")]),
            &IdentityConfig::default(),
        );
        assert!(matches!(result, Err(ApiError::InvalidIdentity(_))));
    }

    #[test]
    fn test_custom_header_names() {
        let config = IdentityConfig {
            user_id_header: "x-forwarded-user".into(),
            role_header: "x-forwarded-role".into(),
        };
        let identity = extract_identity(
            &headers(&[("x-forwarded-user", "5"), ("x-forwarded-role", "vendor")]),
            &config,
        )
        .unwrap();
        assert_eq!(identity, Some(Identity::new(5, Role::Vendor)));
    }

    #[tokio::test]
    async fn test_caller_extractor_missing() {
        let req = Request::new(());
        let (mut parts, _) = req.into_parts();

        let result = Caller::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(ApiError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_caller_extractor_success() {
        let req = Request::new(());
        let (mut parts, _) = req.into_parts();
        parts.extensions.insert(Identity::new(3, Role::Manager));

        let Caller(identity) = Caller::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(identity.role, Role::Manager);
    }

    #[tokio::test]
    async fn test_maybe_caller_extractor_none() {
        let req = Request::new(());
        let (mut parts, _) = req.into_parts();

        let MaybeCaller(identity) = MaybeCaller::from_request_parts(&mut parts, &()).await.unwrap();
        assert!(identity.is_none());
    }
}
