//! Middleware for the tender API server.

pub mod authz;
pub mod identity;

pub use authz::{AuthzLayer, AuthzMiddleware};
pub use identity::{Caller, IdentityLayer, IdentityMiddleware, MaybeCaller};
