//! Role-based access control for the tender dashboard.
//!
//! Two pieces:
//!
//! - [`PermissionRegistry`]: the closed role and permission sets and the
//!   immutable mapping between them.
//! - [`AccessEnforcer`]: evaluates a [`Requirement`] for an already
//!   authenticated [`Identity`] and either allows the request or returns an
//!   [`AccessDenied`] outcome.
//!
//! The registry is built once and injected into the enforcer; nothing here is
//! global.

pub mod enforcer;
pub mod error;
pub mod identity;
pub mod permission;
pub mod registry;
pub mod role;

pub use enforcer::{
    require_admin, require_all, require_manager_or_admin, require_permission, require_role,
    AccessDenied, AccessEnforcer, Requirement,
};
pub use error::{RbacError, RbacResult};
pub use identity::Identity;
pub use permission::Permission;
pub use registry::{PermissionRegistry, RegistryBuilder};
pub use role::Role;
