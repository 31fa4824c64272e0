//! Access enforcement against the permission registry.
//!
//! A check is a single synchronous pass: no identity ends in
//! [`AccessDenied::Unauthenticated`], an identity lacking the grant ends in a
//! forbidden outcome, anything else is allowed. Nothing is cached between
//! checks.

use crate::{identity::Identity, permission::Permission, registry::PermissionRegistry, role::Role};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// What a caller must satisfy to proceed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// Caller's role must hold this permission.
    Permission(Permission),
    /// Caller's role must hold every listed permission.
    AllPermissions(Vec<Permission>),
    /// Caller's role must be one of the listed roles.
    AnyRole(Vec<Role>),
}

/// Require a single permission.
pub fn require_permission(permission: Permission) -> Requirement {
    Requirement::Permission(permission)
}

/// Require every permission in `permissions`.
pub fn require_all(permissions: impl IntoIterator<Item = Permission>) -> Requirement {
    Requirement::AllPermissions(permissions.into_iter().collect())
}

/// Require the caller's role to be in the allow-list.
pub fn require_role(roles: impl IntoIterator<Item = Role>) -> Requirement {
    Requirement::AnyRole(roles.into_iter().collect())
}

pub fn require_admin() -> Requirement {
    require_role([Role::Admin])
}

pub fn require_manager_or_admin() -> Requirement {
    require_role([Role::Admin, Role::Manager])
}

/// Why a check rejected the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessDenied {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Insufficient permissions")]
    MissingPermission { required: Permission, user_role: Role },

    #[error("Insufficient role permissions")]
    MissingRole { required: Vec<Role>, user_role: Role },
}

impl AccessDenied {
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Unauthenticated)
    }

    pub fn is_forbidden(&self) -> bool {
        !self.is_unauthenticated()
    }
}

/// Gate that evaluates [`Requirement`]s against an injected registry.
#[derive(Debug, Clone)]
pub struct AccessEnforcer {
    registry: Arc<PermissionRegistry>,
}

impl AccessEnforcer {
    pub fn new(registry: Arc<PermissionRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &PermissionRegistry {
        &self.registry
    }

    /// Evaluate `requirement` for the (possibly absent) caller.
    pub fn check(
        &self,
        identity: Option<&Identity>,
        requirement: &Requirement,
    ) -> Result<(), AccessDenied> {
        let Some(identity) = identity else {
            warn!(requirement = ?requirement, "Authorization check without identity");
            return Err(AccessDenied::Unauthenticated);
        };

        let outcome = self.evaluate(identity.role, requirement);

        match &outcome {
            Ok(()) => debug!(
                user_id = identity.id,
                role = %identity.role,
                requirement = ?requirement,
                "Authorization granted"
            ),
            Err(denied) => warn!(
                user_id = identity.id,
                role = %identity.role,
                requirement = ?requirement,
                reason = %denied,
                "Authorization denied"
            ),
        }

        outcome
    }

    /// Shorthand for a single-permission check.
    pub fn require_permission(
        &self,
        identity: Option<&Identity>,
        permission: Permission,
    ) -> Result<(), AccessDenied> {
        self.check(identity, &Requirement::Permission(permission))
    }

    fn evaluate(&self, role: Role, requirement: &Requirement) -> Result<(), AccessDenied> {
        match requirement {
            Requirement::Permission(permission) => {
                if self.registry.has_permission(role, *permission) {
                    Ok(())
                } else {
                    Err(AccessDenied::MissingPermission {
                        required: *permission,
                        user_role: role,
                    })
                }
            }
            Requirement::AllPermissions(permissions) => {
                match self.registry.missing_permissions(role, permissions).first() {
                    None => Ok(()),
                    Some(missing) => Err(AccessDenied::MissingPermission {
                        required: *missing,
                        user_role: role,
                    }),
                }
            }
            Requirement::AnyRole(roles) => {
                if roles.contains(&role) {
                    Ok(())
                } else {
                    Err(AccessDenied::MissingRole {
                        required: roles.clone(),
                        user_role: role,
                    })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enforcer() -> AccessEnforcer {
        AccessEnforcer::new(Arc::new(PermissionRegistry::standard()))
    }

    #[test]
    fn test_finance_can_approve_finance() {
        let identity = Identity::new(1, Role::Finance);
        let result = enforcer().check(
            Some(&identity),
            &require_permission(Permission::FinanceApprove),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_finance_cannot_publish_tender() {
        let identity = Identity::new(1, Role::Finance);
        let result = enforcer().check(
            Some(&identity),
            &require_permission(Permission::TenderPublish),
        );
        assert_eq!(
            result,
            Err(AccessDenied::MissingPermission {
                required: Permission::TenderPublish,
                user_role: Role::Finance,
            })
        );
    }

    #[test]
    fn test_missing_identity_is_unauthenticated() {
        let result = enforcer().check(None, &require_permission(Permission::TenderRead));
        assert_eq!(result, Err(AccessDenied::Unauthenticated));

        let result = enforcer().check(None, &require_admin());
        assert_eq!(result, Err(AccessDenied::Unauthenticated));
    }

    #[test]
    fn test_require_admin() {
        let enforcer = enforcer();
        for role in Role::ALL {
            let identity = Identity::new(1, role);
            let result = enforcer.check(Some(&identity), &require_admin());
            if role == Role::Admin {
                assert!(result.is_ok());
            } else {
                assert_eq!(
                    result,
                    Err(AccessDenied::MissingRole {
                        required: vec![Role::Admin],
                        user_role: role,
                    })
                );
            }
        }
    }

    #[test]
    fn test_require_manager_or_admin() {
        let enforcer = enforcer();
        for role in [Role::Admin, Role::Manager] {
            let identity = Identity::new(1, role);
            assert!(enforcer.check(Some(&identity), &require_manager_or_admin()).is_ok());
        }
        for role in [Role::User, Role::Finance, Role::Vendor] {
            let identity = Identity::new(1, role);
            let denied = enforcer
                .check(Some(&identity), &require_manager_or_admin())
                .unwrap_err();
            assert!(denied.is_forbidden());
        }
    }

    #[test]
    fn test_require_all_reports_first_missing() {
        let identity = Identity::new(9, Role::Vendor);
        let result = enforcer().check(
            Some(&identity),
            &require_all([Permission::TenderRead, Permission::FinanceWrite, Permission::TaskAssign]),
        );
        assert_eq!(
            result,
            Err(AccessDenied::MissingPermission {
                required: Permission::FinanceWrite,
                user_role: Role::Vendor,
            })
        );
    }

    #[test]
    fn test_require_all_empty_is_allowed() {
        let identity = Identity::new(9, Role::Vendor);
        assert!(enforcer().check(Some(&identity), &require_all(Vec::new())).is_ok());
    }

    #[test]
    fn test_cached_permissions_are_not_trusted() {
        let identity = Identity::new(2, Role::Vendor)
            .with_permissions(vec![Permission::SystemConfig]);
        let result = enforcer().require_permission(Some(&identity), Permission::SystemConfig);
        assert!(result.is_err());
    }

    #[test]
    fn test_substituted_registry() {
        let registry = PermissionRegistry::builder()
            .grant(Role::Vendor, Permission::FinanceWrite)
            .build();
        let enforcer = AccessEnforcer::new(Arc::new(registry));
        let vendor = Identity::new(1, Role::Vendor);
        let admin = Identity::new(2, Role::Admin);

        assert!(enforcer.require_permission(Some(&vendor), Permission::FinanceWrite).is_ok());
        assert!(enforcer.require_permission(Some(&admin), Permission::FinanceWrite).is_err());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(AccessDenied::Unauthenticated.to_string(), "Authentication required");
        assert_eq!(
            AccessDenied::MissingPermission {
                required: Permission::TenderPublish,
                user_role: Role::Finance,
            }
            .to_string(),
            "Insufficient permissions"
        );
        assert_eq!(
            AccessDenied::MissingRole {
                required: vec![Role::Admin],
                user_role: Role::User,
            }
            .to_string(),
            "Insufficient role permissions"
        );
    }
}
