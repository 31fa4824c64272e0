//! Role to permission registry.
//!
//! The registry is built once at startup and only read afterwards. Lookups
//! never fail: a role without grants, or a raw role string outside the closed
//! set, resolves to "no permissions".

use crate::{permission::Permission, role::Role};
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// Immutable mapping from every [`Role`] to its permission set.
#[derive(Debug, Clone)]
pub struct PermissionRegistry {
    grants: HashMap<Role, HashSet<Permission>>,
    display_names: HashMap<Role, String>,
}

impl PermissionRegistry {
    /// Start an empty registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Builder preloaded with the standard grants and display names.
    pub fn standard_builder() -> RegistryBuilder {
        let mut builder = Self::builder().grant_all(Role::Admin);

        builder = builder.grant_many(
            Role::Manager,
            [
                Permission::TenderCreate,
                Permission::TenderRead,
                Permission::TenderUpdate,
                Permission::TenderPublish,
                Permission::VendorRead,
                Permission::VendorUpdate,
                Permission::VendorApprove,
                Permission::FinanceRead,
                Permission::TaskCreate,
                Permission::TaskRead,
                Permission::TaskUpdate,
                Permission::TaskAssign,
                Permission::AiAccess,
                Permission::AnalyticsRead,
                Permission::BlockchainVerify,
                Permission::ReportRead,
                Permission::ReportExport,
            ],
        );

        builder = builder.grant_many(
            Role::User,
            [
                Permission::TenderRead,
                Permission::TenderUpdate,
                Permission::VendorRead,
                Permission::TaskRead,
                Permission::TaskUpdate,
                Permission::AiAccess,
                Permission::ReportRead,
            ],
        );

        builder = builder.grant_many(
            Role::Finance,
            [
                Permission::TenderRead,
                Permission::VendorRead,
                Permission::FinanceRead,
                Permission::FinanceWrite,
                Permission::FinanceEmd,
                Permission::FinanceApprove,
                Permission::TaskRead,
                Permission::AnalyticsRead,
                Permission::ReportRead,
                Permission::ReportExport,
            ],
        );

        builder = builder.grant_many(
            Role::Vendor,
            [
                Permission::TenderRead,
                Permission::VendorRead,
                Permission::TaskRead,
                Permission::ReportRead,
            ],
        );

        for role in Role::ALL {
            builder = builder.display_name(role, role.default_display_name());
        }

        builder
    }

    /// The standard tender dashboard mapping.
    pub fn standard() -> Self {
        Self::standard_builder().build()
    }

    /// True iff `permission` is granted to `role`.
    pub fn has_permission(&self, role: Role, permission: Permission) -> bool {
        self.grants
            .get(&role)
            .map(|permissions| permissions.contains(&permission))
            .unwrap_or(false)
    }

    /// Same as [`has_permission`](Self::has_permission) for an unparsed role
    /// identifier. Unknown roles are denied.
    pub fn has_permission_str(&self, role: &str, permission: Permission) -> bool {
        role.parse::<Role>()
            .map(|role| self.has_permission(role, permission))
            .unwrap_or(false)
    }

    /// True iff every permission in `required` is granted. An empty list is
    /// always accessible.
    pub fn can_access(&self, role: Role, required: &[Permission]) -> bool {
        required
            .iter()
            .all(|permission| self.has_permission(role, *permission))
    }

    /// Permissions from `required` that `role` does not hold, in input order.
    pub fn missing_permissions(&self, role: Role, required: &[Permission]) -> Vec<Permission> {
        let mut seen = HashSet::new();
        required
            .iter()
            .copied()
            .filter(|permission| !self.has_permission(role, *permission))
            .filter(|permission| seen.insert(*permission))
            .collect()
    }

    /// Sorted permission list granted to `role`.
    pub fn permissions_for(&self, role: Role) -> Vec<Permission> {
        let mut permissions: Vec<_> = self
            .grants
            .get(&role)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();
        permissions.sort();
        permissions
    }

    /// Registered display name, falling back to the wire identifier.
    pub fn display_name(&self, role: Role) -> &str {
        self.display_names
            .get(&role)
            .map(String::as_str)
            .unwrap_or_else(|| role.as_str())
    }

    /// Display name for an unparsed role identifier, falling back to the raw
    /// identifier itself.
    pub fn role_display_name(&self, role: &str) -> String {
        match role.parse::<Role>() {
            Ok(role) => self.display_name(role).to_string(),
            Err(_) => role.to_string(),
        }
    }

    /// Iterate roles in declaration order with their sorted grants.
    pub fn roles(&self) -> impl Iterator<Item = (Role, Vec<Permission>)> + '_ {
        Role::ALL
            .into_iter()
            .map(move |role| (role, self.permissions_for(role)))
    }
}

impl Default for PermissionRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Builder for [`PermissionRegistry`].
#[derive(Debug, Clone, Default)]
pub struct RegistryBuilder {
    grants: HashMap<Role, HashSet<Permission>>,
    display_names: HashMap<Role, String>,
}

impl RegistryBuilder {
    /// Grant a single permission.
    pub fn grant(mut self, role: Role, permission: Permission) -> Self {
        self.grants.entry(role).or_default().insert(permission);
        self
    }

    /// Grant several permissions. Duplicates collapse.
    pub fn grant_many(
        mut self,
        role: Role,
        permissions: impl IntoIterator<Item = Permission>,
    ) -> Self {
        self.grants.entry(role).or_default().extend(permissions);
        self
    }

    /// Grant every declared permission.
    pub fn grant_all(self, role: Role) -> Self {
        self.grant_many(role, Permission::ALL.iter().copied())
    }

    /// Replace whatever `role` held with exactly `permissions`.
    pub fn replace(
        mut self,
        role: Role,
        permissions: impl IntoIterator<Item = Permission>,
    ) -> Self {
        self.grants.insert(role, permissions.into_iter().collect());
        self
    }

    /// Register an explicit entry for `role` with no permissions.
    pub fn deny_all(mut self, role: Role) -> Self {
        self.grants.insert(role, HashSet::new());
        self
    }

    pub fn display_name(mut self, role: Role, name: impl Into<String>) -> Self {
        self.display_names.insert(role, name.into());
        self
    }

    /// Finish the registry. Roles without an entry get an empty set.
    pub fn build(mut self) -> PermissionRegistry {
        for role in Role::ALL {
            if !self.grants.contains_key(&role) {
                warn!(role = %role, "Role has no permission entry, denying everything");
                self.grants.insert(role, HashSet::new());
            }
        }

        PermissionRegistry {
            grants: self.grants,
            display_names: self.display_names,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_holds_every_permission() {
        let registry = PermissionRegistry::standard();
        for permission in Permission::ALL {
            assert!(registry.has_permission(Role::Admin, *permission));
        }
    }

    #[test]
    fn test_standard_grant_sizes() {
        let registry = PermissionRegistry::standard();
        assert_eq!(registry.permissions_for(Role::Admin).len(), 27);
        assert_eq!(registry.permissions_for(Role::Manager).len(), 17);
        assert_eq!(registry.permissions_for(Role::User).len(), 7);
        assert_eq!(registry.permissions_for(Role::Finance).len(), 10);
        assert_eq!(registry.permissions_for(Role::Vendor).len(), 4);
    }

    #[test]
    fn test_finance_grants() {
        let registry = PermissionRegistry::standard();
        assert!(registry.has_permission(Role::Finance, Permission::FinanceApprove));
        assert!(registry.has_permission(Role::Finance, Permission::FinanceEmd));
        assert!(!registry.has_permission(Role::Finance, Permission::TenderPublish));
    }

    #[test]
    fn test_manager_cannot_delete_tenders() {
        let registry = PermissionRegistry::standard();
        assert!(registry.has_permission(Role::Manager, Permission::TenderPublish));
        assert!(!registry.has_permission(Role::Manager, Permission::TenderDelete));
        assert!(!registry.has_permission(Role::Manager, Permission::FinanceApprove));
    }

    #[test]
    fn test_unknown_role_string_is_denied() {
        let registry = PermissionRegistry::standard();
        assert!(!registry.has_permission_str("root", Permission::TenderRead));
        assert!(!registry.has_permission_str("", Permission::TenderRead));
        assert!(registry.has_permission_str("vendor", Permission::TenderRead));
    }

    #[test]
    fn test_can_access() {
        let registry = PermissionRegistry::standard();
        assert!(registry.can_access(Role::Vendor, &[]));
        assert!(registry.can_access(Role::Vendor, &[Permission::TenderRead, Permission::ReportRead]));
        assert!(!registry.can_access(
            Role::Vendor,
            &[Permission::TenderRead, Permission::FinanceWrite]
        ));
    }

    #[test]
    fn test_missing_permissions() {
        let registry = PermissionRegistry::standard();
        let missing = registry.missing_permissions(
            Role::User,
            &[
                Permission::TaskAssign,
                Permission::TenderRead,
                Permission::TaskAssign,
                Permission::ReportExport,
            ],
        );
        assert_eq!(missing, vec![Permission::TaskAssign, Permission::ReportExport]);
    }

    #[test]
    fn test_display_names() {
        let registry = PermissionRegistry::standard();
        assert_eq!(registry.display_name(Role::Finance), "Finance Officer");
        assert_eq!(registry.role_display_name("admin"), "System Administrator");
        assert_eq!(registry.role_display_name("auditor"), "auditor");
    }

    #[test]
    fn test_display_name_falls_back_to_identifier() {
        let registry = PermissionRegistry::builder().grant_all(Role::Admin).build();
        assert_eq!(registry.display_name(Role::Vendor), "vendor");
    }

    #[test]
    fn test_missing_entry_denies_everything() {
        let registry = PermissionRegistry::builder()
            .grant(Role::Admin, Permission::SystemConfig)
            .build();

        for role in [Role::Manager, Role::User, Role::Finance, Role::Vendor] {
            assert!(registry.permissions_for(role).is_empty());
            assert!(!registry.has_permission(role, Permission::TenderRead));
        }
        assert!(registry.has_permission(Role::Admin, Permission::SystemConfig));
    }

    #[test]
    fn test_replace_overrides_standard_grants() {
        let registry = PermissionRegistry::standard_builder()
            .replace(Role::Vendor, [Permission::TenderRead])
            .build();

        assert_eq!(registry.permissions_for(Role::Vendor), vec![Permission::TenderRead]);
        assert!(!registry.has_permission(Role::Vendor, Permission::ReportRead));
    }

    #[test]
    fn test_duplicates_collapse() {
        let registry = PermissionRegistry::builder()
            .grant_many(
                Role::User,
                [Permission::TaskRead, Permission::TaskRead, Permission::TaskRead],
            )
            .build();
        assert_eq!(registry.permissions_for(Role::User), vec![Permission::TaskRead]);
    }

    #[test]
    fn test_roles_iterates_in_declaration_order() {
        let registry = PermissionRegistry::standard();
        let roles: Vec<_> = registry.roles().map(|(role, _)| role).collect();
        assert_eq!(roles, Role::ALL.to_vec());
    }
}
