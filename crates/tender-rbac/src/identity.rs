//! Authenticated caller identity.

use crate::{permission::Permission, role::Role};
use serde::{Deserialize, Serialize};

/// Caller context attached by an upstream authentication step.
///
/// The enforcer trusts this value as verified. Deserialization rejects roles
/// and permissions outside the closed sets, so an invalid identity never
/// reaches a permission check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,
    pub role: Role,
    /// Permissions cached by the upstream step. Informational only; access
    /// decisions always consult the registry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<Permission>>,
}

impl Identity {
    pub fn new(id: i64, role: Role) -> Self {
        Self {
            id,
            role,
            permissions: None,
        }
    }

    /// Attach a cached permission list.
    pub fn with_permissions(mut self, permissions: Vec<Permission>) -> Self {
        self.permissions = Some(permissions);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_identity() {
        let identity: Identity =
            serde_json::from_str(r#"{"id": 7, "role": "finance"}"#).unwrap();
        assert_eq!(identity, Identity::new(7, Role::Finance));
    }

    #[test]
    fn test_deserialize_with_permission_cache() {
        let identity: Identity = serde_json::from_str(
            r#"{"id": 1, "role": "vendor", "permissions": ["tender:read"]}"#,
        )
        .unwrap();
        assert_eq!(identity.permissions, Some(vec![Permission::TenderRead]));
    }

    #[test]
    fn test_unknown_role_rejected_at_boundary() {
        let result = serde_json::from_str::<Identity>(r#"{"id": 1, "role": "root"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_cached_permission_rejected() {
        let result = serde_json::from_str::<Identity>(
            r#"{"id": 1, "role": "user", "permissions": ["tender:nuke"]}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_skips_empty_cache() {
        let json = serde_json::to_string(&Identity::new(3, Role::Manager)).unwrap();
        assert_eq!(json, r#"{"id":3,"role":"manager"}"#);
    }
}
