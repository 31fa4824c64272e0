//! Permission identifiers.
//!
//! Every permission is a flat `<resource>:<action>` identifier. The set is
//! closed: new permissions are added here, never at runtime.

use crate::error::RbacError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! permissions {
    ($( $(#[$meta:meta])* $variant:ident => $wire:literal ),+ $(,)?) => {
        /// Atomic capability of the form `resource:action`.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum Permission {
            $(
                $(#[$meta])*
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl Permission {
            /// Every declared permission, in declaration order.
            pub const ALL: &'static [Permission] = &[$(Permission::$variant),+];

            /// Wire identifier.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }
    };
}

permissions! {
    // Tender management
    TenderCreate => "tender:create",
    TenderRead => "tender:read",
    TenderUpdate => "tender:update",
    TenderDelete => "tender:delete",
    TenderPublish => "tender:publish",

    // Vendor management
    VendorCreate => "vendor:create",
    VendorRead => "vendor:read",
    VendorUpdate => "vendor:update",
    VendorDelete => "vendor:delete",
    VendorApprove => "vendor:approve",

    // Finance management
    FinanceRead => "finance:read",
    FinanceWrite => "finance:write",
    /// Earnest money deposit handling.
    FinanceEmd => "finance:emd",
    FinanceApprove => "finance:approve",

    // Task management
    TaskCreate => "task:create",
    TaskRead => "task:read",
    TaskUpdate => "task:update",
    TaskDelete => "task:delete",
    TaskAssign => "task:assign",

    // System administration
    SystemConfig => "system:config",
    UserManage => "user:manage",
    RoleManage => "role:manage",

    // AI and analytics
    AiAccess => "ai:access",
    AnalyticsRead => "analytics:read",
    BlockchainVerify => "blockchain:verify",

    // Reports
    ReportRead => "report:read",
    ReportExport => "report:export",
}

impl Permission {
    /// Resource half of the identifier (`tender` for `tender:publish`).
    pub fn resource(&self) -> &'static str {
        match self.as_str().split_once(':') {
            Some((resource, _)) => resource,
            None => self.as_str(),
        }
    }

    /// Action half of the identifier (`publish` for `tender:publish`).
    pub fn action(&self) -> &'static str {
        match self.as_str().split_once(':') {
            Some((_, action)) => action,
            None => self.as_str(),
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = RbacError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .iter()
            .copied()
            .find(|permission| permission.as_str() == s)
            .ok_or_else(|| RbacError::UnknownPermission(s.to_string()))
    }
}
