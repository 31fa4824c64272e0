//! Role definitions.

use crate::error::RbacError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identity category that determines a fixed permission set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full system administration.
    Admin,
    /// Runs tenders and approves vendors.
    Manager,
    /// Regular team member.
    User,
    /// Handles finance, EMD and approvals.
    Finance,
    /// External vendor account.
    Vendor,
}

impl Role {
    /// Every declared role.
    pub const ALL: [Role; 5] = [
        Role::Admin,
        Role::Manager,
        Role::User,
        Role::Finance,
        Role::Vendor,
    ];

    /// Wire identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::User => "user",
            Self::Finance => "finance",
            Self::Vendor => "vendor",
        }
    }

    /// Built-in human readable name.
    pub fn default_display_name(&self) -> &'static str {
        match self {
            Self::Admin => "System Administrator",
            Self::Manager => "Project Manager",
            Self::User => "Team Member",
            Self::Finance => "Finance Officer",
            Self::Vendor => "Vendor User",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = RbacError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| RbacError::UnknownRole(s.to_string()))
    }
}
