//! Server configuration types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::{AddrParseError, SocketAddr};
use tender_rbac::{Permission, PermissionRegistry, RbacResult, Role};

/// Main server configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server binding configuration.
    #[serde(default)]
    pub server: ServerBindConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Trusted identity headers.
    #[serde(default)]
    pub identity: IdentityConfig,
    /// Role grant overrides.
    #[serde(default)]
    pub rbac: RbacConfig,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.server.socket_addr()
    }
}

/// Server binding configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerBindConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Request timeout.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ServerBindConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ServerBindConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty, compact or json).
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Headers an upstream authentication proxy uses to pass the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    #[serde(default = "default_user_id_header")]
    pub user_id_header: String,
    #[serde(default = "default_role_header")]
    pub role_header: String,
}

fn default_user_id_header() -> String {
    "x-user-id".to_string()
}

fn default_role_header() -> String {
    "x-user-role".to_string()
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            user_id_header: default_user_id_header(),
            role_header: default_role_header(),
        }
    }
}

/// Role grant overrides, keyed by role identifier.
///
/// A listed role gets exactly the listed permissions instead of its standard
/// grants. Unlisted roles keep the standard mapping. A grant list may be a
/// sequence or a comma-separated string, so
/// `TENDER__RBAC__OVERRIDES__VENDOR=tender:read,task:read` works from the
/// environment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RbacConfig {
    #[serde(default, deserialize_with = "deserialize_overrides")]
    pub overrides: BTreeMap<String, Vec<String>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum GrantList {
    List(Vec<String>),
    Joined(String),
}

impl From<GrantList> for Vec<String> {
    fn from(grants: GrantList) -> Self {
        match grants {
            GrantList::List(list) => list,
            GrantList::Joined(joined) => joined
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        }
    }
}

fn deserialize_overrides<'de, D>(deserializer: D) -> Result<BTreeMap<String, Vec<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = BTreeMap::<String, GrantList>::deserialize(deserializer)?;
    Ok(raw.into_iter().map(|(role, grants)| (role, grants.into())).collect())
}

impl RbacConfig {
    /// Standard registry with the configured overrides applied.
    pub fn build_registry(&self) -> RbacResult<PermissionRegistry> {
        let mut builder = PermissionRegistry::standard_builder();

        for (role, permissions) in &self.overrides {
            let role: Role = role.parse()?;
            let permissions = permissions
                .iter()
                .map(|p| p.parse::<Permission>())
                .collect::<RbacResult<Vec<_>>>()?;
            builder = builder.replace(role, permissions);
        }

        Ok(builder.build())
    }
}
