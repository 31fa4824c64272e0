//! Configuration validation.

use super::types::ServerConfig;
use axum::http::HeaderName;
use tender_rbac::{Permission, RbacError, Role};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid port: {0}")]
    InvalidPort(u16),

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}")]
    InvalidLogFormat(String),

    #[error("Invalid identity header name: {0}")]
    InvalidHeaderName(String),

    #[error("Invalid role override: {0}")]
    InvalidOverride(#[from] RbacError),
}

/// Validate server configuration.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // Validate port
    if config.server.port == 0 {
        errors.push(ConfigError::InvalidPort(0));
    }

    if config.socket_addr().is_err() {
        errors.push(ConfigError::InvalidBindAddress(config.server.host.clone()));
    }

    // Validate log level
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.logging.level.to_lowercase().as_str()) {
        errors.push(ConfigError::InvalidLogLevel(config.logging.level.clone()));
    }

    let valid_formats = ["pretty", "compact", "json"];
    if !valid_formats.contains(&config.logging.format.to_lowercase().as_str()) {
        errors.push(ConfigError::InvalidLogFormat(config.logging.format.clone()));
    }

    for header in [&config.identity.user_id_header, &config.identity.role_header] {
        if HeaderName::try_from(header.as_str()).is_err() {
            errors.push(ConfigError::InvalidHeaderName(header.clone()));
        }
    }

    // Validate role overrides
    for (role, permissions) in &config.rbac.overrides {
        if let Err(err) = role.parse::<Role>() {
            errors.push(err.into());
        }
        for permission in permissions {
            if let Err(err) = permission.parse::<Permission>() {
                errors.push(err.into());
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::*;

    #[test]
    fn test_valid_config() {
        let config = ServerConfig::default();
        let result = validate_config(&config);
        assert!(result.is_ok());
    }

    #[test]
    fn test_invalid_port() {
        let mut config = ServerConfig::default();
        config.server.port = 0;

        let result = validate_config(&config);
        assert!(result.unwrap_err().iter().any(|e| matches!(e, ConfigError::InvalidPort(0))));
    }

    #[test]
    fn test_invalid_bind_address() {
        let mut config = ServerConfig::default();
        config.server.host = "not an address".to_string();

        let result = validate_config(&config);
        assert!(result
            .unwrap_err()
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidBindAddress(_))));
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = ServerConfig::default();
        config.logging.level = "invalid".to_string();

        let result = validate_config(&config);
        assert!(result.unwrap_err().iter().any(|e| matches!(e, ConfigError::InvalidLogLevel(_))));
    }

    #[test]
    fn test_invalid_header_name() {
        let mut config = ServerConfig::default();
        config.identity.role_header = "x user role".to_string();

        let result = validate_config(&config);
        assert!(result
            .unwrap_err()
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidHeaderName(_))));
    }

    #[test]
    fn test_override_errors_are_collected() {
        let mut config = ServerConfig::default();
        config
            .rbac
            .overrides
            .insert("auditor".into(), vec!["report:read".into()]);
        config
            .rbac
            .overrides
            .insert("vendor".into(), vec!["tender:bid".into()]);

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| matches!(
            e,
            ConfigError::InvalidOverride(RbacError::UnknownRole(role)) if role == "auditor"
        )));
        assert!(errors.iter().any(|e| matches!(
            e,
            ConfigError::InvalidOverride(RbacError::UnknownPermission(p)) if p == "tender:bid"
        )));
    }

    #[test]
    fn test_override_builds_registry() {
        let mut config = ServerConfig::default();
        config
            .rbac
            .overrides
            .insert("vendor".into(), vec!["tender:read".into(), "finance:read".into()]);

        assert!(validate_config(&config).is_ok());
        let registry = config.rbac.build_registry().unwrap();
        assert!(registry.has_permission(Role::Vendor, Permission::FinanceRead));
        assert!(!registry.has_permission(Role::Vendor, Permission::ReportRead));
        assert!(registry.has_permission(Role::Finance, Permission::FinanceApprove));
    }
}
