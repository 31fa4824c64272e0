//! Shared application state.

use crate::config::ServerConfig;
use anyhow::{Context, Result};
use std::sync::Arc;
use tender_rbac::{AccessEnforcer, PermissionRegistry};
use tracing::info;

/// State handed to every handler. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub enforcer: AccessEnforcer,
}

impl AppState {
    /// Build state from configuration, applying any role overrides.
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let registry = config
            .rbac
            .build_registry()
            .context("Invalid role overrides")?;

        if !config.rbac.overrides.is_empty() {
            info!(
                roles = ?config.rbac.overrides.keys().collect::<Vec<_>>(),
                "Applied role permission overrides"
            );
        }

        Ok(Self::with_registry(config.clone(), registry))
    }

    /// Build state around an explicit registry.
    pub fn with_registry(config: ServerConfig, registry: PermissionRegistry) -> Self {
        Self {
            config: Arc::new(config),
            enforcer: AccessEnforcer::new(Arc::new(registry)),
        }
    }

    pub fn registry(&self) -> &PermissionRegistry {
        self.enforcer.registry()
    }
}
