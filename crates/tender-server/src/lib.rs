//! Tender API Server
//!
//! HTTP surface for the tender dashboard's access control. Authentication is
//! upstream; this server attaches the forwarded caller identity, enforces
//! role and permission requirements per route, and exposes the role to
//! permission mapping for UI gating.
//!
//! # Architecture
//!
//! - **Middleware**: identity attachment and authorization layers
//! - **Routes**: registry export and health endpoints
//! - **State**: the injected permission registry and enforcer
//!
//! # Features
//!
//! - `tracing` - Structured logging with tracing-subscriber

#![warn(clippy::all)]

pub mod config;
pub mod error;
#[cfg(feature = "tracing")]
pub mod logging;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use state::AppState;

use anyhow::Context;
use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Server builder for constructing and running the API server.
pub struct Server {
    addr: SocketAddr,
    state: AppState,
}

impl Server {
    /// Create a new server with the given configuration.
    pub fn new(config: ServerConfig) -> Result<Self, anyhow::Error> {
        let addr = config
            .socket_addr()
            .with_context(|| format!("Invalid bind address {}:{}", config.server.host, config.server.port))?;
        let state = AppState::new(&config)?;
        Ok(Self { addr, state })
    }

    /// Build the router with all routes and middleware.
    pub fn router(&self) -> Router {
        routes::create_router(self.state.clone())
    }

    /// Run the server, binding to the configured address.
    pub async fn run(self) -> Result<(), anyhow::Error> {
        let listener = TcpListener::bind(self.addr).await?;

        info!("Server listening on {}", self.addr);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown");
}
