//! Tender Server Binary

use anyhow::{bail, Result};
use tender_server::{
    config::{load_config, validate_config},
    Server,
};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = load_config()?;

    // Initialize tracing
    #[cfg(feature = "tracing")]
    tender_server::logging::init(&config.logging)?;

    if let Err(errors) = validate_config(&config) {
        for err in &errors {
            error!(error = %err, "Invalid configuration");
        }
        bail!("configuration has {} error(s)", errors.len());
    }

    info!(
        "Starting Tender Server v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Create and run server
    let server = Server::new(config)?;
    server.run().await?;

    info!("Server shutdown complete");
    Ok(())
}
