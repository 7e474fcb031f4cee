//! Grouper authentication service - Entry Point
//!
//! Verifies username/password logins against stored adaptive hashes.

use log::{error, info};

use grouper_auth::config::AuthServerConfig;
use grouper_auth::error::ServerError;
use grouper_auth::server::{Server, build_service};
use grouper_auth::utils::logging::setup_logging;

async fn run() -> Result<(), ServerError> {
    let config = AuthServerConfig::load()?;
    let service = build_service(&config)?;

    let server = Server::new(&config, service).await?;
    server.start().await
}

#[tokio::main]
async fn main() {
    setup_logging();

    info!("Launching authentication service...");

    if let Err(e) = run().await {
        error!("Authentication service failed: {}", e);
        std::process::exit(1);
    }
}
