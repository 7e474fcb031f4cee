use std::io;
use std::net::SocketAddr;

use axum::Router;
use log::{info, warn};
use tokio::net::TcpListener;

use super::routes::router;
use crate::auth::{AuthLimits, AuthenticationService, PasswordVerifier};
use crate::config::AuthServerConfig;
use crate::error::ServerError;
use crate::storage::build_store;

/// Wire the configured store and verifier into a service.
pub fn build_service(config: &AuthServerConfig) -> Result<AuthenticationService, ServerError> {
    let store = build_store(&config.store)?;
    let verifier = PasswordVerifier::new(config.timing_reference_hash.clone(), &config.hashing)?;
    info!("Using {:?} credential backend", config.store.backend);

    Ok(AuthenticationService::new(
        store,
        verifier,
        AuthLimits::from_config(config),
    ))
}

pub struct Server {
    listener: TcpListener,
    router: Router,
}

impl Server {
    pub async fn new(
        config: &AuthServerConfig,
        service: AuthenticationService,
    ) -> Result<Self, ServerError> {
        let addr = config.listen_address();

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.clone(),
                source,
            })?;
        info!("Server bound to {}", addr);

        Ok(Self {
            listener,
            router: router(service),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serve requests until ctrl-c or a listener error.
    pub async fn start(self) -> Result<(), ServerError> {
        info!("Starting authentication server on {}", self.local_addr()?);

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Authentication server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
