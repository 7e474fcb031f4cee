//! Credential storage
//!
//! Read-only lookup of stored credentials by exact username. Backends never
//! retry; failures are surfaced to the authentication service as-is.

pub mod dynamo;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;

use crate::auth::UserCredential;
use crate::config::{StoreBackend, StoreConfig};
use crate::error::StoreError;

pub use dynamo::DynamoCredentialStore;
pub use memory::MemoryCredentialStore;

/// Source of stored credential records.
///
/// `Ok(None)` means the username has no record. `Err` means the backend could
/// not answer; the two are never folded together here.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn lookup(&self, username: &str) -> Result<Option<UserCredential>, StoreError>;
}

/// Build the configured backend
pub fn build_store(config: &StoreConfig) -> Result<Arc<dyn CredentialStore>, config::ConfigError> {
    match config.backend {
        StoreBackend::Dynamodb => Ok(Arc::new(DynamoCredentialStore::from_config(config)?)),
        StoreBackend::Memory => Ok(Arc::new(MemoryCredentialStore::from_config(config))),
    }
}
