//! Authentication service
//!
//! Combines a credential store with the password verifier and folds every
//! internal signal into one of three `AuthResult` outcomes. Calls share no
//! mutable state and may run concurrently without coordination.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use tokio::time::timeout;
use zeroize::Zeroizing;

use super::credentials::AuthRequest;
use super::password::PasswordVerifier;
use super::results::AuthResult;
use super::validator::{InputLimits, is_valid_password, is_valid_username};
use crate::config::AuthServerConfig;
use crate::error::{StoreError, VerifyError};
use crate::storage::CredentialStore;

/// Time and size bounds applied to every authentication call
#[derive(Debug, Clone, Copy)]
pub struct AuthLimits {
    pub lookup_timeout: Duration,
    pub verify_timeout: Duration,
    pub input: InputLimits,
}

impl AuthLimits {
    pub fn from_config(config: &AuthServerConfig) -> Self {
        Self {
            lookup_timeout: config.lookup_timeout(),
            verify_timeout: config.verify_timeout(),
            input: InputLimits {
                max_username_length: config.max_username_length,
                max_password_length: config.max_password_length,
            },
        }
    }
}

impl Default for AuthLimits {
    fn default() -> Self {
        Self {
            lookup_timeout: Duration::from_secs(3),
            verify_timeout: Duration::from_secs(5),
            input: InputLimits {
                max_username_length: 128,
                max_password_length: 1024,
            },
        }
    }
}

#[derive(Clone)]
pub struct AuthenticationService {
    store: Arc<dyn CredentialStore>,
    verifier: PasswordVerifier,
    limits: AuthLimits,
}

impl AuthenticationService {
    pub fn new(store: Arc<dyn CredentialStore>, verifier: PasswordVerifier, limits: AuthLimits) -> Self {
        Self {
            store,
            verifier,
            limits,
        }
    }

    /// Decide whether `request` matches a stored credential.
    ///
    /// Unknown users, wrong passwords, corrupt records and malformed input all
    /// yield `InvalidCredentials`, after the same amount of hashing work.
    /// Backend failures and elapsed bounds yield `StoreUnavailable`.
    pub async fn authenticate(&self, request: AuthRequest) -> AuthResult {
        let username = request.username();

        if !is_valid_username(username, &self.limits.input)
            || !is_valid_password(request.password(), &self.limits.input)
        {
            debug!("Rejecting malformed authentication input");
            let _ = self.verify_bounded(request.password(), None).await;
            return AuthResult::InvalidCredentials;
        }

        let record = match timeout(self.limits.lookup_timeout, self.store.lookup(username)).await {
            Err(_) => {
                warn!(
                    "Credential lookup timed out after {:?}",
                    self.limits.lookup_timeout
                );
                return AuthResult::StoreUnavailable;
            }
            Ok(Err(e @ StoreError::Backend(_))) => {
                warn!("Credential lookup failed: {e}");
                return AuthResult::StoreUnavailable;
            }
            Ok(Err(e @ StoreError::CorruptRecord(_))) => {
                warn!("Ignoring unusable record for {username}: {e}");
                None
            }
            Ok(Ok(record)) => record,
        };

        let outcome = match record {
            Some(record) => {
                debug!("Found login details for {username}");
                let stored = record.password_hash().to_owned();
                self.verify_bounded(request.password(), Some(stored)).await
            }
            None => self
                .verify_bounded(request.password(), None)
                .await
                .map(|_| false),
        };

        match outcome {
            Ok(true) => {
                info!("Authenticated {username}");
                AuthResult::Authenticated
            }
            Ok(false) => {
                info!("Rejected credentials for {username}");
                AuthResult::InvalidCredentials
            }
            Err(e) => {
                warn!("Password check for {username} did not complete: {e}");
                AuthResult::StoreUnavailable
            }
        }
    }

    /// Runs verification on the blocking pool under `verify_timeout`.
    /// `None` verifies against the reference hash.
    async fn verify_bounded(&self, password: &str, stored_hash: Option<String>) -> Result<bool, VerifyError> {
        let verifier = self.verifier.clone();
        let password = Zeroizing::new(password.to_owned());

        let task = tokio::task::spawn_blocking(move || match stored_hash {
            Some(hash) => verifier.verify(&password, &hash),
            None => verifier.verify_reference(&password),
        });

        match timeout(self.limits.verify_timeout, task).await {
            Err(_) => Err(VerifyError::Timeout),
            Ok(Err(_)) => Err(VerifyError::Aborted),
            Ok(Ok(matched)) => Ok(matched),
        }
    }
}
