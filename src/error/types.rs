//! Error types
//!
//! Internal error taxonomy. None of these cross the service boundary; the
//! authentication service folds them into an `AuthResult`.

use std::io;

use thiserror::Error;

/// Credential store errors
///
/// A missing record is not an error (`lookup` returns `Ok(None)`).
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend could not be reached or rejected the request.
    #[error("credential backend failure: {0}")]
    Backend(String),
    /// A record exists but carries no usable hash attribute.
    #[error("credential record is corrupt: {0}")]
    CorruptRecord(String),
}

/// Password verification errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerifyError {
    #[error("stored hash is malformed or uses an unknown algorithm")]
    MalformedHash,
    #[error("password verification timed out")]
    Timeout,
    #[error("password verification task aborted")]
    Aborted,
    #[error("failed to derive password hash: {0}")]
    Hashing(String),
}

/// Process-level errors raised while starting the service
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("failed to bind {addr}: {source}")]
    Bind { addr: String, source: io::Error },
    #[error("password verifier setup failed: {0}")]
    Verifier(#[from] VerifyError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
