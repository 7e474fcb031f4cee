//! Credential records and requests
//!
//! `UserCredential` is what a store hands back; `AuthRequest` is what a caller
//! hands in. Neither prints its secret half through `Debug`.

use std::fmt;

use zeroize::Zeroizing;

/// Stored credential for one user, read from a backend for a single request.
///
/// The hash is opaque outside the password verifier.
#[derive(Clone, PartialEq, Eq)]
pub struct UserCredential {
    username: String,
    password_hash: String,
}

impl UserCredential {
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn password_hash(&self) -> &str {
        &self.password_hash
    }
}

impl fmt::Debug for UserCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserCredential")
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

/// A claimed username and plaintext password.
///
/// The password buffer is zeroed when the request is dropped.
pub struct AuthRequest {
    username: String,
    password: Zeroizing<String>,
}

impl AuthRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Zeroizing::new(password.into()),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for AuthRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
