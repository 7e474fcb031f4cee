//! Password verification against self-describing adaptive hashes.
//!
//! Stored hashes carry their own algorithm id, cost and salt. Argon2 PHC
//! strings and bcrypt modular-crypt strings are understood; anything else is
//! treated as a failed verification. Both back-ends compare digests in
//! constant time.

use std::sync::Arc;

use argon2::password_hash::{self, SaltString};
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier as _, Version};
use log::warn;
use rand::distributions::{Alphanumeric, DistString};
use rand::rngs::OsRng;

use crate::config::HashingConfig;
use crate::error::VerifyError;

const ARGON2_PREFIXES: [&str; 3] = ["$argon2id$", "$argon2i$", "$argon2d$"];
const BCRYPT_PREFIXES: [&str; 4] = ["$2a$", "$2b$", "$2x$", "$2y$"];
const REFERENCE_PASSWORD_LEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scheme {
    Argon2,
    Bcrypt,
}

fn scheme_of(stored_hash: &str) -> Option<Scheme> {
    if ARGON2_PREFIXES.iter().any(|p| stored_hash.starts_with(p)) {
        Some(Scheme::Argon2)
    } else if BCRYPT_PREFIXES.iter().any(|p| stored_hash.starts_with(p)) {
        Some(Scheme::Bcrypt)
    } else {
        None
    }
}

fn argon2_config(params: &HashingConfig) -> Result<Argon2<'static>, password_hash::Error> {
    let params = Params::new(params.memory_kib, params.iterations, params.parallelism, None)?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hashes a password with Argon2id and returns the PHC string.
pub fn hash_password(plaintext: &str, params: &HashingConfig) -> Result<String, password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = argon2_config(params)?;
    Ok(argon2.hash_password(plaintext.as_bytes(), &salt)?.to_string())
}

/// Checks a plaintext against a stored hash, distinguishing a mismatch
/// (`Ok(false)`) from a hash that cannot be used at all.
fn check(plaintext: &str, stored_hash: &str) -> Result<bool, VerifyError> {
    match scheme_of(stored_hash).ok_or(VerifyError::MalformedHash)? {
        Scheme::Argon2 => {
            let parsed = PasswordHash::new(stored_hash).map_err(|_| VerifyError::MalformedHash)?;
            // Cost and salt are taken from `parsed`, not from the default instance.
            match Argon2::default().verify_password(plaintext.as_bytes(), &parsed) {
                Ok(()) => Ok(true),
                Err(password_hash::Error::Password) => Ok(false),
                Err(_) => Err(VerifyError::MalformedHash),
            }
        }
        Scheme::Bcrypt => {
            bcrypt::verify(plaintext, stored_hash).map_err(|_| VerifyError::MalformedHash)
        }
    }
}

/// Verifies plaintext passwords against stored hashes.
///
/// Also holds a reference hash so that attempts with no stored record can pay
/// the same hashing cost as attempts with one.
#[derive(Clone)]
pub struct PasswordVerifier {
    reference_hash: Arc<str>,
}

impl PasswordVerifier {
    /// Builds a verifier from an operator-supplied reference hash, or
    /// generates one from a random password with `params`.
    pub fn new(reference_hash: Option<String>, params: &HashingConfig) -> Result<Self, VerifyError> {
        let reference_hash = match reference_hash {
            Some(hash) => {
                if let Err(VerifyError::MalformedHash) = check("", &hash) {
                    return Err(VerifyError::MalformedHash);
                }
                hash
            }
            None => {
                let password = Alphanumeric.sample_string(&mut OsRng, REFERENCE_PASSWORD_LEN);
                hash_password(&password, params).map_err(|e| VerifyError::Hashing(e.to_string()))?
            }
        };

        Ok(Self {
            reference_hash: reference_hash.into(),
        })
    }

    /// Returns `true` only when `plaintext` matches `stored_hash`.
    /// Malformed or unsupported hashes verify as `false`, after the same
    /// hashing work as a miss.
    pub fn verify(&self, plaintext: &str, stored_hash: &str) -> bool {
        match check(plaintext, stored_hash) {
            Ok(matched) => matched,
            Err(e) => {
                warn!("Rejecting credential: {e}");
                self.verify_reference(plaintext)
            }
        }
    }

    /// Runs a full verification against the reference hash. Always fails.
    pub fn verify_reference(&self, plaintext: &str) -> bool {
        let _ = check(plaintext, &self.reference_hash);
        false
    }
}
