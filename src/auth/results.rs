//! Authentication result types
//!
//! Defines the closed outcome returned by the authentication service.

/// Outcome of a single `authenticate` call.
///
/// Unknown usernames and wrong passwords both map to `InvalidCredentials`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthResult {
    Authenticated,
    InvalidCredentials,
    /// The backend failed or a bound elapsed. Not a judgment on the credentials.
    StoreUnavailable,
}
