//! Authentication system
//!
//! Credential records, password verification, input screening and the
//! service that ties them to a credential store.

pub mod credentials;
pub mod password;
pub mod results;
pub mod service;
pub mod validator;

pub use credentials::{AuthRequest, UserCredential};
pub use password::{PasswordVerifier, hash_password};
pub use results::AuthResult;
pub use service::{AuthLimits, AuthenticationService};
