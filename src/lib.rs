pub mod auth;
pub mod config;
pub mod error;
pub mod server;
pub mod storage;
pub mod utils;

pub use auth::{AuthRequest, AuthResult, AuthenticationService};
pub use server::Server;
