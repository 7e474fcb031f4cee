//! HTTP transport
//!
//! Thin axum front over the authentication service: listener setup in
//! `core`, request handling and result mapping in `routes`.

pub mod core;
pub mod routes;

pub use self::core::{Server, build_service};
pub use routes::{router, status_for};
