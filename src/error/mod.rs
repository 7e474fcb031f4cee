//! Error handling
//!
//! Defines error types for the store, the verifier and process startup.

pub mod types;

pub use types::*;
