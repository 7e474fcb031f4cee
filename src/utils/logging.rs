//! Logging utilities
//!
//! Sets up `env_logger`; `RUST_LOG` overrides the default `info` filter.

use env_logger::Env;

/// Setup logging for the service
pub fn setup_logging() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
}
