//! Logging setup
//!
//! Installs a `tracing` fmt subscriber filtered by `RUST_LOG`, falling back to
//! the given directive when the variable is unset or invalid.

use tracing_subscriber::EnvFilter;

pub fn init_logging() -> bool {
  init_logging_with("info")
}

/// Returns false when a global subscriber was already installed
pub fn init_logging_with(default_directive: &str) -> bool {
  let filter = EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| EnvFilter::new(default_directive));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_target(false)
    .try_init()
    .is_ok()
}
