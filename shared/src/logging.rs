//! Log setup for native binaries.

use tracing_subscriber::EnvFilter;

/// Installs the global `fmt` subscriber. Defaults to info-level logs;
/// `RUST_LOG` overrides.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_err()
    {
        tracing::debug!("tracing subscriber already installed");
    }
}
