//! Log subscriber setup for the binary.

use tracing_subscriber::{fmt, EnvFilter};

/// Install a stderr fmt subscriber.
///
/// `RUST_LOG` overrides `default_filter` when set. Calling this twice is
/// harmless; the second call is ignored.
pub fn init(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
