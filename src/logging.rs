//! Tracing subscriber setup.

use tracing_subscriber::{EnvFilter, fmt};

/// Install the global subscriber, writing to stderr. `RUST_LOG` takes
/// precedence over `level`. Later calls are ignored.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
