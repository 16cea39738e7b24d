// src/utils/logging.rs
use tracing_subscriber::{fmt, EnvFilter};

/// Sets up the logging framework using tracing_subscriber.
/// Reads log level filters from the `RUST_LOG` environment variable.
/// Falls back to `default_level` ("info" from the CLI, "debug" with `--verbose`).
pub fn setup_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    // Logs go to stderr so JSON on stdout stays machine-readable.
    let result = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    if result.is_err() {
        // A subscriber is already installed (tests, embedding applications).
        return;
    }

    tracing::debug!("Logging setup complete.");
}
