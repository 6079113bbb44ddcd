use tracing_subscriber::{EnvFilter, fmt};

/// Installs a global fmt subscriber writing to stderr.
///
/// `RUST_LOG` takes precedence over `default_directive` (e.g. `"info"`).
/// Calling this twice is harmless: the second installation is ignored.
pub fn init_tracing(default_directive: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
