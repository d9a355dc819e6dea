//! Diagnostic logging for the `fetch-docs-json` binary.
//!
//! The library emits diagnostics through the `log` facade. The binary
//! installs a `tracing-subscriber` formatter on stderr whose `tracing-log`
//! bridge forwards those records. `RUST_LOG` takes precedence over the
//! level chosen from `-v` flags.

use tracing_subscriber::EnvFilter;

/// Map the `-v` count to a default filter directive.
#[must_use]
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber.
///
/// Failures (for example a subscriber already installed by an embedding
/// program) are ignored; logging is diagnostic only.
pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
    if installed.is_err() {
        // A global subscriber already exists; keep it.
    }
}
