//! Diagnostic logging to stderr. Stdout is reserved for command output.

use tracing_subscriber::EnvFilter;

/// Environment variable holding a `tracing` filter directive
pub const LOG_ENV: &str = "PCMD_LOG";

/// Install the global subscriber.
///
/// `PCMD_LOG` takes precedence; otherwise warnings only, or debug output when
/// `verbose` is set. Calling this twice keeps the first subscriber.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
