//! Logging initialisation for the front-ends
//!
//! `RUST_LOG` wins over the default filter, e.g. `RUST_LOG=tally_core=debug`.
//! Output goes to stderr so CLI `--json` output stays clean on stdout.

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber with `default_filter` as fallback level
///
/// Calling this twice is harmless; the second install is ignored.
pub fn init(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Subscriber for tests, captured by the test harness
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
