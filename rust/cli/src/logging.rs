//! Diagnostic logging for the `holdem` binary.
//!
//! The engine emits `tracing` events; this installs the subscriber that
//! prints them. `HOLDEM_LOG` takes an `EnvFilter` directive such as
//! `holdem_engine=debug`. Output goes to stderr so JSON on stdout stays
//! parseable.

use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "HOLDEM_LOG";
pub const DEFAULT_DIRECTIVE: &str = "warn";

pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

pub fn init_logging() -> Result<(), SetGlobalDefaultError> {
    use tracing_subscriber::fmt;

    let subscriber = fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
}
