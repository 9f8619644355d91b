// src/logging.rs

//! Logging setup using `tracing` + `tracing-subscriber`.
//!
//! The log level comes from the `DAGRUN_LOG` environment variable (an
//! `EnvFilter` directive string, e.g. "info", "dagrun=debug"), defaulting
//! to `info`. Logs go to STDERR so stdout stays free for whatever the
//! embedding application prints.

use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

/// Initialise the global logging subscriber.
///
/// Call once at startup; a second call reports an error rather than
/// panicking, so embedding applications that already installed a subscriber
/// can ignore it.
pub fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_env("DAGRUN_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to initialise logging: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_initialisation_reports_an_error() {
        assert!(init_logging().is_ok());
        assert!(init_logging().is_err());
    }
}
