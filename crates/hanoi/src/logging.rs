//! Subscriber setup for the binary.
//!
//! Logs go to stderr; stdout belongs to the terminal surface.

use tracing_subscriber::EnvFilter;

use crate::error::{AppError, Result};

/// Environment variable holding the filter directives.
pub const LOG_ENV: &str = "HANOI_LOG";

const DEFAULT_DIRECTIVES: &str = "info";

/// Filter from [`LOG_ENV`], or `info` when unset or unparsable.
#[must_use]
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|error| AppError::Logging {
            message: error.to_string(),
        })
}
