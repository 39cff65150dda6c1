//! Tracing subscriber setup for the binary.

use crate::error::ConfigError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Pick the filter directive: command line first, then config file.
pub fn effective_level<'a>(cli: Option<&'a str>, config: &'a str) -> &'a str {
    cli.filter(|level| !level.trim().is_empty())
        .unwrap_or(config)
}

/// Install a stderr subscriber filtered by `level` (an `EnvFilter` directive).
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_logging(level: &str) -> Result<(), ConfigError> {
    let filter = EnvFilter::try_new(level)
        .map_err(|e| ConfigError::invalid_value("logging.level", e.to_string()))?;

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false),
        )
        .with(filter)
        .try_init();

    Ok(())
}
