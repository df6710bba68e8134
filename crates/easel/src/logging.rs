#![forbid(unsafe_code)]

//! Log output for applications built on Easel.
//!
//! The library crates only emit `tracing` events; nothing is printed until a
//! subscriber is installed. [`init`] installs a `tracing-subscriber` fmt layer
//! filtered by `EASEL_LOG` (standard `EnvFilter` syntax, default `warn`).
//! With the `logging-json` feature the output is one JSON object per line.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directive.
pub const LOG_ENV: &str = "EASEL_LOG";

const DEFAULT_DIRECTIVE: &str = "warn";

/// Build the filter from `EASEL_LOG`, falling back to `warn`.
#[must_use]
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(true);

    #[cfg(feature = "logging-json")]
    let result = builder.json().try_init();
    #[cfg(not(feature = "logging-json"))]
    let result = builder.try_init();

    result?;
    tracing::debug!(message = "logging.init", filter = LOG_ENV);
    Ok(())
}
