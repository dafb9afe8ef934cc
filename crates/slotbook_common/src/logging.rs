//! Logging utilities for the Slotbook application.
//!
//! Provides a standardized tracing-subscriber setup used by the backend
//! binary and by tests that want diagnostic output.

use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber with the default log level (INFO).
pub fn init() {
    init_with_level(Level::INFO);
}

/// Initialize the tracing subscriber with a specific log level.
///
/// The `RUST_LOG` environment filter still applies; the given level becomes
/// the default for targets it does not mention.
pub fn init_with_level(level: Level) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    // Use try_init to handle the case where a global default subscriber has already been set
    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(filter)
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
}
