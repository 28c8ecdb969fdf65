//! # Structured Logging Module
//!
//! Environment-aware structured logging setup plus the mapping between
//! numeric registry verbosity and tracing level filters.
//!
//! Registries do not touch global logging state themselves. Each instance
//! carries its own span and verbosity filter; this module only offers an
//! opt-in console subscriber for binaries and tests that want one.

use std::sync::OnceLock;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Highest accepted numeric verbosity.
pub(crate) const MAX_LOG_LEVEL: u8 = 50;

/// Default verbosity for new registries. Maps to [`LevelFilter::WARN`].
pub(crate) const DEFAULT_LOG_LEVEL: u8 = 30;

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize console logging with environment-specific filtering.
///
/// Respects `RUST_LOG` when set and falls back to `warn`. Safe to call from
/// multiple tests or binaries; only the first call installs a subscriber.
pub fn init_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_filter(filter),
        );

        // Use try_init to avoid panic if a global subscriber already exists
        if subscriber.try_init().is_err() {
            tracing::debug!("global tracing subscriber already initialized, continuing");
        }
    });
}

/// Map a numeric verbosity in `0..=50` to a tracing level filter.
///
/// Lower numbers are more verbose. The bands are 0 for TRACE, 1-10 DEBUG,
/// 11-20 INFO, 21-30 WARN, 31-40 ERROR, and 41-50 OFF. Range checking is the
/// caller's responsibility; out-of-range construction inputs are rejected by
/// the registry builder before this mapping runs.
pub(crate) fn verbosity_filter(level: u8) -> LevelFilter {
    match level {
        0 => LevelFilter::TRACE,
        1..=10 => LevelFilter::DEBUG,
        11..=20 => LevelFilter::INFO,
        21..=30 => LevelFilter::WARN,
        31..=40 => LevelFilter::ERROR,
        _ => LevelFilter::OFF,
    }
}
