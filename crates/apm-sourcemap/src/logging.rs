//! Logging utilities for apm-sourcemap
//!
//! This module is only available with the `logging` feature.
//!
//! For library users: the plugin emits tracing events - install your own subscriber.
//! For application developers: use these convenience functions.

use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::logger::LogLevel;

static INIT: Once = Once::new();

/// Initialize a global subscriber at the given level
///
/// Only the first call in a process takes effect. `RUST_LOG` directives are
/// layered on top of the default level.
///
/// # Example
///
/// ```rust,no_run
/// use apm_sourcemap::{LogLevel, logging::init_logging};
///
/// init_logging(LogLevel::Info);
/// ```
pub fn init_logging(level: LogLevel) {
    INIT.call_once(|| {
        let filter = EnvFilter::builder()
            .with_default_directive(level_directive(level))
            .from_env_lossy();

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact().with_target(false).without_time())
            .init();
    });
}

/// Initialize logging from the `RUST_LOG` environment variable
///
/// Falls back to [`LogLevel::Warn`] if `RUST_LOG` is not set or invalid.
pub fn init_logging_from_env() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::builder()
                .with_default_directive(level_directive(LogLevel::Warn))
                .from_env_lossy()
        });

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact().with_target(false).without_time())
            .init();
    });
}

fn level_directive(level: LogLevel) -> tracing_subscriber::filter::Directive {
    let filter = match level {
        LogLevel::Silent => tracing_subscriber::filter::LevelFilter::OFF,
        LogLevel::Error => tracing_subscriber::filter::LevelFilter::ERROR,
        LogLevel::Warn => tracing_subscriber::filter::LevelFilter::WARN,
        LogLevel::Info => tracing_subscriber::filter::LevelFilter::INFO,
        LogLevel::Debug => tracing_subscriber::filter::LevelFilter::DEBUG,
        LogLevel::Trace => tracing_subscriber::filter::LevelFilter::TRACE,
    };
    filter.into()
}
