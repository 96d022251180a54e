//! Per-plugin logger
//!
//! Every plugin instance owns a [`Logger`] gated by its configured
//! [`LogLevel`]. Messages that pass the gate are emitted as `tracing` events;
//! installing a subscriber is left to the application (see the `logging`
//! feature for a convenience initializer).

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Severity threshold for a plugin's log output.
///
/// Ordered from quietest to noisiest, so a message is shown when its level is
/// `<=` the configured level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// No output at all
    Silent,
    /// Only errors
    Error,
    /// Errors and warnings (default)
    #[default]
    Warn,
    /// Errors, warnings, and progress messages
    Info,
    /// Everything except trace output
    Debug,
    /// All output
    Trace,
}

impl LogLevel {
    /// Convert to a tracing filter directive
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Silent => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Silent => "silent",
            other => other.as_filter(),
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "off" => Ok(LogLevel::Silent),
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!("Invalid log level: {}", other)),
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logger owned by a single plugin instance.
///
/// Exposes the channels a bundler logger has (`error`, `warn`, `info`,
/// `debug`, `trace`, `silent`). Each event carries the plugin name as a
/// structured field.
#[derive(Debug, Clone)]
pub struct Logger {
    name: &'static str,
    level: LogLevel,
}

impl Logger {
    pub fn new(name: &'static str, level: LogLevel) -> Self {
        Self { name, level }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// Whether a message at `level` passes this logger's gate
    pub fn enabled(&self, level: LogLevel) -> bool {
        level != LogLevel::Silent && level <= self.level
    }

    pub fn error(&self, message: impl Display) {
        if self.enabled(LogLevel::Error) {
            tracing::error!(plugin = self.name, "{}", message);
        }
    }

    pub fn warn(&self, message: impl Display) {
        if self.enabled(LogLevel::Warn) {
            tracing::warn!(plugin = self.name, "{}", message);
        }
    }

    pub fn info(&self, message: impl Display) {
        if self.enabled(LogLevel::Info) {
            tracing::info!(plugin = self.name, "{}", message);
        }
    }

    pub fn debug(&self, message: impl Display) {
        if self.enabled(LogLevel::Debug) {
            tracing::debug!(plugin = self.name, "{}", message);
        }
    }

    pub fn trace(&self, message: impl Display) {
        if self.enabled(LogLevel::Trace) {
            tracing::trace!(plugin = self.name, "{}", message);
        }
    }

    /// The silent channel swallows everything
    pub fn silent(&self, _message: impl Display) {}
}
