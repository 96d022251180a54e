//! Command-line host for the `apm-sourcemap` plugin.
//!
//! Instead of running inside a bundler, the CLI scans an already-built output
//! directory and feeds it through the same pipeline:
//!
//! - [`cli`] - argument parsing
//! - [`config`] - layered option loading with figment
//! - [`scan`] - build directory to compilation
//! - [`commands`] - `upload` and `check`
//! - [`error`] / [`logger`] - error reporting and tracing setup

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
pub mod scan;
pub mod ui;

pub use error::{CliError, ConfigError, Result};
