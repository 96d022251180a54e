//! Error types for the `apm-sourcemap` command.
//!
//! Library errors convert into [`CliError`] via `#[from]`; `main` turns the
//! final error into a miette report (see [`cli_error_to_miette`]).

use std::path::PathBuf;
use thiserror::Error;

mod miette;

pub use self::miette::cli_error_to_miette;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Config file or environment could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Loaded options did not form a valid plugin configuration
    #[error("Invalid options: {0}")]
    Options(#[from] apm_sourcemap::ConfigError),

    /// An upload failed and `ignoreErrors` was not set
    #[error("Upload failed: {0}")]
    Upload(#[from] apm_sourcemap::UploadError),

    /// Build directory doesn't exist
    #[error("Build directory not found: {}", .0.display())]
    DirNotFound(PathBuf),

    /// I/O errors while scanning the build directory
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from loading the layered configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `--config` points at a file that doesn't exist
    #[error("Config file not found: {}\n\nHint: Create an apm-sourcemap.json file or fix the --config path", .0.display())]
    NotFound(PathBuf),

    /// The merged sources could not be extracted
    #[error("{message}\n\nHint: Check apm-sourcemap.json syntax and APM_SOURCEMAP_* variables")]
    Invalid { message: String },
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Invalid {
            message: err.to_string(),
        }
    }
}

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;
