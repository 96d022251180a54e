//! Error types for the source map upload pipeline

use miette::Diagnostic;
use thiserror::Error;

use crate::transport::TransportError;

/// Result alias used throughout the upload pipeline.
pub type Result<T, E = UploadError> = std::result::Result<T, E>;

/// Errors surfaced by a single upload or by packaging the build output.
///
/// Only the first error to resolve is forwarded to the host; the rest are
/// logged and dropped.
#[derive(Error, Debug, Diagnostic)]
pub enum UploadError {
    /// The request never received a response (DNS, TCP, TLS, reset).
    ///
    /// Displays as the transport's own message so the host sees the
    /// underlying failure verbatim.
    #[error(transparent)]
    #[diagnostic(
        code(apm_sourcemap::transport),
        help("Check that the APM server URL is reachable from the build machine")
    )]
    Transport(#[from] TransportError),

    /// The APM server answered with a non-2xx status.
    ///
    /// The response body is logged, never carried in the message.
    #[error("error while uploading {source_map} to Elastic APM")]
    #[diagnostic(
        code(apm_sourcemap::rejected),
        help("The APM server returned HTTP {status}; see the error log for its response body")
    )]
    Rejected { source_map: String, status: u16 },

    /// A chunk names a source map the host never emitted.
    #[error("source map asset '{name}' was not found in the compilation")]
    #[diagnostic(
        code(apm_sourcemap::missing_asset),
        help("Make sure the bundler emits external source maps (devtool: source-map)")
    )]
    MissingAsset { name: String },
}

impl UploadError {
    pub fn rejected(source_map: impl Into<String>, status: u16) -> Self {
        Self::Rejected {
            source_map: source_map.into(),
            status,
        }
    }

    pub fn missing_asset(name: impl Into<String>) -> Self {
        Self::MissingAsset { name: name.into() }
    }
}

/// Errors raised while turning plugin options into a [`crate::Config`].
#[derive(Error, Debug, Diagnostic, PartialEq, Eq)]
pub enum ConfigError {
    /// A required option is absent (or `serverURL` is blank)
    #[error("missing required option '{field}'")]
    #[diagnostic(
        code(apm_sourcemap::config::missing_field),
        help("Set '{field}' in the plugin options")
    )]
    MissingField { field: &'static str },

    /// An option has a value outside its accepted set
    #[error("invalid value for '{field}': {value}")]
    #[diagnostic(code(apm_sourcemap::config::invalid_value))]
    InvalidValue {
        field: &'static str,
        value: String,
        #[help]
        hint: String,
    },
}

impl ConfigError {
    pub fn missing_field(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    pub fn invalid_value(
        field: &'static str,
        value: impl Into<String>,
        hint: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field,
            value: value.into(),
            hint: hint.into(),
        }
    }
}
