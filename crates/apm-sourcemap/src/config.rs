//! Plugin configuration
//!
//! [`PluginOptions`] is the raw, user-facing shape (camelCase keys, every
//! field optional). [`Config`] is the validated, immutable record the
//! pipeline runs on; it is built once when the plugin is constructed.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ConfigError;
use crate::logger::LogLevel;

/// Raw plugin options as they appear in a bundler config or JSON file.
///
/// `None` fields are skipped when serialized so that layered configuration
/// sources only override what they actually set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginOptions {
    /// Name of the service in the APM UI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,

    /// Version of the service the bundle belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_version: Option<String>,

    /// Public URL path the bundles are served from (e.g. `/static/js`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_path: Option<String>,

    /// Source map upload endpoint of the APM server
    #[serde(default, rename = "serverURL", skip_serializing_if = "Option::is_none")]
    pub server_url: Option<String>,

    /// Secret token sent as a bearer token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,

    /// One of `info`, `warn`, `error`, `trace`, `debug`, `silent`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    /// Let the build succeed even when uploads fail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_errors: Option<bool>,

    /// Extra attempts per source map after a failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_count: Option<u32>,

    /// Delay between attempts in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_after_ms: Option<u64>,
}

/// Validated plugin configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub service_name: String,
    pub service_version: String,
    pub public_path: String,
    pub server_url: String,
    pub secret: Option<String>,
    pub log_level: LogLevel,
    pub ignore_errors: bool,
    pub retry_count: u32,
    pub retry_after_ms: u64,
}

impl Config {
    /// Create a configuration from the required fields, with defaults for
    /// everything else
    ///
    /// # Example
    ///
    /// ```rust
    /// use apm_sourcemap::Config;
    ///
    /// let config = Config::new("shop", "1.4.0", "/static/js", "http://apm:8200/assets/v1/sourcemaps")
    ///     .with_secret("s3cr3t")
    ///     .with_retry(2, 500);
    ///
    /// assert_eq!(config.retry_count, 2);
    /// assert!(!config.ignore_errors);
    /// ```
    pub fn new(
        service_name: impl Into<String>,
        service_version: impl Into<String>,
        public_path: impl Into<String>,
        server_url: impl Into<String>,
    ) -> Self {
        Self {
            service_name: service_name.into(),
            service_version: service_version.into(),
            public_path: public_path.into(),
            server_url: server_url.into(),
            secret: None,
            log_level: LogLevel::default(),
            ignore_errors: false,
            retry_count: 0,
            retry_after_ms: 0,
        }
    }

    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    pub fn with_ignore_errors(mut self, ignore: bool) -> Self {
        self.ignore_errors = ignore;
        self
    }

    pub fn with_retry(mut self, count: u32, after_ms: u64) -> Self {
        self.retry_count = count;
        self.retry_after_ms = after_ms;
        self
    }

    /// Pause before the next attempt, or `None` to retry on the next
    /// scheduler tick
    pub fn retry_delay(&self) -> Option<Duration> {
        (self.retry_after_ms > 0).then(|| Duration::from_millis(self.retry_after_ms))
    }

    /// Check values that can never be valid once present.
    ///
    /// Blank names, versions and public paths are passed through as given;
    /// an empty `publicPath` means bundles are served from the site root.
    /// A blank `serverURL` leaves nothing to upload to.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server_url.trim().is_empty() {
            return Err(ConfigError::missing_field("serverURL"));
        }
        Ok(())
    }
}

impl TryFrom<PluginOptions> for Config {
    type Error = ConfigError;

    fn try_from(options: PluginOptions) -> Result<Self, Self::Error> {
        let log_level = match options.log_level.as_deref() {
            Some(raw) => raw.parse::<LogLevel>().map_err(|_| {
                ConfigError::invalid_value(
                    "logLevel",
                    raw,
                    "Use one of: info, warn, error, trace, debug, silent",
                )
            })?,
            None => LogLevel::default(),
        };

        let config = Self {
            service_name: required(options.service_name, "serviceName")?,
            service_version: required(options.service_version, "serviceVersion")?,
            public_path: required(options.public_path, "publicPath")?,
            server_url: required(options.server_url, "serverURL")?,
            secret: options.secret.filter(|s| !s.is_empty()),
            log_level,
            ignore_errors: options.ignore_errors.unwrap_or(false),
            retry_count: options.retry_count.unwrap_or(0),
            retry_after_ms: options.retry_after_ms.unwrap_or(0),
        };

        config.validate()?;
        Ok(config)
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ConfigError> {
    value.ok_or_else(|| ConfigError::missing_field(field))
}
