//! Layered option loading.
//!
//! Priority, lowest to highest: `apm-sourcemap.json` (or `--config`), then
//! `APM_SOURCEMAP_*` environment variables, then command-line flags. The
//! merged [`PluginOptions`] are validated later by the library.

use crate::cli::OptionArgs;
use crate::error::ConfigError;
use apm_sourcemap::PluginOptions;
use figment::{
    Figment,
    providers::{Env, Format as _, Json, Serialized},
};
use std::path::Path;

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "apm-sourcemap.json";

/// Prefix of the environment variables that set plugin options
pub const ENV_PREFIX: &str = "APM_SOURCEMAP_";

/// Load plugin options from every source, resolving relative paths against `cwd`.
pub fn load_options(args: &OptionArgs, cwd: &Path) -> Result<PluginOptions, ConfigError> {
    let mut figment = Figment::new();

    match &args.config {
        Some(path) => {
            let path = cwd.join(path);
            if !path.is_file() {
                return Err(ConfigError::NotFound(path));
            }
            figment = figment.merge(Json::file(path));
        }
        None => {
            let default_path = cwd.join(DEFAULT_CONFIG_FILE);
            if default_path.is_file() {
                figment = figment.merge(Json::file(default_path));
            }
        }
    }

    let env = Env::prefixed(ENV_PREFIX);
    let env_options =
        options_from_env(env.iter().map(|(key, value)| (key.as_str().to_string(), value)))?;

    figment = figment
        .merge(Serialized::defaults(env_options))
        .merge(Serialized::defaults(args.to_options()));

    Ok(figment.extract()?)
}

/// Build options from prefix-stripped environment pairs.
///
/// Values are taken as raw strings so that a version like `1.0` stays a
/// string; numeric and boolean options are parsed here. Unknown keys are
/// ignored.
pub fn options_from_env<I>(vars: I) -> Result<PluginOptions, ConfigError>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut options = PluginOptions::default();

    for (key, value) in vars {
        match key.to_ascii_lowercase().as_str() {
            "service_name" => options.service_name = Some(value),
            "service_version" => options.service_version = Some(value),
            "public_path" => options.public_path = Some(value),
            "server_url" => options.server_url = Some(value),
            "secret" => options.secret = Some(value),
            "log_level" => options.log_level = Some(value),
            "ignore_errors" => options.ignore_errors = Some(parse_bool(&key, &value)?),
            "retry_count" => options.retry_count = Some(parse_number(&key, &value)?),
            "retry_after_ms" => options.retry_after_ms = Some(parse_number(&key, &value)?),
            _ => {}
        }
    }

    Ok(options)
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" | "" => Ok(false),
        _ => Err(invalid_env(key, value, "expected true or false")),
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid_env(key, value, "expected a non-negative integer"))
}

fn invalid_env(key: &str, value: &str, expected: &str) -> ConfigError {
    ConfigError::Invalid {
        message: format!(
            "{}{}={}: {}",
            ENV_PREFIX,
            key.to_ascii_uppercase(),
            value,
            expected
        ),
    }
}
