//! Command-line interface definition.
//!
//! - `apm-sourcemap upload [DIR]` - upload every source map found in DIR
//! - `apm-sourcemap check [DIR]` - validate configuration and list what would be uploaded

use apm_sourcemap::PluginOptions;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Upload JavaScript source maps to an Elastic APM server
#[derive(Parser, Debug)]
#[command(
    name = "apm-sourcemap",
    version,
    about = "Upload JavaScript source maps to an Elastic APM server",
    long_about = "Scans a bundler output directory, pairs every .js file with its .js.map,\n\
                  and uploads the maps so the APM server can symbolicate minified stack traces."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Upload source maps from a build directory
    Upload(UploadArgs),

    /// Validate configuration and list the source maps that would be uploaded
    Check(CheckArgs),
}

#[derive(Args, Debug)]
pub struct UploadArgs {
    /// Build output directory
    #[arg(default_value = "dist", value_name = "DIR")]
    pub dir: PathBuf,

    /// Record requests in memory instead of sending them
    #[arg(long)]
    pub dry_run: bool,

    #[command(flatten)]
    pub options: OptionArgs,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Build output directory
    #[arg(default_value = "dist", value_name = "DIR")]
    pub dir: PathBuf,

    #[command(flatten)]
    pub options: OptionArgs,
}

/// Plugin options settable from the command line
///
/// Flags override `APM_SOURCEMAP_*` environment variables, which override the
/// config file.
#[derive(Args, Debug, Default, Clone)]
pub struct OptionArgs {
    /// Path to a JSON config file (default: ./apm-sourcemap.json if present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Service name reported to the APM server
    #[arg(long)]
    pub service_name: Option<String>,

    /// Service version reported to the APM server
    #[arg(long)]
    pub service_version: Option<String>,

    /// Public path the bundles are served from
    #[arg(long)]
    pub public_path: Option<String>,

    /// Source map upload endpoint
    #[arg(long, value_name = "URL")]
    pub server_url: Option<String>,

    /// Secret token, sent as a bearer token
    #[arg(long)]
    pub secret: Option<String>,

    /// Plugin log level: info, warn, error, trace, debug, silent
    #[arg(long)]
    pub log_level: Option<String>,

    /// Exit successfully even when uploads fail (`--ignore-errors=false` to
    /// override a config file)
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub ignore_errors: Option<bool>,

    /// Extra attempts per source map after a failure
    #[arg(long, value_name = "N")]
    pub retry_count: Option<u32>,

    /// Delay between attempts in milliseconds
    #[arg(long, value_name = "MS")]
    pub retry_after_ms: Option<u64>,
}

impl OptionArgs {
    /// Flags that were actually given, as plugin options
    pub fn to_options(&self) -> PluginOptions {
        PluginOptions {
            service_name: self.service_name.clone(),
            service_version: self.service_version.clone(),
            public_path: self.public_path.clone(),
            server_url: self.server_url.clone(),
            secret: self.secret.clone(),
            log_level: self.log_level.clone(),
            ignore_errors: self.ignore_errors,
            retry_count: self.retry_count,
            retry_after_ms: self.retry_after_ms,
        }
    }
}
