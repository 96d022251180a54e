//! Command implementations.
//!
//! - [`upload`] - scan a build directory and upload its source maps
//! - [`check`] - validate configuration and list what would be uploaded

pub mod check;
pub mod upload;

pub use check::execute as check_execute;
pub use upload::execute as upload_execute;

use crate::cli::OptionArgs;
use crate::error::Result;
use apm_sourcemap::Config;

/// Load and validate the plugin configuration for the current directory
pub(crate) fn load_config(options: &OptionArgs) -> Result<Config> {
    let cwd = std::env::current_dir()?;
    let options = crate::config::load_options(options, &cwd)?;
    Ok(Config::try_from(options)?)
}
