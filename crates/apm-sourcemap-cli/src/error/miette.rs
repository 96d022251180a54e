//! Miette diagnostic conversion for CLI errors.

use crate::error::CliError;
use miette::Report;

/// Convert CliError to miette Report
///
/// Library errors already implement `Diagnostic`, so they keep their codes
/// and help text.
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Options(e) => Report::new(e),
        CliError::Upload(e) => Report::new(e),
        CliError::DirNotFound(path) => miette::miette!(
            help = "Run the bundler first, or pass the output directory as DIR",
            "Build directory not found: {}",
            path.display()
        ),
        _ => miette::miette!("{}", err),
    }
}
