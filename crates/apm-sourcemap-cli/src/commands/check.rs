//! Check command implementation.
//!
//! Validates configuration and lists the source maps an upload would send,
//! without contacting the APM server.

use crate::cli::CheckArgs;
use crate::commands::load_config;
use crate::error::Result;
use crate::scan::scan_build_dir;
use crate::ui;
use apm_sourcemap::packager::bundle_filepath;
use apm_sourcemap::{ApmSourceMapPlugin, Compilation, UploadError};

/// Execute the check command.
///
/// Fails when the configuration is invalid, the directory is missing, or a
/// chunk names a source map that isn't there.
pub async fn execute(args: CheckArgs) -> Result<()> {
    ui::info("Checking configuration...");
    let config = load_config(&args.options)?;
    ui::success(&format!(
        "Configuration is valid ({} {} -> {})",
        config.service_name, config.service_version, config.server_url
    ));

    let compilation = scan_build_dir(&args.dir)?;
    let plugin = ApmSourceMapPlugin::from_config(config);

    let mut count = 0;
    for pair in plugin.pairs(&compilation) {
        let Some((source_file, source_map)) = pair.complete() else {
            continue;
        };
        if compilation.asset(source_map).is_none() {
            return Err(UploadError::missing_asset(source_map).into());
        }
        ui::item(&format!(
            "{} -> {}",
            source_map,
            bundle_filepath(&plugin.config().public_path, source_file)
        ));
        count += 1;
    }

    if count == 0 {
        ui::warning(&format!(
            "No .js/.js.map pairs found in {}",
            args.dir.display()
        ));
    } else {
        ui::success(&format!("{} source map(s) ready to upload", count));
    }

    Ok(())
}
