//! Upload command implementation.

use crate::cli::UploadArgs;
use crate::commands::load_config;
use crate::error::Result;
use crate::scan::scan_build_dir;
use crate::ui;
use apm_sourcemap::{ApmSourceMapPlugin, Compilation, MemoryTransport};
use std::sync::Arc;

/// Execute the upload command.
///
/// The build directory is scanned once; the pipeline then behaves exactly as
/// it does inside a bundler's emit hook, including `ignoreErrors`.
pub async fn execute(args: UploadArgs) -> Result<()> {
    let config = load_config(&args.options)?;
    let compilation = scan_build_dir(&args.dir)?;

    let recorder = args.dry_run.then(|| Arc::new(MemoryTransport::new()));
    let mut plugin = ApmSourceMapPlugin::from_config(config);
    if let Some(recorder) = &recorder {
        plugin = plugin.with_transport(recorder.clone());
    }

    let uploads = plugin
        .pairs(&compilation)
        .iter()
        .filter(|pair| pair.complete().is_some())
        .count();

    if uploads == 0 {
        ui::warning(&format!(
            "No .js/.js.map pairs found in {}",
            args.dir.display()
        ));
    }

    tracing::debug!(
        chunks = compilation.chunks().map_or(0, |chunks| chunks.len()),
        uploads,
        dry_run = args.dry_run,
        "starting upload"
    );

    plugin.upload_sourcemaps(&compilation).await?;

    match recorder {
        Some(recorder) => {
            ui::success(&format!(
                "Dry run: {} source map(s) would be uploaded to {}",
                recorder.request_count(),
                plugin.config().server_url
            ));
            for request in recorder.requests() {
                if let Some(path) = request.form.text_field("bundle_filepath") {
                    ui::item(path);
                }
            }
        }
        None if plugin.config().ignore_errors => ui::info(&format!(
            "Finished {} source map(s); failed uploads, if any, were logged and ignored",
            uploads
        )),
        None => ui::success(&format!("Uploaded {} source map(s)", uploads)),
    }

    Ok(())
}
