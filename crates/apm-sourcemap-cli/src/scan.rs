//! Turn a build output directory into a compilation.
//!
//! Every `.js` file becomes its own chunk, followed by its sibling `.js.map`
//! when one exists. Names are relative to the directory and always use `/`.

use crate::error::{CliError, Result};
use apm_sourcemap::{Chunk, MemoryCompilation};
use std::collections::BTreeSet;
use std::path::Path;
use walkdir::WalkDir;

const SCRIPT_SUFFIX: &str = ".js";
const MAP_SUFFIX: &str = ".js.map";

/// Scan `dir` recursively; only source map contents are loaded
pub fn scan_build_dir(dir: &Path) -> Result<MemoryCompilation> {
    if !dir.is_dir() {
        return Err(CliError::DirNotFound(dir.to_path_buf()));
    }

    let mut scripts = Vec::new();
    let mut maps = BTreeSet::new();
    let mut compilation = MemoryCompilation::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }

        let Some(name) = relative_name(dir, entry.path()) else {
            continue;
        };

        if name.ends_with(MAP_SUFFIX) {
            compilation.insert_asset(name.clone(), std::fs::read(entry.path())?);
            maps.insert(name);
        } else if name.ends_with(SCRIPT_SUFFIX) {
            scripts.push(name);
        }
    }

    for script in scripts {
        let map = format!("{}.map", script);
        let chunk = if maps.contains(&map) {
            Chunk::new([script, map])
        } else {
            Chunk::new([script])
        };
        compilation.push_chunk(chunk);
    }

    tracing::debug!(dir = %dir.display(), "scanned build directory");
    Ok(compilation)
}

fn relative_name(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    Some(parts.join("/"))
}
