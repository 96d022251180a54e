//! Chunk → (script, source map) pairing

use regex::Regex;
use std::sync::LazyLock;

use crate::host::Chunk;

static SCRIPT_FILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.js$").expect("script pattern is valid"));

static SOURCE_MAP_FILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.js\.map$").expect("source map pattern is valid"));

/// The script and source map selected for one chunk.
///
/// Either side may be missing; only complete pairs are uploaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pair {
    pub source_file: Option<String>,
    pub source_map: Option<String>,
}

impl Pair {
    /// Both members, if the chunk produced an uploadable map
    pub fn complete(&self) -> Option<(&str, &str)> {
        match (&self.source_file, &self.source_map) {
            (Some(file), Some(map)) => Some((file.as_str(), map.as_str())),
            _ => None,
        }
    }
}

/// Select the first script and the first source map of a chunk.
///
/// Source maps are looked up in `auxiliary_files` when the host provides
/// that list, and in `files` otherwise.
pub fn pair_chunk(chunk: &Chunk) -> Pair {
    let source_file = first_match(&chunk.files, &SCRIPT_FILE);
    let map_candidates = chunk.auxiliary_files.as_deref().unwrap_or(&chunk.files);
    let source_map = first_match(map_candidates, &SOURCE_MAP_FILE);

    Pair {
        source_file,
        source_map,
    }
}

/// One pair per chunk, in input order. A missing chunk list pairs to nothing.
pub fn pair_chunks(chunks: Option<&[Chunk]>) -> Vec<Pair> {
    chunks.unwrap_or_default().iter().map(pair_chunk).collect()
}

fn first_match(files: &[String], pattern: &Regex) -> Option<String> {
    files.iter().find(|file| pattern.is_match(file)).cloned()
}
