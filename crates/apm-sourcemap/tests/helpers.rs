//! Shared test utilities for apm-sourcemap integration tests

#![allow(dead_code)]

use apm_sourcemap::{
    Chunk, Compilation, Compiler, MemoryCompilation, PluginOptions, SharedEmitHandler,
    UploadError,
};
use std::sync::{Arc, Mutex};

/// Source map body used by every fixture chunk
pub const SOURCE_MAP: &str = r#"{"version":3,"sources":["src/app.ts"],"mappings":"AAAA"}"#;

/// Options used across scenarios
pub fn mock_options() -> PluginOptions {
    PluginOptions {
        service_name: Some("mock-service".to_string()),
        service_version: Some("mock-version".to_string()),
        public_path: Some("/mock-folder".to_string()),
        server_url: Some("mock-url".to_string()),
        ..Default::default()
    }
}

/// A compilation with one chunk: `app.js` + `app.js.map`
pub fn single_chunk() -> MemoryCompilation {
    MemoryCompilation::new()
        .with_chunk(Chunk::new(["app.js", "app.js.map"]))
        .with_asset("app.js", b"console.log(1)".to_vec())
        .with_asset("app.js.map", SOURCE_MAP.as_bytes().to_vec())
}

/// A compilation with `count` chunks named `chunk-N.js`
pub fn many_chunks(count: usize) -> MemoryCompilation {
    (0..count).fold(MemoryCompilation::new(), |compilation, index| {
        let script = format!("chunk-{}.js", index);
        let map = format!("{}.map", script);
        compilation
            .with_chunk(Chunk::new([script, map.clone()]))
            .with_asset(map, SOURCE_MAP.as_bytes().to_vec())
    })
}

/// Minimal bundler host recording what the plugin taps
#[derive(Default)]
pub struct TestCompiler {
    pub modern: bool,
    pub emit: Vec<(&'static str, SharedEmitHandler)>,
    pub after_emit: Vec<(&'static str, SharedEmitHandler)>,
}

impl TestCompiler {
    pub fn modern() -> Self {
        Self {
            modern: true,
            ..Default::default()
        }
    }

    pub fn legacy() -> Self {
        Self::default()
    }

    /// Run every tapped handler the way a host would after emitting assets.
    /// Returns every value passed to a completion callback.
    pub async fn run_emit(&self, compilation: &dyn Compilation) -> Vec<Result<(), UploadError>> {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let handlers = if self.modern { &self.emit } else { &self.after_emit };

        for (_, handler) in handlers {
            let calls = calls.clone();
            handler
                .on_emit(
                    compilation,
                    Box::new(move |result| calls.lock().unwrap().push(result)),
                )
                .await;
        }

        Arc::try_unwrap(calls)
            .map(|calls| calls.into_inner().unwrap())
            .unwrap_or_default()
    }
}

impl Compiler for TestCompiler {
    fn supports_emit_hook(&self) -> bool {
        self.modern
    }

    fn tap_emit(&mut self, name: &'static str, handler: SharedEmitHandler) {
        self.emit.push((name, handler));
    }

    fn tap_after_emit(&mut self, name: &'static str, handler: SharedEmitHandler) {
        self.after_emit.push((name, handler));
    }
}
