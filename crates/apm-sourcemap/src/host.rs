//! Bundler host abstraction
//!
//! The plugin never talks to a concrete bundler. A host exposes its build
//! output through [`Compilation`] and its lifecycle hooks through
//! [`Compiler`]; the plugin taps exactly one post-emit hook and reports back
//! through a one-shot [`CompletionCallback`].
//!
//! ```text
//! Compiler ──apply()──► HostHook::{Emit | AfterEmit}.tap(handler)
//!                                   │
//!   host emits ──► handler.on_emit(compilation, done) ──► done(result)
//! ```

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::UploadError;

/// A logical bundler output group.
///
/// `auxiliary_files` is populated by hosts that list source maps separately
/// from primary outputs; older hosts put everything in `files`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chunk {
    #[serde(default)]
    pub files: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auxiliary_files: Option<Vec<String>>,
}

impl Chunk {
    pub fn new<I, S>(files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            files: files.into_iter().map(Into::into).collect(),
            auxiliary_files: None,
        }
    }

    pub fn with_auxiliary_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.auxiliary_files = Some(files.into_iter().map(Into::into).collect());
        self
    }
}

/// Read-only view of a finished build.
///
/// Implementations own the chunk list and asset buffers; the plugin borrows
/// them for the duration of the hook.
pub trait Compilation: Send + Sync {
    /// Chunks reported by the host, or `None` when the host has none to report
    fn chunks(&self) -> Option<&[Chunk]>;

    /// Bytes of the emitted asset named `name`
    fn asset(&self, name: &str) -> Option<&[u8]>;
}

/// In-memory [`Compilation`]
///
/// Used by hosts that collect their output up front (such as the command
/// line uploader) and by tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryCompilation {
    chunks: Option<Vec<Chunk>>,
    assets: IndexMap<String, Vec<u8>>,
}

impl MemoryCompilation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chunk(mut self, chunk: Chunk) -> Self {
        self.push_chunk(chunk);
        self
    }

    pub fn with_asset(mut self, name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.insert_asset(name, content);
        self
    }

    pub fn push_chunk(&mut self, chunk: Chunk) {
        self.chunks.get_or_insert_with(Vec::new).push(chunk);
    }

    pub fn insert_asset(&mut self, name: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.assets.insert(name.into(), content.into());
    }

    pub fn has_asset(&self, name: &str) -> bool {
        self.assets.contains_key(name)
    }

    pub fn asset_names(&self) -> impl Iterator<Item = &str> {
        self.assets.keys().map(String::as_str)
    }
}

impl Compilation for MemoryCompilation {
    fn chunks(&self) -> Option<&[Chunk]> {
        self.chunks.as_deref()
    }

    fn asset(&self, name: &str) -> Option<&[u8]> {
        self.assets.get(name).map(Vec::as_slice)
    }
}

/// One-shot completion signal handed to the plugin by the host.
///
/// `Ok(())` lets the build proceed; `Err` fails it. Being `FnOnce`, it can
/// only ever be invoked once.
pub type CompletionCallback = Box<dyn FnOnce(Result<(), UploadError>) + Send>;

/// Asynchronous post-emit hook handler
#[async_trait]
pub trait EmitHandler: Send + Sync {
    async fn on_emit(&self, compilation: &dyn Compilation, done: CompletionCallback);
}

pub type SharedEmitHandler = Arc<dyn EmitHandler>;

/// Hook registration surface of a bundler host.
pub trait Compiler {
    /// Whether this host exposes the modern `emit` hook
    fn supports_emit_hook(&self) -> bool;

    fn tap_emit(&mut self, name: &'static str, handler: SharedEmitHandler);

    fn tap_after_emit(&mut self, name: &'static str, handler: SharedEmitHandler);
}

/// The hook a plugin binds to, chosen once per host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostHook {
    /// Modern hosts: the `emit` hook
    Emit,
    /// Legacy hosts: the `afterEmit` hook
    AfterEmit,
}

impl HostHook {
    /// Prefer `emit`, fall back to `afterEmit`
    pub fn detect(compiler: &dyn Compiler) -> Self {
        if compiler.supports_emit_hook() {
            HostHook::Emit
        } else {
            HostHook::AfterEmit
        }
    }

    pub fn tap(self, compiler: &mut dyn Compiler, name: &'static str, handler: SharedEmitHandler) {
        match self {
            HostHook::Emit => compiler.tap_emit(name, handler),
            HostHook::AfterEmit => compiler.tap_after_emit(name, handler),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            HostHook::Emit => "emit",
            HostHook::AfterEmit => "afterEmit",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeCompiler {
        modern: bool,
        emit: Vec<&'static str>,
        after_emit: Vec<&'static str>,
    }

    impl Compiler for FakeCompiler {
        fn supports_emit_hook(&self) -> bool {
            self.modern
        }

        fn tap_emit(&mut self, name: &'static str, _handler: SharedEmitHandler) {
            self.emit.push(name);
        }

        fn tap_after_emit(&mut self, name: &'static str, _handler: SharedEmitHandler) {
            self.after_emit.push(name);
        }
    }

    struct Noop;

    #[async_trait]
    impl EmitHandler for Noop {
        async fn on_emit(&self, _compilation: &dyn Compilation, done: CompletionCallback) {
            done(Ok(()));
        }
    }

    #[test]
    fn test_modern_host_uses_emit() {
        let mut compiler = FakeCompiler {
            modern: true,
            ..Default::default()
        };
        let hook = HostHook::detect(&compiler);
        assert_eq!(hook, HostHook::Emit);

        hook.tap(&mut compiler, "test", Arc::new(Noop));
        assert_eq!(compiler.emit, vec!["test"]);
        assert!(compiler.after_emit.is_empty());
    }

    #[test]
    fn test_legacy_host_uses_after_emit() {
        let mut compiler = FakeCompiler::default();
        let hook = HostHook::detect(&compiler);
        assert_eq!(hook, HostHook::AfterEmit);
        assert_eq!(hook.name(), "afterEmit");

        hook.tap(&mut compiler, "test", Arc::new(Noop));
        assert_eq!(compiler.after_emit, vec!["test"]);
        assert!(compiler.emit.is_empty());
    }

    #[test]
    fn test_memory_compilation() {
        let compilation = MemoryCompilation::new()
            .with_chunk(Chunk::new(["main.js", "main.js.map"]))
            .with_asset("main.js.map", br#"{"version":3}"#.to_vec());

        assert_eq!(compilation.chunks().unwrap().len(), 1);
        assert_eq!(compilation.asset("main.js.map"), Some(&br#"{"version":3}"#[..]));
        assert_eq!(compilation.asset("main.js"), None);
    }

    #[test]
    fn test_empty_compilation_has_no_chunks() {
        assert!(MemoryCompilation::new().chunks().is_none());
    }

    #[test]
    fn test_chunk_deserializes_stats_shape() {
        let chunk: Chunk = serde_json::from_str(
            r#"{ "files": ["app.js"], "auxiliaryFiles": ["app.js.map"] }"#,
        )
        .unwrap();
        assert_eq!(
            chunk,
            Chunk::new(["app.js"]).with_auxiliary_files(["app.js.map"])
        );
    }
}
