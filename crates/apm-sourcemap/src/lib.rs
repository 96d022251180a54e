//! # apm-sourcemap
//!
//! Bundler plugin that uploads source maps to an Elastic APM server once the
//! build output has been emitted, so that minified stack traces captured in
//! production can be mapped back to the original sources.
//!
//! ## Pipeline
//!
//! ```text
//! Compilation ─► pairer ─► packager ─► uploader (retry) ─► completion ─► host callback
//! ```
//!
//! - [`pairer`] picks the first `.js` file and first `.js.map` of every chunk
//! - [`packager`] builds the multipart form the APM server expects
//! - [`uploader`] POSTs it, with bearer auth and a per-upload retry budget
//! - [`completion`] waits for every upload and applies `ignoreErrors`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use apm_sourcemap::{ApmSourceMapPlugin, Chunk, Config, MemoryCompilation};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let plugin = ApmSourceMapPlugin::from_config(
//!     Config::new("shop", "1.4.0", "/static/js", "http://apm:8200/assets/v1/sourcemaps")
//!         .with_retry(2, 1000),
//! );
//!
//! let compilation = MemoryCompilation::new()
//!     .with_chunk(Chunk::new(["main.js", "main.js.map"]))
//!     .with_asset("main.js.map", std::fs::read("dist/main.js.map")?);
//!
//! plugin.upload_sourcemaps(&compilation).await?;
//! # Ok(()) }
//! ```
//!
//! Bundler integrations implement [`Compiler`] and call
//! [`ApmSourceMapPlugin::apply`] instead.

pub mod completion;
pub mod config;
pub mod error;
pub mod host;
pub mod logger;
pub mod packager;
pub mod pairer;
pub mod plugin;
pub mod transport;
pub mod uploader;

#[cfg(feature = "logging")]
pub mod logging;

pub use config::{Config, PluginOptions};
pub use error::{ConfigError, Result, UploadError};
pub use host::{
    Chunk, Compilation, Compiler, CompletionCallback, EmitHandler, HostHook, MemoryCompilation,
    SharedEmitHandler,
};
pub use logger::{LogLevel, Logger};
pub use packager::{Packaged, UploadForm, UploadJob};
pub use pairer::Pair;
pub use plugin::{ApmSourceMapPlugin, PLUGIN_NAME};
pub use transport::{
    HttpTransport, MemoryTransport, Transport, TransportError, UploadRequest, UploadResponse,
};
pub use uploader::Uploader;
