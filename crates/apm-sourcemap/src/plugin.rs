//! The bundler plugin
//!
//! Ties the pipeline together:
//!
//! ```text
//! chunks ─► pair_chunks() ─► package() ─► Uploader::upload() ×N ─► settle() ─► done(result)
//! ```

use async_trait::async_trait;
use std::sync::Arc;

use crate::completion::settle;
use crate::config::{Config, PluginOptions};
use crate::error::{ConfigError, UploadError};
use crate::host::{Compilation, Compiler, CompletionCallback, EmitHandler, HostHook};
use crate::logger::Logger;
use crate::packager::{Packaged, package};
use crate::pairer::{Pair, pair_chunks};
use crate::transport::{HttpTransport, Transport};
use crate::uploader::Uploader;

/// Name the plugin taps host hooks and logs under
pub const PLUGIN_NAME: &str = "ElasticAPMSourceMapPlugin";

/// Uploads every emitted source map to an Elastic APM server after the
/// bundler writes its output.
///
/// # Example
///
/// ```rust,no_run
/// use apm_sourcemap::{ApmSourceMapPlugin, PluginOptions};
///
/// # fn example() -> Result<(), apm_sourcemap::ConfigError> {
/// let plugin = ApmSourceMapPlugin::new(PluginOptions {
///     service_name: Some("shop".into()),
///     service_version: Some("1.4.0".into()),
///     public_path: Some("https://cdn.example.com/js".into()),
///     server_url: Some("http://apm:8200/assets/v1/sourcemaps".into()),
///     ..Default::default()
/// })?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApmSourceMapPlugin {
    config: Arc<Config>,
    transport: Arc<dyn Transport>,
    logger: Logger,
}

impl ApmSourceMapPlugin {
    /// Validate options and create a plugin that uploads over HTTP
    ///
    /// # Errors
    ///
    /// [`ConfigError`] when a required option is missing or a value is invalid.
    pub fn new(options: PluginOptions) -> Result<Self, ConfigError> {
        Ok(Self::from_config(Config::try_from(options)?))
    }

    pub fn from_config(config: Config) -> Self {
        let logger = Logger::new(PLUGIN_NAME, config.log_level);
        Self {
            config: Arc::new(config),
            transport: Arc::new(HttpTransport::new()),
            logger,
        }
    }

    /// Replace the transport (custom client, dry run, tests)
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Register with the host, preferring `emit` over `afterEmit`
    pub fn apply(&self, compiler: &mut dyn Compiler) -> HostHook {
        let hook = HostHook::detect(compiler);
        self.logger
            .trace(format_args!("tapping the {} hook", hook.name()));
        hook.tap(compiler, PLUGIN_NAME, Arc::new(self.clone()));
        hook
    }

    /// Pairs the plugin would consider for this compilation
    pub fn pairs(&self, compilation: &dyn Compilation) -> Vec<Pair> {
        pair_chunks(compilation.chunks())
    }

    /// Run the whole pipeline for one build.
    ///
    /// Packaging happens for every chunk before the first request goes out,
    /// so a missing asset fails the build without uploading anything. That
    /// failure is not subject to `ignoreErrors`.
    pub async fn upload_sourcemaps(&self, compilation: &dyn Compilation) -> Result<(), UploadError> {
        let packaged = self
            .pairs(compilation)
            .iter()
            .map(|pair| package(pair, compilation, &self.config))
            .collect::<Result<Vec<_>, _>>()?;

        let uploader = Uploader::new(
            self.config.clone(),
            self.transport.clone(),
            self.logger.clone(),
        );

        let tasks: Vec<_> = packaged
            .into_iter()
            .map(|item| {
                let uploader = uploader.clone();
                async move {
                    match item {
                        Packaged::Skip => Ok(()),
                        Packaged::Upload(job) => uploader.upload(&job).await,
                    }
                }
            })
            .collect();

        settle(tasks, self.config.ignore_errors, &self.logger).await
    }
}

#[async_trait]
impl EmitHandler for ApmSourceMapPlugin {
    async fn on_emit(&self, compilation: &dyn Compilation, done: CompletionCallback) {
        let result = self.upload_sourcemaps(compilation).await;
        done(result);
    }
}
