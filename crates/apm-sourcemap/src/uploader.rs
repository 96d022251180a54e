//! Upload with retry
//!
//! Each job runs its own state machine:
//!
//! ```text
//! START ──POST──► IN_FLIGHT ──2xx──► DONE(ok)
//!                     │
//!                     ├── transport error ─┐
//!                     └── non-2xx ─────────┤
//!                                          ▼
//!                               budget == 0 ? ──yes──► DONE(fail)
//!                                          │ no
//!                                       WAITING ──timer──► IN_FLIGHT
//! ```
//!
//! The retry budget belongs to the job, so retries of different source maps
//! never interfere with each other.

use std::sync::Arc;

use crate::config::Config;
use crate::error::UploadError;
use crate::logger::Logger;
use crate::packager::UploadJob;
use crate::transport::{Transport, UploadRequest};

pub const AUTHORIZATION_HEADER: &str = "Authorization";

#[derive(Debug, Clone)]
pub struct Uploader {
    config: Arc<Config>,
    transport: Arc<dyn Transport>,
    logger: Logger,
}

impl Uploader {
    pub fn new(config: Arc<Config>, transport: Arc<dyn Transport>, logger: Logger) -> Self {
        Self {
            config,
            transport,
            logger,
        }
    }

    /// Upload one source map, retrying failures until the budget runs out.
    ///
    /// # Errors
    ///
    /// The error of the last attempt once `retry_count` retries have failed.
    pub async fn upload(&self, job: &UploadJob) -> Result<(), UploadError> {
        let mut remaining = self.config.retry_count;

        loop {
            match self.attempt(job).await {
                Ok(()) => return Ok(()),
                Err(err) if remaining == 0 => return Err(err),
                Err(err) => {
                    remaining -= 1;
                    self.logger.warn(format_args!(
                        "{}; retrying {} ({} retries left)",
                        err, job.source_map, remaining
                    ));
                    self.wait().await;
                }
            }
        }
    }

    /// Build the request for one attempt. The form is cloned so every
    /// attempt renders its own body.
    pub fn request(&self, job: &UploadJob) -> UploadRequest {
        let request = UploadRequest::post(self.config.server_url.as_str(), job.form.clone());
        match &self.config.secret {
            Some(secret) => request.with_header(AUTHORIZATION_HEADER, format!("Bearer {}", secret)),
            None => request,
        }
    }

    async fn attempt(&self, job: &UploadJob) -> Result<(), UploadError> {
        self.logger
            .debug(format_args!("uploading {} to Elastic APM", job.source_map));

        let response = self.transport.send(self.request(job)).await?;

        if response.is_ok() {
            self.logger
                .info(format_args!("uploaded {} to Elastic APM", job.source_map));
            Ok(())
        } else {
            self.logger.error(&response.body);
            Err(UploadError::rejected(job.source_map.as_str(), response.status))
        }
    }

    async fn wait(&self) {
        match self.config.retry_delay() {
            Some(delay) => tokio::time::sleep(delay).await,
            None => tokio::task::yield_now().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::LogLevel;
    use crate::packager::UploadForm;
    use crate::transport::{MemoryTransport, UploadResponse};
    use std::time::Duration;

    fn job() -> UploadJob {
        UploadJob {
            source_file: "app.js".to_string(),
            source_map: "app.js.map".to_string(),
            form: UploadForm::new().text("service_name", "svc"),
        }
    }

    fn uploader(config: Config, transport: Arc<MemoryTransport>) -> Uploader {
        Uploader::new(
            Arc::new(config),
            transport,
            Logger::new("test", LogLevel::Silent),
        )
    }

    fn config() -> Config {
        Config::new("svc", "1.0.0", "/js", "http://apm.test/sourcemaps")
    }

    #[tokio::test]
    async fn test_success_single_request() {
        let transport = Arc::new(MemoryTransport::new());
        uploader(config(), transport.clone())
            .upload(&job())
            .await
            .unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "http://apm.test/sourcemaps");
        assert!(requests[0].headers.is_empty());
    }

    #[tokio::test]
    async fn test_bearer_header() {
        let transport = Arc::new(MemoryTransport::new());
        uploader(config().with_secret("mock-secret"), transport.clone())
            .upload(&job())
            .await
            .unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].headers.len(), 1);
        assert_eq!(
            requests[0].header(AUTHORIZATION_HEADER),
            Some("Bearer mock-secret")
        );
    }

    #[tokio::test]
    async fn test_rejection_without_retry() {
        let transport =
            Arc::new(MemoryTransport::new().fallback(UploadResponse::new(400, "failed")));
        let err = uploader(config(), transport.clone())
            .upload(&job())
            .await
            .unwrap_err();

        assert!(matches!(err, UploadError::Rejected { status: 400, .. }));
        assert_eq!(err.to_string(), "error while uploading app.js.map to Elastic APM");
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn test_budget_exhausted_sends_n_plus_one() {
        let transport = Arc::new(MemoryTransport::new().fallback_failure("failed"));
        let err = uploader(config().with_retry(3, 0), transport.clone())
            .upload(&job())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "failed");
        assert_eq!(transport.request_count(), 4);
    }

    #[tokio::test]
    async fn test_last_error_surfaces() {
        let transport = Arc::new(
            MemoryTransport::new()
                .fail_with("connection reset")
                .respond_with(UploadResponse::new(503, "unavailable")),
        );
        let err = uploader(config().with_retry(1, 0), transport.clone())
            .upload(&job())
            .await
            .unwrap_err();

        assert!(matches!(err, UploadError::Rejected { status: 503, .. }));
        assert_eq!(transport.request_count(), 2);
    }

    #[tokio::test]
    async fn test_every_attempt_failure_is_retried() {
        let transport = Arc::new(
            MemoryTransport::new()
                .respond_with(UploadResponse::new(400, "bad request"))
                .fail_with("connection reset"),
        );
        uploader(config().with_retry(2, 0), transport.clone())
            .upload(&job())
            .await
            .unwrap();

        assert_eq!(transport.request_count(), 3);
    }

    #[tokio::test]
    async fn test_retry_then_succeed_waits_between_attempts() {
        let transport = Arc::new(
            MemoryTransport::new()
                .respond_with(UploadResponse::new(500, "boom"))
                .respond_with(UploadResponse::new(500, "boom")),
        );
        let started = tokio::time::Instant::now();
        uploader(config().with_retry(2, 10), transport.clone())
            .upload(&job())
            .await
            .unwrap();

        assert!(started.elapsed() >= Duration::from_millis(20));
        assert_eq!(transport.request_count(), 3);
    }

    #[tokio::test]
    async fn test_each_attempt_carries_the_full_form() {
        let transport = Arc::new(MemoryTransport::new().fail_with("failed"));
        uploader(config().with_retry(1, 0), transport.clone())
            .upload(&job())
            .await
            .unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].form, requests[1].form);
        assert_eq!(requests[1].form.text_field("service_name"), Some("svc"));
    }
}
