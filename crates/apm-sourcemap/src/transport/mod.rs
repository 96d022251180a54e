//! HTTP transport abstraction
//!
//! The uploader hands a fully described [`UploadRequest`] to a [`Transport`]
//! and gets back the status and body text. Two implementations ship with the
//! crate:
//!
//! - [`HttpTransport`] - real uploads over `reqwest`
//! - [`MemoryTransport`] - records requests and answers from a script
//!   (dry runs and tests)

mod http;
mod memory;

pub use http::HttpTransport;
pub use memory::{MemoryTransport, Reply};

use async_trait::async_trait;
use indexmap::IndexMap;
use reqwest::Method;

use crate::packager::UploadForm;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A request that never produced a response
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self::with_source(err.to_string(), err)
    }
}

/// One upload attempt
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub url: String,
    pub method: Method,
    /// Headers added by the plugin (the multipart boundary header is added by
    /// the transport when it renders the form)
    pub headers: IndexMap<String, String>,
    pub form: UploadForm,
}

impl UploadRequest {
    pub fn post(url: impl Into<String>, form: UploadForm) -> Self {
        Self {
            url: url.into(),
            method: Method::POST,
            headers: IndexMap::new(),
            form,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

/// Status and full body text of a server response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResponse {
    pub status: u16,
    pub body: String,
}

impl UploadResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// `200` with the given body
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    /// True for any 2xx status
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends upload requests to the APM server.
///
/// Implementations impose no timeout of their own unless configured to; a
/// transport that never answers stalls the upload.
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    async fn send(&self, request: UploadRequest) -> Result<UploadResponse, TransportError>;
}
