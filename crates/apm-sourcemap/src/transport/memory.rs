use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

use super::{Transport, TransportError, UploadRequest, UploadResponse};

/// A scripted answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Respond(UploadResponse),
    /// Fail as if the network dropped the request
    Fail(String),
}

impl Reply {
    fn into_result(self) -> Result<UploadResponse, TransportError> {
        match self {
            Reply::Respond(response) => Ok(response),
            Reply::Fail(message) => Err(TransportError::new(message)),
        }
    }
}

/// In-memory [`Transport`] that records every request.
///
/// Replies are taken from a queue in order; once the queue is empty every
/// request gets the fallback reply (`200 "ok"` unless changed).
///
/// # Example
///
/// ```rust
/// use apm_sourcemap::transport::{MemoryTransport, UploadResponse};
///
/// let transport = MemoryTransport::new()
///     .respond_with(UploadResponse::new(500, "busy"))
///     .fallback(UploadResponse::ok("ok"));
/// assert_eq!(transport.request_count(), 0);
/// ```
#[derive(Debug)]
pub struct MemoryTransport {
    script: Mutex<VecDeque<Reply>>,
    fallback: Reply,
    requests: Mutex<Vec<UploadRequest>>,
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Reply::Respond(UploadResponse::ok("ok")),
            requests: Mutex::new(Vec::new()),
        }
    }
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for the next unanswered request
    pub fn respond_with(self, response: UploadResponse) -> Self {
        self.script.lock().push_back(Reply::Respond(response));
        self
    }

    /// Queue a network failure for the next unanswered request
    pub fn fail_with(self, message: impl Into<String>) -> Self {
        self.script.lock().push_back(Reply::Fail(message.into()));
        self
    }

    /// Reply used once the script is exhausted
    pub fn fallback(mut self, response: UploadResponse) -> Self {
        self.fallback = Reply::Respond(response);
        self
    }

    /// Make every unscripted request fail at the network level
    pub fn fallback_failure(mut self, message: impl Into<String>) -> Self {
        self.fallback = Reply::Fail(message.into());
        self
    }

    /// Snapshot of the requests received so far, in arrival order
    pub fn requests(&self) -> Vec<UploadRequest> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn send(&self, request: UploadRequest) -> Result<UploadResponse, TransportError> {
        self.requests.lock().push(request);
        let reply = self
            .script
            .lock()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        reply.into_result()
    }
}
