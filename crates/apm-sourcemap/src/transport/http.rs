use async_trait::async_trait;
use reqwest::Client;

use super::{Transport, TransportError, UploadRequest, UploadResponse};

/// [`Transport`] backed by a `reqwest` client
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured client (proxies, TLS roots, timeouts)
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: UploadRequest) -> Result<UploadResponse, TransportError> {
        let form = request
            .form
            .to_multipart()
            .map_err(|err| TransportError::with_source("failed to encode multipart body", err))?;

        let mut builder = self
            .client
            .request(request.method, &request.url)
            .multipart(form);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(UploadResponse { status, body })
    }
}
