//! HTTP transport.
//!
//! The dispatcher never talks to the network directly; it hands each
//! [`OutboundRequest`] to an [`HttpTransport`]. [`ReqwestTransport`] is the
//! production implementation. Tests substitute their own.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::{debug, error, instrument};

use crate::config::ClientConfig;
use crate::request::{MultipartPart, OutboundRequest, RequestBody};
use crate::response::RawResponse;
use crate::Error;

#[cfg(test)]
#[path = "transport_tests.rs"]
mod tests;

/// Sends one request and returns the raw response.
///
/// Implementations perform exactly one attempt. Any failure to obtain a
/// response is reported as `Error::TransportFailure`; HTTP error statuses are
/// not failures at this level.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: OutboundRequest) -> Result<RawResponse, Error>;
}

/// A transport backed by a `reqwest::Client`.
///
/// The client owns the connection pool, so one transport should be shared by
/// all dispatchers that talk to the same host.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Creates a transport with the timeout from the configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfiguration` if the HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| {
                error!(error = %e, "Failed to build the HTTP client");
                Error::InvalidConfiguration(format!("Failed to build the HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    async fn send(&self, request: OutboundRequest) -> Result<RawResponse, Error> {
        let mut builder = self
            .client
            .request(request.method.to_http(), request.url)
            .headers(request.headers);

        builder = match request.body {
            None => builder,
            Some(RequestBody::Json(value)) => {
                let bytes = serde_json::to_vec(&value).map_err(|e| Error::InvalidParameter {
                    name: "body".to_string(),
                    reason: e.to_string(),
                })?;
                builder.body(bytes)
            }
            Some(RequestBody::Multipart(parts)) => builder.multipart(multipart_form(parts)?),
        };

        let response = builder.send().await.map_err(|e| {
            error!(error = %e, "HTTP request failed");
            Error::TransportFailure(e.to_string())
        })?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(|e| {
            error!(status, error = %e, "Failed to read the response body");
            Error::TransportFailure(format!("Failed to read the response body: {}", e))
        })?;

        debug!(status, body_length = body.len(), "Received response");

        Ok(RawResponse {
            status,
            headers,
            body: body.to_vec(),
        })
    }
}

fn multipart_form(parts: Vec<MultipartPart>) -> Result<Form, Error> {
    let mut form = Form::new();
    for part in parts {
        form = match part {
            MultipartPart::Json { name, value } => {
                let text = serde_json::to_string(&value).map_err(|e| Error::InvalidParameter {
                    name: name.clone(),
                    reason: e.to_string(),
                })?;
                let part = Part::text(text)
                    .mime_str("application/json")
                    .map_err(|e| Error::InvalidParameter {
                        name: name.clone(),
                        reason: e.to_string(),
                    })?;
                form.part(name, part)
            }
            MultipartPart::File { name, upload } => {
                let content_type = upload
                    .content_type
                    .as_deref()
                    .unwrap_or("application/octet-stream");
                let part = Part::bytes(upload.bytes)
                    .file_name(upload.file_name)
                    .mime_str(content_type)
                    .map_err(|e| Error::InvalidParameter {
                        name: name.clone(),
                        reason: e.to_string(),
                    })?;
                form.part(name, part)
            }
        };
    }
    Ok(form)
}
