//! Response normalization.
//!
//! The transport hands back a [`RawResponse`]; a [`ResponseNormalizer`] turns
//! it into either a [`NormalizedResponse`] or an error. The default policy
//! treats every 2xx status as success and decodes the body according to its
//! content type. Every other status becomes `Error::RemoteError`, with the
//! remote service's structured error list decoded when the body has one.

use http::header::{HeaderMap, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::errors::{ApiErrorDetail, RemoteError};
use crate::Error;

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;

/// A response as received from the transport.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    fn content_type(&self) -> Option<&str> {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }
}

/// The decoded body of a successful response.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    /// A body with a non-JSON content type.
    Text(String),
    Empty,
}

/// A successful response with its decoded body.
#[derive(Debug, Clone)]
pub struct NormalizedResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: ResponseBody,
}

impl NormalizedResponse {
    /// Decodes the body into `T`.
    ///
    /// An empty body decodes as JSON `null`, so it can be read as `Option<T>`
    /// or `()`.
    ///
    /// # Errors
    ///
    /// Returns `Error::DecodeFailure` if the body is not JSON or does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        match &self.body {
            ResponseBody::Json(value) => Ok(T::deserialize(value)?),
            ResponseBody::Empty => Ok(T::deserialize(&Value::Null)?),
            ResponseBody::Text(_) => Err(Error::DecodeFailure(
                "Response body is not JSON".to_string(),
            )),
        }
    }

    /// Consumes the response and returns the body as a JSON value.
    ///
    /// Text bodies become JSON strings and empty bodies become `null`.
    pub fn into_value(self) -> Value {
        match self.body {
            ResponseBody::Json(value) => value,
            ResponseBody::Text(text) => Value::String(text),
            ResponseBody::Empty => Value::Null,
        }
    }
}

/// Maps a raw response to a decoded payload or an error.
pub trait ResponseNormalizer: Send + Sync {
    fn normalize(&self, response: RawResponse) -> Result<NormalizedResponse, Error>;
}

/// The default status and content handling policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultResponseNormalizer;

#[derive(Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    errors: Vec<ApiErrorDetail>,
}

impl ResponseNormalizer for DefaultResponseNormalizer {
    fn normalize(&self, response: RawResponse) -> Result<NormalizedResponse, Error> {
        if !response.is_success() {
            return Err(Error::RemoteError(remote_error(&response)));
        }

        let json = is_json(response.content_type());
        let RawResponse {
            status,
            headers,
            body,
        } = response;

        let body = if body.iter().all(u8::is_ascii_whitespace) {
            ResponseBody::Empty
        } else if json {
            ResponseBody::Json(serde_json::from_slice(&body)?)
        } else {
            ResponseBody::Text(String::from_utf8(body).map_err(|e| {
                Error::DecodeFailure(format!("Response body is not valid UTF-8: {}", e))
            })?)
        };

        Ok(NormalizedResponse {
            status,
            headers,
            body,
        })
    }
}

/// Whether a body with the given content type should be parsed as JSON.
///
/// A missing content type is treated as JSON since the API speaks JSON only.
fn is_json(content_type: Option<&str>) -> bool {
    match content_type {
        None => true,
        Some(value) => {
            let mime = value.split(';').next().unwrap_or("").trim();
            mime.eq_ignore_ascii_case("application/json") || mime.ends_with("+json")
        }
    }
}

fn remote_error(response: &RawResponse) -> RemoteError {
    let body = String::from_utf8_lossy(&response.body).into_owned();
    let errors = serde_json::from_slice::<ErrorEnvelope>(&response.body)
        .map(|envelope| envelope.errors)
        .unwrap_or_else(|e| {
            debug!(
                status = response.status,
                error = %e,
                "Error response did not contain a structured error list"
            );
            Vec::new()
        });

    RemoteError {
        status: response.status,
        errors,
        body,
    }
}
