//! Error types for commerce client operations.
//!
//! This module defines the error types that can occur while turning an operation
//! call into an HTTP request, sending it, and interpreting the reply. The variants
//! distinguish failures detected before any network traffic (missing parameters,
//! bad configuration) from transport failures, remote rejections and replies that
//! could not be decoded.

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur during commerce client operations.
///
/// ## Examples
///
/// ```rust,ignore
/// use commerce_client::Error;
///
/// match dispatcher.call("retrieve_loyalty_account", &credential, args).await {
///     Ok(response) => println!("{:?}", response.body),
///     Err(Error::MissingParameter(name)) => eprintln!("Please provide '{}'", name),
///     Err(Error::RemoteError(remote)) => eprintln!("Rejected with status {}", remote.status),
///     Err(err) => eprintln!("Other error: {}", err),
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required path parameter (or required multipart file part) was not
    /// supplied in the argument bag.
    ///
    /// This error is always detected before any network call is made.
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    /// Arguments were left over for a request method that cannot carry a body.
    ///
    /// Only returned when the client is configured to reject residual arguments
    /// on GET and DELETE requests.
    #[error("Unexpected arguments for {method} request: {}", .names.join(", "))]
    UnexpectedArguments { method: String, names: Vec<String> },

    /// A parameter value could not be turned into a URL component.
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// The HTTP client could not complete the request.
    ///
    /// This covers DNS failures, refused connections, timeouts and failures to
    /// read the response body.
    #[error("Transport failure: {0}")]
    TransportFailure(String),

    /// The remote service answered with a non-success status code.
    #[error("{0}")]
    RemoteError(RemoteError),

    /// The remote service reported success but the reply could not be decoded.
    #[error("Failed to decode response: {0}")]
    DecodeFailure(String),

    /// The client configuration is not usable, e.g. the base URL does not parse.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A header value could not be constructed, e.g. a credential containing
    /// control characters.
    #[error("Invalid header value for '{0}'")]
    InvalidHeader(String),

    /// No operation with the given identifier exists in the catalog.
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// The endpoint catalog could not be loaded or failed validation.
    #[error("Invalid endpoint catalog: {0}")]
    CatalogError(String),
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::DecodeFailure(value.to_string())
    }
}

/// A non-success reply from the remote service.
///
/// The `errors` list holds the structured error entries the service returned in
/// its body. When the body did not contain any, `errors` is empty and `body`
/// holds the raw reply text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteError {
    /// The HTTP status code.
    pub status: u16,

    /// Structured error entries decoded from the body.
    pub errors: Vec<ApiErrorDetail>,

    /// The raw response body.
    pub body: String,
}

impl std::fmt::Display for RemoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.errors.first() {
            Some(first) => {
                write!(f, "Remote service returned status {}: {}", self.status, first)?;
                if self.errors.len() > 1 {
                    write!(f, " (and {} more)", self.errors.len() - 1)?;
                }
                Ok(())
            }
            None if self.body.is_empty() => {
                write!(f, "Remote service returned status {}", self.status)
            }
            None => write!(
                f,
                "Remote service returned status {}: {}",
                self.status, self.body
            ),
        }
    }
}

/// One structured error entry as reported by the remote service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    /// Broad error category, e.g. `INVALID_REQUEST_ERROR`.
    #[serde(default)]
    pub category: String,

    /// Specific error code, e.g. `NOT_FOUND`.
    #[serde(default)]
    pub code: String,

    /// Human readable explanation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// The request field the error refers to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl std::fmt::Display for ApiErrorDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.category, self.code)?;
        if let Some(detail) = &self.detail {
            write!(f, " - {}", detail)?;
        }
        if let Some(field) = &self.field {
            write!(f, " (field: {})", field)?;
        }
        Ok(())
    }
}
