//! Credentials and the default request headers.
//!
//! Every request carries the same set of headers: the content type, the
//! bearer authorization derived from the caller's credential, the API version
//! and a user agent. The [`HeaderBuilder`] trait lets callers replace how that
//! set is produced.

use http::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use secrecy::{ExposeSecret, SecretString};

use crate::config::ClientConfig;
use crate::Error;

#[cfg(test)]
#[path = "headers_tests.rs"]
mod tests;

/// An opaque access token used to authorize requests.
///
/// The token is held as a secret and is never printed by `Debug`.
#[derive(Debug, Clone)]
pub struct Credential {
    token: SecretString,
}

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: SecretString::from(token.into()),
        }
    }

    /// Exposes the raw token.
    pub fn expose(&self) -> &str {
        self.token.expose_secret()
    }
}

/// Produces the header set attached to every request.
pub trait HeaderBuilder: Send + Sync {
    /// Builds the headers for a request authorized by `credential`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidHeader` if a header value cannot be encoded.
    fn headers(&self, credential: &Credential) -> Result<HeaderMap, Error>;
}

/// The default header set: JSON content type, bearer authorization, API
/// version and user agent.
#[derive(Debug, Clone)]
pub struct DefaultHeaderBuilder {
    version_header: HeaderName,
    api_version: HeaderValue,
    user_agent: HeaderValue,
}

impl DefaultHeaderBuilder {
    /// Creates a builder from the client configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidHeader` if the version header name, the API
    /// version or the user agent is not a valid header component.
    pub fn from_config(config: &ClientConfig) -> Result<Self, Error> {
        let version_header = HeaderName::from_bytes(config.version_header.as_bytes())
            .map_err(|_| Error::InvalidHeader(config.version_header.clone()))?;
        let api_version = HeaderValue::from_str(&config.api_version)
            .map_err(|_| Error::InvalidHeader(config.version_header.clone()))?;
        let user_agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|_| Error::InvalidHeader(USER_AGENT.to_string()))?;

        Ok(Self {
            version_header,
            api_version,
            user_agent,
        })
    }
}

impl HeaderBuilder for DefaultHeaderBuilder {
    fn headers(&self, credential: &Credential) -> Result<HeaderMap, Error> {
        let mut authorization = HeaderValue::from_str(&format!("Bearer {}", credential.expose()))
            .map_err(|_| Error::InvalidHeader(AUTHORIZATION.to_string()))?;
        authorization.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, authorization);
        headers.insert(self.version_header.clone(), self.api_version.clone());
        headers.insert(USER_AGENT, self.user_agent.clone());
        Ok(headers)
    }
}
