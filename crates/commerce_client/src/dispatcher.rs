//! The generic operation dispatcher.
//!
//! A [`Dispatcher`] owns the three collaborators of a call (transport, header
//! builder and response normalizer) and runs the same pipeline for every
//! endpoint: bind arguments, attach headers, send once, normalize.

use std::fmt;
use std::sync::Arc;

use http::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, instrument};
use url::Url;

use crate::arguments::ArgumentBag;
use crate::catalog::ApiCatalog;
use crate::config::{ClientConfig, ResidualArgumentPolicy};
use crate::descriptor::EndpointDescriptor;
use crate::headers::{Credential, DefaultHeaderBuilder, HeaderBuilder};
use crate::request::{build_request, OutboundRequest, RequestBody};
use crate::response::{DefaultResponseNormalizer, NormalizedResponse, ResponseNormalizer};
use crate::transport::{HttpTransport, ReqwestTransport};
use crate::Error;

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;

/// Executes endpoint operations.
///
/// Cloning is cheap; clones share the same collaborators.
#[derive(Clone)]
pub struct Dispatcher {
    base_url: Url,
    residual_arguments: ResidualArgumentPolicy,
    transport: Arc<dyn HttpTransport>,
    headers: Arc<dyn HeaderBuilder>,
    normalizer: Arc<dyn ResponseNormalizer>,
    catalog: Option<Arc<ApiCatalog>>,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("base_url", &self.base_url.as_str())
            .field("residual_arguments", &self.residual_arguments)
            .field("catalog", &self.catalog.as_ref().map(|c| c.len()))
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Creates a dispatcher with the default collaborators for `config`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfiguration` if the base URL is invalid or the
    /// HTTP client cannot be built, and `Error::InvalidHeader` if a configured
    /// header value cannot be encoded.
    pub fn new(config: &ClientConfig) -> Result<Self, Error> {
        let base_url = config.base_url()?;
        let transport = ReqwestTransport::from_config(config)?;
        let headers = DefaultHeaderBuilder::from_config(config)?;

        info!(
            base_url = %base_url,
            api_version = %config.api_version,
            "Created commerce API dispatcher"
        );

        Ok(Self {
            base_url,
            residual_arguments: config.residual_arguments,
            transport: Arc::new(transport),
            headers: Arc::new(headers),
            normalizer: Arc::new(DefaultResponseNormalizer),
            catalog: None,
        })
    }

    pub fn with_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = transport;
        self
    }

    pub fn with_header_builder(mut self, headers: Arc<dyn HeaderBuilder>) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_normalizer(mut self, normalizer: Arc<dyn ResponseNormalizer>) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Attaches a catalog so operations can be called by id.
    pub fn with_catalog(mut self, catalog: Arc<ApiCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn catalog(&self) -> Option<&ApiCatalog> {
        self.catalog.as_deref()
    }

    /// Builds the request for `descriptor` without sending it.
    ///
    /// The result carries the full header set, including the authorization
    /// header. For multipart requests the JSON content type is left out so the
    /// transport can set the form boundary.
    pub fn prepare(
        &self,
        descriptor: &EndpointDescriptor,
        credential: &Credential,
        args: ArgumentBag,
    ) -> Result<OutboundRequest, Error> {
        let mut request = build_request(&self.base_url, descriptor, args, self.residual_arguments)?;

        let mut headers = self.headers.headers(credential)?;
        if matches!(request.body, Some(RequestBody::Multipart(_))) {
            headers.remove(CONTENT_TYPE);
        }
        request.headers = headers;

        Ok(request)
    }

    /// Executes one operation.
    ///
    /// Validation failures are reported before anything is sent. The request
    /// is attempted exactly once.
    ///
    /// # Errors
    ///
    /// - `Error::MissingParameter`, `Error::InvalidParameter` or
    ///   `Error::UnexpectedArguments` if the arguments do not fit the descriptor
    /// - `Error::TransportFailure` if no response was received
    /// - `Error::RemoteError` if the service answered with a non-2xx status
    /// - `Error::DecodeFailure` if a success reply could not be decoded
    #[instrument(
        skip(self, descriptor, credential, args),
        fields(operation = %descriptor.operation, method = %descriptor.method)
    )]
    pub async fn dispatch(
        &self,
        descriptor: &EndpointDescriptor,
        credential: &Credential,
        args: ArgumentBag,
    ) -> Result<NormalizedResponse, Error> {
        let request = self.prepare(descriptor, credential, args)?;
        debug!(url = %request.url, "Sending request");

        let raw = self.transport.send(request).await?;
        let status = raw.status;

        match self.normalizer.normalize(raw) {
            Ok(response) => {
                info!(status, "Operation completed");
                Ok(response)
            }
            Err(e) => {
                error!(status, error = %e, "Operation failed");
                Err(e)
            }
        }
    }

    /// Executes one operation and decodes the reply into `T`.
    pub async fn dispatch_json<T: DeserializeOwned>(
        &self,
        descriptor: &EndpointDescriptor,
        credential: &Credential,
        args: ArgumentBag,
    ) -> Result<T, Error> {
        self.dispatch(descriptor, credential, args).await?.json()
    }

    /// Looks up `operation` in the attached catalog and executes it.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownOperation` if no catalog is attached or the
    /// catalog has no such operation, otherwise the errors of
    /// [`Dispatcher::dispatch`].
    pub async fn call(
        &self,
        operation: &str,
        credential: &Credential,
        args: ArgumentBag,
    ) -> Result<NormalizedResponse, Error> {
        let descriptor = self
            .catalog
            .as_deref()
            .ok_or_else(|| Error::UnknownOperation(operation.to_string()))?
            .require(operation)?;
        self.dispatch(descriptor, credential, args).await
    }
}
