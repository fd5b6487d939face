//! Client for a commerce platform REST API.
//!
//! Every remote operation is described by an [`EndpointDescriptor`]: an HTTP
//! method, a path template and the names of its path and query parameters.
//! A single generic [`Dispatcher`] turns a descriptor plus a flat
//! [`ArgumentBag`] into an HTTP request, sends it through an [`HttpTransport`],
//! and turns the reply into a [`NormalizedResponse`] or an [`Error`].
//!
//! The descriptors for the whole API surface live in the [`ApiCatalog`], so
//! adding an endpoint is a data change rather than a code change.
//!
//! ```rust,ignore
//! use commerce_client::{ApiCatalog, ArgumentBag, ClientConfig, Credential, Dispatcher};
//! use std::sync::Arc;
//!
//! let catalog = Arc::new(ApiCatalog::embedded()?);
//! let dispatcher = Dispatcher::new(&ClientConfig::default())?.with_catalog(catalog);
//! let credential = Credential::new("EAAAl...");
//!
//! let args = ArgumentBag::new().with("account_id", "abc123");
//! let response = dispatcher
//!     .call("retrieve_loyalty_account", &credential, args)
//!     .await?;
//! ```

pub mod arguments;
pub mod catalog;
pub mod config;
pub mod descriptor;
pub mod dispatcher;
pub mod errors;
pub mod headers;
pub mod request;
pub mod response;
pub mod transport;

pub use arguments::{ArgumentBag, FileUpload};
pub use catalog::{ApiCatalog, CatalogEntry, ReleaseStatus};
pub use config::{ClientConfig, Environment, ResidualArgumentPolicy};
pub use descriptor::{
    BodyKind, EndpointDescriptor, FilePartDescriptor, HttpMethod, PathParameter, QueryParameter,
};
pub use dispatcher::Dispatcher;
pub use errors::{ApiErrorDetail, Error, RemoteError};
pub use headers::{Credential, DefaultHeaderBuilder, HeaderBuilder};
pub use request::{build_request, MultipartPart, OutboundRequest, RequestBody};
pub use response::{
    DefaultResponseNormalizer, NormalizedResponse, RawResponse, ResponseBody, ResponseNormalizer,
};
pub use transport::{HttpTransport, ReqwestTransport};
