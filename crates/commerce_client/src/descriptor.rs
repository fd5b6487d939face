//! Endpoint descriptor types.
//!
//! An [`EndpointDescriptor`] is the static description of one remote operation:
//! the HTTP method, the path template with its `{name}` placeholders, and the
//! parameters that are pulled out of the caller's arguments to fill the path
//! and the query string. Descriptors are data; they are loaded once from the
//! endpoint catalog and never mutated afterwards.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::Error;

#[cfg(test)]
#[path = "descriptor_tests.rs"]
mod tests;

/// The HTTP methods used by the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    /// Returns the canonical upper case name of the method.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }

    /// Whether requests with this method may carry a body.
    ///
    /// Only POST, PUT and PATCH requests carry a body. GET and DELETE requests
    /// never do, whatever arguments remain after path and query extraction.
    pub fn accepts_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }

    /// Converts the method into the `http` crate representation.
    pub fn to_http(&self) -> http::Method {
        match self {
            HttpMethod::Get => http::Method::GET,
            HttpMethod::Post => http::Method::POST,
            HttpMethod::Put => http::Method::PUT,
            HttpMethod::Delete => http::Method::DELETE,
            HttpMethod::Patch => http::Method::PATCH,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            "PATCH" => Ok(HttpMethod::Patch),
            other => Err(Error::CatalogError(format!(
                "Unsupported HTTP method: {}",
                other
            ))),
        }
    }
}

/// A parameter substituted into the path template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathParameter {
    /// The placeholder name, without braces.
    pub name: String,

    /// Whether dispatch fails when the argument is missing.
    #[serde(default = "default_required")]
    pub required: bool,
}

fn default_required() -> bool {
    true
}

/// A parameter appended to the query string when present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParameter {
    pub name: String,
}

/// A binary part of a multipart request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePartDescriptor {
    /// The form field name of the part.
    pub name: String,

    #[serde(default)]
    pub required: bool,
}

/// How the residual arguments of a request are encoded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BodyKind {
    /// The residual arguments are sent as a JSON object.
    #[default]
    Json,

    /// The request is sent as `multipart/form-data` with the residual arguments
    /// in a JSON part named `json_part` and one binary part per file.
    Multipart {
        json_part: String,
        #[serde(default)]
        file_parts: Vec<FilePartDescriptor>,
    },
}

/// Static description of one remote operation.
///
/// # Examples
///
/// ```
/// use commerce_client::{EndpointDescriptor, HttpMethod};
///
/// let descriptor = EndpointDescriptor::new(
///     "list_loyalty_promotions",
///     HttpMethod::Get,
///     "/v2/loyalty/programs/{program_id}/promotions",
/// )
/// .with_path_parameter("program_id", true)
/// .with_query_parameter("status")
/// .with_query_parameter("cursor")
/// .with_query_parameter("limit");
///
/// assert_eq!(descriptor.placeholders(), vec!["program_id".to_string()]);
/// assert!(!descriptor.accepts_body());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointDescriptor {
    /// Unique operation identifier, e.g. `retrieve_loyalty_account`.
    pub operation: String,

    /// The service group the operation belongs to, e.g. `Loyalty`.
    #[serde(default)]
    pub service: String,

    pub method: HttpMethod,

    /// Path template, e.g. `/v2/loyalty/accounts/{account_id}`.
    pub path: String,

    #[serde(default)]
    pub path_parameters: Vec<PathParameter>,

    #[serde(default)]
    pub query_parameters: Vec<QueryParameter>,

    #[serde(default)]
    pub body: BodyKind,

    /// Name of the request type in the remote API's schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_type: Option<String>,

    /// Name of the response type in the remote API's schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_type: Option<String>,
}

impl EndpointDescriptor {
    /// Creates a descriptor with a JSON body and no parameters.
    pub fn new(operation: impl Into<String>, method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            service: String::new(),
            method,
            path: path.into(),
            path_parameters: Vec::new(),
            query_parameters: Vec::new(),
            body: BodyKind::Json,
            request_type: None,
            response_type: None,
        }
    }

    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = service.into();
        self
    }

    pub fn with_path_parameter(mut self, name: impl Into<String>, required: bool) -> Self {
        self.path_parameters.push(PathParameter {
            name: name.into(),
            required,
        });
        self
    }

    pub fn with_query_parameter(mut self, name: impl Into<String>) -> Self {
        self.query_parameters
            .push(QueryParameter { name: name.into() });
        self
    }

    /// Switches the descriptor to a multipart body.
    pub fn with_multipart(
        mut self,
        json_part: impl Into<String>,
        file_parts: Vec<FilePartDescriptor>,
    ) -> Self {
        self.body = BodyKind::Multipart {
            json_part: json_part.into(),
            file_parts,
        };
        self
    }

    /// Whether requests for this operation may carry a body.
    pub fn accepts_body(&self) -> bool {
        self.method.accepts_body()
    }

    pub fn is_multipart(&self) -> bool {
        matches!(self.body, BodyKind::Multipart { .. })
    }

    /// Returns the placeholder names in the path template, in order of appearance.
    pub fn placeholders(&self) -> Vec<String> {
        placeholder_regex()
            .captures_iter(&self.path)
            .map(|c| c[1].to_string())
            .collect()
    }

    pub fn path_parameter(&self, name: &str) -> Option<&PathParameter> {
        self.path_parameters.iter().find(|p| p.name == name)
    }

    /// Checks the descriptor for internal consistency.
    ///
    /// Every placeholder needs a path parameter and every path parameter a
    /// placeholder, parameter names may not repeat, and multipart bodies are only
    /// allowed on methods that carry a body.
    pub fn validate(&self) -> Result<(), Error> {
        if self.operation.trim().is_empty() {
            return Err(Error::CatalogError(format!(
                "Endpoint '{}' has an empty operation id",
                self.path
            )));
        }

        if !self.path.starts_with('/') {
            return Err(Error::CatalogError(format!(
                "Path '{}' of operation '{}' must start with '/'",
                self.path, self.operation
            )));
        }

        let placeholders = self.placeholders();
        for placeholder in &placeholders {
            if self.path_parameter(placeholder).is_none() {
                return Err(Error::CatalogError(format!(
                    "Placeholder '{{{}}}' of operation '{}' has no path parameter",
                    placeholder, self.operation
                )));
            }
        }

        let mut seen = std::collections::HashSet::new();
        for parameter in &self.path_parameters {
            if !placeholders.contains(&parameter.name) {
                return Err(Error::CatalogError(format!(
                    "Path parameter '{}' of operation '{}' does not appear in '{}'",
                    parameter.name, self.operation, self.path
                )));
            }
            if !seen.insert(parameter.name.as_str()) {
                return Err(Error::CatalogError(format!(
                    "Parameter '{}' is declared twice for operation '{}'",
                    parameter.name, self.operation
                )));
            }
        }
        for parameter in &self.query_parameters {
            if !seen.insert(parameter.name.as_str()) {
                return Err(Error::CatalogError(format!(
                    "Parameter '{}' is declared twice for operation '{}'",
                    parameter.name, self.operation
                )));
            }
        }

        if self.is_multipart() && !self.accepts_body() {
            return Err(Error::CatalogError(format!(
                "Operation '{}' uses a multipart body with method {}",
                self.operation, self.method
            )));
        }

        Ok(())
    }
}

pub(crate) fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\{([A-Za-z0-9_]+)\}").expect("placeholder pattern is a valid regex")
    })
}
