//! Request construction.
//!
//! [`build_request`] is the pure half of a dispatch: it binds the argument bag
//! to an endpoint descriptor and produces the [`OutboundRequest`] that the
//! transport will send. The steps always run in the same order:
//!
//! 1. path parameters are taken out of the bag and substituted into the template
//! 2. query parameters are taken out of the bag and appended to the URL
//! 3. whatever is left becomes the body, if the method carries one
//!
//! The body step must see the bag only after the first two steps have emptied
//! it of path and query values, so path and query parameters never leak into
//! the body.

use std::collections::HashMap;

use http::header::HeaderMap;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::arguments::{json_type_name, ArgumentBag, FileUpload};
use crate::config::ResidualArgumentPolicy;
use crate::descriptor::{placeholder_regex, BodyKind, EndpointDescriptor, HttpMethod};
use crate::Error;

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;

/// A fully bound request, ready to be handed to a transport.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<RequestBody>,
}

/// The body of an outbound request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// A JSON document, sent with `Content-Type: application/json`.
    Json(Value),
    Multipart(Vec<MultipartPart>),
}

/// One part of a `multipart/form-data` body.
#[derive(Debug, Clone, PartialEq)]
pub enum MultipartPart {
    /// A JSON document sent as an `application/json` part.
    Json { name: String, value: Value },
    File { name: String, upload: FileUpload },
}

/// Binds `args` to `descriptor` and builds the request URL and body.
///
/// The returned request has no headers; the dispatcher adds those.
///
/// # Errors
///
/// - `Error::MissingParameter` if a required path parameter or file part is absent
/// - `Error::InvalidParameter` if a path parameter is not a string, number or boolean
/// - `Error::UnexpectedArguments` if arguments remain for a GET or DELETE request
///   and `policy` is `Reject`
/// - `Error::InvalidConfiguration` if `base_url` cannot take a path
pub fn build_request(
    base_url: &Url,
    descriptor: &EndpointDescriptor,
    mut args: ArgumentBag,
    policy: ResidualArgumentPolicy,
) -> Result<OutboundRequest, Error> {
    let mut url = base_url.clone();
    apply_path(&mut url, descriptor, &mut args)?;
    apply_query(&mut url, descriptor, &mut args);
    let body = build_body(descriptor, args, policy)?;

    debug!(
        operation = %descriptor.operation,
        method = %descriptor.method,
        url = %url,
        has_body = body.is_some(),
        "Built request"
    );

    Ok(OutboundRequest {
        method: descriptor.method,
        url,
        headers: HeaderMap::new(),
        body,
    })
}

fn apply_path(
    url: &mut Url,
    descriptor: &EndpointDescriptor,
    args: &mut ArgumentBag,
) -> Result<(), Error> {
    let mut values: HashMap<&str, Option<String>> = HashMap::new();
    for parameter in &descriptor.path_parameters {
        let value = match args.take(&parameter.name) {
            Some(value) => Some(path_value(&parameter.name, value)?),
            None if parameter.required => {
                return Err(Error::MissingParameter(parameter.name.clone()))
            }
            None => None,
        };
        values.insert(parameter.name.as_str(), value);
    }

    let mut segments = Vec::new();
    for raw in descriptor.path.split('/').filter(|s| !s.is_empty()) {
        if let Some(segment) = substitute_segment(raw, descriptor, &values)? {
            segments.push(segment);
        }
    }

    if url.cannot_be_a_base() {
        return Err(Error::InvalidConfiguration(format!(
            "Base URL '{}' cannot take a path",
            url
        )));
    }
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty();
        for segment in &segments {
            path.push(segment);
        }
    }

    Ok(())
}

/// Replaces the placeholders in one path segment.
///
/// Returns `None` when the segment refers to an optional parameter that was not
/// supplied; such segments are left out of the path.
fn substitute_segment(
    raw: &str,
    descriptor: &EndpointDescriptor,
    values: &HashMap<&str, Option<String>>,
) -> Result<Option<String>, Error> {
    let regex = placeholder_regex();
    let mut segment = String::with_capacity(raw.len());
    let mut last = 0;
    for captures in regex.captures_iter(raw) {
        let whole = captures.get(0).map(|m| m.range()).unwrap_or(0..0);
        let name = &captures[1];
        let value = match values.get(name) {
            Some(Some(value)) => value,
            Some(None) => return Ok(None),
            None => {
                return Err(Error::CatalogError(format!(
                    "Placeholder '{{{}}}' of operation '{}' has no path parameter",
                    name, descriptor.operation
                )))
            }
        };
        segment.push_str(&raw[last..whole.start]);
        segment.push_str(value);
        last = whole.end;
    }
    segment.push_str(&raw[last..]);

    Ok(Some(segment))
}

/// Appends the supplied query parameters in declaration order.
///
/// Values use `application/x-www-form-urlencoded` encoding, so a space is sent
/// as `+` and a literal `+` as `%2B`.
fn apply_query(url: &mut Url, descriptor: &EndpointDescriptor, args: &mut ArgumentBag) {
    let pairs: Vec<(&str, String)> = descriptor
        .query_parameters
        .iter()
        .filter_map(|parameter| {
            args.take(&parameter.name)
                .map(|value| (parameter.name.as_str(), query_value(value)))
        })
        .collect();

    url.set_query(None);
    if pairs.is_empty() {
        return;
    }

    let mut query = url.query_pairs_mut();
    for (name, value) in &pairs {
        query.append_pair(name, value);
    }
}

fn build_body(
    descriptor: &EndpointDescriptor,
    mut args: ArgumentBag,
    policy: ResidualArgumentPolicy,
) -> Result<Option<RequestBody>, Error> {
    if !descriptor.accepts_body() {
        return residual_without_body(descriptor, args, policy);
    }

    match &descriptor.body {
        BodyKind::Json => {
            let ignored: Vec<String> = args.drain_files().into_keys().collect();
            if !ignored.is_empty() {
                warn!(
                    operation = %descriptor.operation,
                    files = ?ignored,
                    "Ignoring files for an operation without a multipart body"
                );
            }
            if args.is_empty() {
                Ok(None)
            } else {
                Ok(Some(RequestBody::Json(Value::Object(args.into_values()))))
            }
        }
        BodyKind::Multipart {
            json_part,
            file_parts,
        } => {
            let mut parts = Vec::new();
            for file_part in file_parts {
                match args.take_file(&file_part.name) {
                    Some(upload) => parts.push(MultipartPart::File {
                        name: file_part.name.clone(),
                        upload,
                    }),
                    None if file_part.required => {
                        return Err(Error::MissingParameter(file_part.name.clone()))
                    }
                    None => {}
                }
            }

            let ignored: Vec<String> = args.drain_files().into_keys().collect();
            if !ignored.is_empty() {
                warn!(
                    operation = %descriptor.operation,
                    files = ?ignored,
                    "Ignoring files that are not declared for this operation"
                );
            }

            if !args.is_empty() {
                parts.insert(
                    0,
                    MultipartPart::Json {
                        name: json_part.clone(),
                        value: Value::Object(args.into_values()),
                    },
                );
            }

            Ok(Some(RequestBody::Multipart(parts)))
        }
    }
}

fn residual_without_body(
    descriptor: &EndpointDescriptor,
    args: ArgumentBag,
    policy: ResidualArgumentPolicy,
) -> Result<Option<RequestBody>, Error> {
    let names = args.names();
    if names.is_empty() {
        return Ok(None);
    }

    match policy {
        ResidualArgumentPolicy::Ignore => {
            warn!(
                operation = %descriptor.operation,
                method = %descriptor.method,
                arguments = ?names,
                "Dropping arguments that are neither path nor query parameters"
            );
            Ok(None)
        }
        ResidualArgumentPolicy::Reject => Err(Error::UnexpectedArguments {
            method: descriptor.method.to_string(),
            names,
        }),
    }
}

/// The string form of a path parameter value.
fn path_value(name: &str, value: Value) -> Result<String, Error> {
    match value {
        // Empty and dot-only segments would collapse or re-target the path.
        Value::String(s) if s.chars().all(|c| c == '.') => Err(Error::InvalidParameter {
            name: name.to_string(),
            reason: if s.is_empty() {
                "path parameters must not be empty".to_string()
            } else {
                format!("'{}' is not a valid path segment", s)
            },
        }),
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(Error::InvalidParameter {
            name: name.to_string(),
            reason: format!(
                "path parameters must be strings, numbers or booleans, found {}",
                json_type_name(&other)
            ),
        }),
    }
}

/// The string form of a query parameter value.
///
/// Arrays are joined with commas, objects are sent as JSON text.
fn query_value(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Array(items) => items
            .into_iter()
            .filter(|item| !item.is_null())
            .map(query_value)
            .collect::<Vec<_>>()
            .join(","),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
