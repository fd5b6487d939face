//! The caller supplied argument bag.
//!
//! An [`ArgumentBag`] maps parameter names to JSON values. During dispatch the
//! path and query parameters are taken out of the bag; whatever is left over
//! becomes the request body. Files for multipart uploads travel alongside the
//! values and are only consumed by multipart endpoints.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::Error;

#[cfg(test)]
#[path = "arguments_tests.rs"]
mod tests;

/// A file attached to a multipart request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    /// File name reported to the remote service.
    pub file_name: String,

    /// MIME type of the content. Defaults to `application/octet-stream` when sent.
    pub content_type: Option<String>,

    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// The per-call mapping from parameter name to value.
///
/// A `null` value is treated the same as a missing value.
///
/// # Examples
///
/// ```
/// use commerce_client::ArgumentBag;
/// use serde_json::json;
///
/// let args = ArgumentBag::new()
///     .with("account_id", "abc123")
///     .with("points", 10);
///
/// assert_eq!(args.len(), 2);
/// assert_eq!(args.get("points"), Some(&json!(10)));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgumentBag {
    values: Map<String, Value>,
    files: BTreeMap<String, FileUpload>,
}

impl ArgumentBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a bag from a JSON value, which must be an object.
    pub fn from_json(value: Value) -> Result<Self, Error> {
        match value {
            Value::Object(values) => Ok(Self {
                values,
                files: BTreeMap::new(),
            }),
            Value::Null => Ok(Self::new()),
            other => Err(Error::InvalidParameter {
                name: "arguments".to_string(),
                reason: format!("expected a JSON object, found {}", json_type_name(&other)),
            }),
        }
    }

    /// Adds a value and returns the bag.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Adds a file and returns the bag.
    pub fn with_file(mut self, name: impl Into<String>, file: FileUpload) -> Self {
        self.insert_file(name, file);
        self
    }

    /// Inserts a value, returning the previous value for the name if any.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(name.into(), value.into())
    }

    pub fn insert_file(&mut self, name: impl Into<String>, file: FileUpload) -> Option<FileUpload> {
        self.files.insert(name.into(), file)
    }

    /// Merges the values of another bag into this one. Values in `other` win.
    pub fn extend(&mut self, other: ArgumentBag) {
        self.values.extend(other.values);
        self.files.extend(other.files);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Removes a value from the bag. A `null` value is removed and reported as absent.
    pub fn take(&mut self, name: &str) -> Option<Value> {
        match self.values.remove(name) {
            Some(Value::Null) | None => None,
            Some(value) => Some(value),
        }
    }

    pub fn take_file(&mut self, name: &str) -> Option<FileUpload> {
        self.files.remove(name)
    }

    /// Number of values in the bag. Files are not counted.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the bag holds no values. Files are not considered.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn has_files(&self) -> bool {
        !self.files.is_empty()
    }

    /// The names of all values and files still in the bag.
    pub fn names(&self) -> Vec<String> {
        self.values
            .keys()
            .chain(self.files.keys())
            .cloned()
            .collect()
    }

    /// Removes and returns all remaining files.
    pub fn drain_files(&mut self) -> BTreeMap<String, FileUpload> {
        std::mem::take(&mut self.files)
    }

    /// Consumes the bag and returns the remaining values as a JSON object map.
    pub fn into_values(self) -> Map<String, Value> {
        self.values
    }
}

impl From<Map<String, Value>> for ArgumentBag {
    fn from(values: Map<String, Value>) -> Self {
        Self {
            values,
            files: BTreeMap::new(),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for ArgumentBag
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut bag = ArgumentBag::new();
        for (name, value) in iter {
            bag.insert(name, value);
        }
        bag
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
