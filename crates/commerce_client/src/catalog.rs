//! The endpoint catalog.
//!
//! All endpoint descriptors live in one machine-readable table rather than in
//! per-endpoint code. The table ships with the crate (`data/api_catalog.json`)
//! and can also be loaded from a file, e.g. one regenerated from a newer API
//! definition. Next to each descriptor the table records the documentation
//! metadata used by discovery tooling: a description and a release status.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::descriptor::EndpointDescriptor;
use crate::Error;

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;

const EMBEDDED_CATALOG: &str = include_str!("../data/api_catalog.json");

/// Catalog format version understood by this crate.
pub const CATALOG_FORMAT_VERSION: u32 = 1;

/// Release status of an endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReleaseStatus {
    #[default]
    Public,
    Beta,
    Deprecated,
}

impl fmt::Display for ReleaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ReleaseStatus::Public => "PUBLIC",
            ReleaseStatus::Beta => "BETA",
            ReleaseStatus::Deprecated => "DEPRECATED",
        };
        f.write_str(text)
    }
}

/// One endpoint of the catalog: its descriptor plus documentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(flatten)]
    pub descriptor: EndpointDescriptor,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub release_status: ReleaseStatus,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    version: u32,
    api_version: String,
    endpoints: Vec<CatalogEntry>,
}

/// An indexed, validated set of endpoint descriptors.
#[derive(Debug, Clone)]
pub struct ApiCatalog {
    api_version: String,
    entries: Vec<CatalogEntry>,
    index: HashMap<String, usize>,
}

impl ApiCatalog {
    /// Loads the catalog that ships with the crate.
    pub fn embedded() -> Result<Self, Error> {
        Self::from_json(EMBEDDED_CATALOG)
    }

    /// Loads a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `Error::CatalogError` if the file cannot be read, is not a valid
    /// catalog document, or fails validation.
    pub fn load(path: &Path) -> Result<Self, Error> {
        debug!("Loading endpoint catalog from {:?}", path);
        let content = fs::read_to_string(path).map_err(|e| {
            Error::CatalogError(format!("Failed to read catalog file {:?}: {}", path, e))
        })?;
        Self::from_json(&content)
    }

    /// Parses and validates a catalog document.
    pub fn from_json(raw: &str) -> Result<Self, Error> {
        let file: CatalogFile = serde_json::from_str(raw)
            .map_err(|e| Error::CatalogError(format!("Failed to parse catalog: {}", e)))?;

        if file.version != CATALOG_FORMAT_VERSION {
            return Err(Error::CatalogError(format!(
                "Unsupported catalog version {} (expected {})",
                file.version, CATALOG_FORMAT_VERSION
            )));
        }

        let catalog = Self::from_entries(file.api_version, file.endpoints)?;
        info!(
            api_version = %catalog.api_version,
            endpoints = catalog.len(),
            "Loaded endpoint catalog"
        );
        Ok(catalog)
    }

    /// Builds a catalog from entries, validating each descriptor.
    ///
    /// # Errors
    ///
    /// Returns `Error::CatalogError` if an operation id repeats or a descriptor
    /// is inconsistent.
    pub fn from_entries(
        api_version: impl Into<String>,
        entries: Vec<CatalogEntry>,
    ) -> Result<Self, Error> {
        let mut index = HashMap::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            entry.descriptor.validate()?;
            if index
                .insert(entry.descriptor.operation.clone(), position)
                .is_some()
            {
                return Err(Error::CatalogError(format!(
                    "Operation '{}' is defined more than once",
                    entry.descriptor.operation
                )));
            }
        }

        Ok(Self {
            api_version: api_version.into(),
            entries,
            index,
        })
    }

    /// The API version the catalog was generated for.
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn get(&self, operation: &str) -> Option<&EndpointDescriptor> {
        self.entry(operation).map(|entry| &entry.descriptor)
    }

    pub fn entry(&self, operation: &str) -> Option<&CatalogEntry> {
        self.index
            .get(operation)
            .and_then(|&position| self.entries.get(position))
    }

    /// Like [`ApiCatalog::get`], but reports an unknown operation as an error.
    pub fn require(&self, operation: &str) -> Result<&EndpointDescriptor, Error> {
        self.get(operation)
            .ok_or_else(|| Error::UnknownOperation(operation.to_string()))
    }

    /// All entries in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    /// The distinct service names, sorted.
    pub fn services(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|entry| entry.descriptor.service.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Entries of one service. The service name is matched case-insensitively.
    pub fn by_service<'a>(&'a self, service: &'a str) -> impl Iterator<Item = &'a CatalogEntry> {
        self.entries
            .iter()
            .filter(move |entry| entry.descriptor.service.eq_ignore_ascii_case(service))
    }

    /// Entries whose operation id, path or description contains `term`,
    /// ignoring case.
    pub fn search(&self, term: &str) -> Vec<&CatalogEntry> {
        let term = term.to_lowercase();
        self.entries
            .iter()
            .filter(|entry| {
                entry.descriptor.operation.to_lowercase().contains(&term)
                    || entry.descriptor.path.to_lowercase().contains(&term)
                    || entry.description.to_lowercase().contains(&term)
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
