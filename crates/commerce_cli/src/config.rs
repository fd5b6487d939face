//! Configuration management for the commerce CLI.
//!
//! The CLI reads its settings from a TOML file, by default `commerce.toml` in
//! the current directory. The file holds the client settings (environment,
//! API version, timeouts) and the CLI-specific authentication settings. The
//! access token itself is never written to this file; it lives in the system
//! keyring or in an environment variable.

use std::{
    fs,
    path::{Path, PathBuf},
};

use commerce_client::{ApiCatalog, ClientConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::Error;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "commerce.toml";

/// Environment variable consulted for the access token when no `--token` is given
pub const DEFAULT_TOKEN_ENV_VAR: &str = "COMMERCE_ACCESS_TOKEN";

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Main configuration structure for the commerce CLI.
///
/// # Example TOML Configuration
///
/// ```toml
/// catalog_path = "./api_catalog.json"
///
/// [client]
/// environment = "sandbox"
/// timeout_seconds = 30
///
/// [authentication]
/// token_env_var = "COMMERCE_ACCESS_TOKEN"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Endpoint catalog to use instead of the built-in one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<String>,

    #[serde(default)]
    pub client: ClientConfig,

    #[serde(default)]
    pub authentication: AuthenticationConfig,
}

impl AppConfig {
    /// Loads configuration from a TOML file at the specified path.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if:
    /// - The specified file does not exist
    /// - The file cannot be read
    /// - The file contains invalid TOML or does not match the configuration schema
    pub fn load(path: &Path) -> Result<Self, Error> {
        debug!("Loading configuration from {:?}", path);

        if !path.exists() {
            return Err(Error::Config(format!(
                "Configuration file not found: {:?}",
                path
            )));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read configuration file: {}", e)))?;

        let config: AppConfig = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse configuration file: {}", e)))?;

        Ok(config)
    }

    /// Loads the configuration if the file exists, otherwise returns the
    /// defaults. A file that exists but is invalid is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self, Error> {
        if path.exists() {
            Self::load(path)
        } else {
            debug!("No configuration file at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Saves the configuration to a TOML file, creating parent directories as
    /// needed. Existing files are overwritten.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the configuration cannot be serialized or
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        debug!("Saving configuration to {:?}", path);

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize configuration: {}", e)))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create directory: {}", e)))?;
        }

        fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write configuration file: {}", e)))?;

        info!("Configuration saved to {:?}", path);
        Ok(())
    }

    /// Loads the endpoint catalog this configuration points at.
    pub fn catalog(&self) -> Result<ApiCatalog, Error> {
        let catalog = match &self.catalog_path {
            Some(path) => ApiCatalog::load(Path::new(path))?,
            None => ApiCatalog::embedded()?,
        };
        Ok(catalog)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            client: ClientConfig::default(),
            authentication: AuthenticationConfig::new(),
        }
    }
}

/// Configuration for CLI authentication settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationConfig {
    /// Name of the environment variable holding the access token.
    #[serde(default = "AuthenticationConfig::default_token_env_var")]
    pub token_env_var: String,
}

impl AuthenticationConfig {
    fn default_token_env_var() -> String {
        DEFAULT_TOKEN_ENV_VAR.to_string()
    }

    pub fn new() -> Self {
        AuthenticationConfig {
            token_env_var: Self::default_token_env_var(),
        }
    }
}

impl Default for AuthenticationConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves the path to the configuration file.
///
/// - If `config_path` is `Some(path)`, returns that path as a `PathBuf`
/// - If `config_path` is `None`, returns `./commerce.toml` in the current directory
pub fn get_config_path(config_path: Option<&str>) -> PathBuf {
    if let Some(path) = config_path {
        PathBuf::from(path)
    } else {
        let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        current_dir.join(DEFAULT_CONFIG_FILENAME)
    }
}
