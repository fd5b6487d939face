//! Client configuration.
//!
//! [`ClientConfig`] holds everything that is shared by all requests made
//! through one dispatcher: where the API lives, which API version to ask for,
//! and how the dispatcher should treat leftover arguments. It is an explicit
//! value handed to the dispatcher at construction time, so several
//! independently configured dispatchers can live in one process.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::Error;

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Base URL of the production environment.
pub const PRODUCTION_BASE_URL: &str = "https://connect.squareup.com";

/// Base URL of the sandbox environment.
pub const SANDBOX_BASE_URL: &str = "https://connect.squareupsandbox.com";

/// API version sent with every request unless configured otherwise.
pub const DEFAULT_API_VERSION: &str = "2024-07-17";

/// Name of the header carrying the API version.
pub const DEFAULT_VERSION_HEADER: &str = "Square-Version";

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 60;

/// The remote environment requests are sent to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    #[default]
    Production,
    Sandbox,
    /// Requests go to the configured `base_url`.
    Custom,
}

/// What to do with arguments left over after path and query extraction for a
/// request method that does not carry a body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResidualArgumentPolicy {
    /// Drop the leftover arguments and log a warning.
    #[default]
    Ignore,
    /// Fail the dispatch with `Error::UnexpectedArguments`.
    Reject,
}

/// Settings shared by every request of one dispatcher.
///
/// # Example TOML Configuration
///
/// ```toml
/// environment = "sandbox"
/// api_version = "2024-07-17"
/// timeout_seconds = 30
/// residual_arguments = "reject"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub environment: Environment,

    /// Overrides the environment's base URL. Required for `Environment::Custom`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(default = "ClientConfig::default_api_version")]
    pub api_version: String,

    #[serde(default = "ClientConfig::default_version_header")]
    pub version_header: String,

    #[serde(default = "ClientConfig::default_user_agent")]
    pub user_agent: String,

    #[serde(default = "ClientConfig::default_timeout_seconds")]
    pub timeout_seconds: u64,

    #[serde(default)]
    pub residual_arguments: ResidualArgumentPolicy,
}

impl ClientConfig {
    fn default_api_version() -> String {
        DEFAULT_API_VERSION.to_string()
    }

    fn default_version_header() -> String {
        DEFAULT_VERSION_HEADER.to_string()
    }

    fn default_user_agent() -> String {
        format!("commerce-client/{}", env!("CARGO_PKG_VERSION"))
    }

    fn default_timeout_seconds() -> u64 {
        DEFAULT_TIMEOUT_SECONDS
    }

    /// Creates a configuration for the given environment with default settings.
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            ..Self::default()
        }
    }

    /// Creates a configuration that sends requests to an arbitrary base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            environment: Environment::Custom,
            base_url: Some(base_url.into()),
            ..Self::default()
        }
    }

    /// Resolves the base URL requests are sent to.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfiguration` if:
    /// - The environment is `Custom` and no base URL is set
    /// - The base URL does not parse
    /// - The base URL is not an `http` or `https` URL
    pub fn base_url(&self) -> Result<Url, Error> {
        let raw = match (&self.base_url, self.environment) {
            (Some(url), _) => url.as_str(),
            (None, Environment::Production) => PRODUCTION_BASE_URL,
            (None, Environment::Sandbox) => SANDBOX_BASE_URL,
            (None, Environment::Custom) => {
                return Err(Error::InvalidConfiguration(
                    "A base URL is required for the custom environment".to_string(),
                ))
            }
        };

        let url = Url::parse(raw).map_err(|e| {
            Error::InvalidConfiguration(format!("Invalid base URL '{}': {}", raw, e))
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(Error::InvalidConfiguration(format!(
                "Base URL '{}' must use http or https",
                raw
            )));
        }

        Ok(url)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            base_url: None,
            api_version: Self::default_api_version(),
            version_header: Self::default_version_header(),
            user_agent: Self::default_user_agent(),
            timeout_seconds: Self::default_timeout_seconds(),
            residual_arguments: ResidualArgumentPolicy::default(),
        }
    }
}
