use std::path::Path;

use clap::Subcommand;
use commerce_client::{DefaultHeaderBuilder, ReqwestTransport};
use tracing::{debug, error, info, instrument};

use crate::config::{get_config_path, AppConfig};
use crate::errors::Error;

#[cfg(test)]
#[path = "config_cmd_tests.rs"]
mod tests;

/// Subcommands for the config command
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Create initial configuration file
    Init {
        /// Path to save the configuration file
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Check the configuration file
    Validate {
        /// Path to the configuration file
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Show the effective configuration
    Show {
        /// Path to the configuration file
        #[arg(short, long)]
        path: Option<String>,
    },
}

/// Execute the config command
#[instrument]
pub async fn execute(cmd: &ConfigCommands) -> Result<(), Error> {
    let message = match cmd {
        ConfigCommands::Init { path } => init_config(&get_config_path(path.as_deref()))?,
        ConfigCommands::Validate { path } => validate_config(&get_config_path(path.as_deref()))?,
        ConfigCommands::Show { path } => show_config(&get_config_path(path.as_deref()))?,
    };
    println!("{}", message);
    Ok(())
}

/// Writes a default configuration file. Fails if the file already exists.
#[instrument]
pub fn init_config(config_path: &Path) -> Result<String, Error> {
    debug!(message = "Initializing configuration", path = ?config_path);

    if config_path.exists() {
        let err = Error::Config(format!(
            "Configuration file already exists at {:?}",
            config_path
        ));
        error!(
            message = "Configuration file already exists",
            path = ?config_path,
            error = ?err
        );
        return Err(err);
    }

    AppConfig::default().save(config_path)?;

    info!(message = "Configuration initialized", path = ?config_path);
    Ok(format!("Configuration initialized at {:?}", config_path))
}

/// Checks that the file parses and that a dispatcher could be built from it:
/// the base URL resolves, the header values are encodable and the endpoint
/// catalog loads.
#[instrument]
pub fn validate_config(config_path: &Path) -> Result<String, Error> {
    debug!(message = "Validating configuration", path = ?config_path);

    let config = AppConfig::load(config_path)?;

    let checks = config
        .client
        .base_url()
        .and_then(|url| {
            DefaultHeaderBuilder::from_config(&config.client)?;
            ReqwestTransport::from_config(&config.client)?;
            Ok(url)
        })
        .map_err(Error::from)
        .and_then(|url| config.catalog().map(|catalog| (url, catalog.len())));

    match checks {
        Ok((url, endpoints)) => {
            info!(message = "Configuration is valid", path = ?config_path);
            Ok(format!(
                "Configuration is valid (base URL {}, {} operations)",
                url, endpoints
            ))
        }
        Err(e) => {
            error!(
                message = "Configuration is invalid",
                path = ?config_path,
                error = ?e
            );
            Err(Error::Config(format!("The configuration is invalid: {}", e)))
        }
    }
}

/// Renders the configuration as TOML, with defaults filled in. A missing file
/// shows the defaults.
#[instrument]
pub fn show_config(config_path: &Path) -> Result<String, Error> {
    let config = AppConfig::load_or_default(config_path)?;
    toml::to_string_pretty(&config)
        .map_err(|e| Error::Output(format!("Failed to serialize configuration: {}", e)))
}
