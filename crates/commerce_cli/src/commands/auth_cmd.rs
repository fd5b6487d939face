//! Authentication command module for access token management.
//!
//! The access token is stored in the system keyring rather than in the
//! configuration file. When an operation is called the token is resolved in
//! this order:
//!
//! 1. the `--token` flag
//! 2. the environment variable named in the configuration (`COMMERCE_ACCESS_TOKEN`
//!    by default)
//! 3. the keyring entry written by `commerce auth set-token`

use std::io::{self, BufRead, Write};

use clap::Subcommand;
use commerce_client::Credential;
use keyring::Entry;
use tracing::{debug, error, info, instrument};

use crate::errors::Error;

pub const KEY_RING_SERVICE_NAME: &str = "commerce_cli";
pub const KEY_RING_ACCESS_TOKEN: &str = "access_token";

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;

/// Authentication subcommands for managing the access token.
#[derive(Subcommand, Debug)]
pub enum AuthCommands {
    /// Store an access token in the system keyring.
    ///
    /// The token is read from standard input when not given on the command line.
    SetToken {
        /// The access token to store.
        token: Option<String>,
    },

    /// Remove the stored access token from the system keyring.
    Clear,
}

/// Persistent storage for the access token.
pub trait TokenStore: Send + Sync {
    fn get_token(&self) -> Result<Option<String>, Error>;
    fn set_token(&self, token: &str) -> Result<(), Error>;

    /// Removes the stored token. Returns `false` if there was none.
    fn clear_token(&self) -> Result<bool, Error>;
}

/// A [`TokenStore`] backed by the system keyring.
#[derive(Debug, Clone)]
pub struct KeyringTokenStore {
    service: String,
    key: String,
}

impl KeyringTokenStore {
    pub fn new() -> Self {
        Self {
            service: KEY_RING_SERVICE_NAME.to_string(),
            key: KEY_RING_ACCESS_TOKEN.to_string(),
        }
    }

    fn entry(&self) -> Result<Entry, Error> {
        Entry::new(&self.service, &self.key)
            .map_err(|e| Error::Auth(format!("Failed to create an entry in the keyring: {}", e)))
    }
}

impl Default for KeyringTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore for KeyringTokenStore {
    fn get_token(&self) -> Result<Option<String>, Error> {
        match self.entry()?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(Error::Auth(format!(
                "Failed to read the access token from the keyring: {}",
                e
            ))),
        }
    }

    fn set_token(&self, token: &str) -> Result<(), Error> {
        self.entry()?
            .set_password(token)
            .map_err(|e| Error::Auth(format!("Failed to save token to keyring: {}", e)))
    }

    fn clear_token(&self) -> Result<bool, Error> {
        match self.entry()?.delete_credential() {
            Ok(()) => Ok(true),
            Err(keyring::Error::NoEntry) => Ok(false),
            Err(e) => Err(Error::Auth(format!(
                "Failed to remove the access token from the keyring: {}",
                e
            ))),
        }
    }
}

/// Executes the specified authentication command.
///
/// # Errors
///
/// This function will return an error if:
/// - The token cannot be read from standard input or is empty
/// - Keyring operations fail
#[instrument(skip(cmd))]
pub async fn execute(cmd: &AuthCommands) -> Result<(), Error> {
    let store = KeyringTokenStore::new();
    match cmd {
        AuthCommands::SetToken { token } => {
            let token = match token {
                Some(t) => t.clone(),
                None => {
                    println!("Please provide your access token:");
                    io::stdout()
                        .flush()
                        .map_err(|e| Error::Output(e.to_string()))?;
                    read_token(&mut io::stdin().lock())?
                }
            };
            store_token(&store, &token)?;
            println!("Access token saved to the system keyring.");
        }
        AuthCommands::Clear => {
            if clear_token(&store)? {
                println!("Access token removed from the system keyring.");
            } else {
                println!("No access token was stored.");
            }
        }
    }

    Ok(())
}

/// Reads one line from `reader` and returns it trimmed.
pub fn read_token(reader: &mut impl BufRead) -> Result<String, Error> {
    let mut token = String::new();
    reader
        .read_line(&mut token)
        .map_err(|e| Error::Auth(format!("Failed to read input: {}", e)))?;
    debug!(message = "Read token from stdin");
    Ok(token.trim().to_string())
}

/// Validates and stores an access token.
pub fn store_token(store: &dyn TokenStore, token: &str) -> Result<(), Error> {
    let token = token.trim();
    if token.is_empty() {
        let err = Error::Auth("Token cannot be empty".to_string());
        error!(message = "Token cannot be empty", error = ?err);
        return Err(err);
    }

    store.set_token(token)?;
    info!(message = "Saved access token");
    Ok(())
}

pub fn clear_token(store: &dyn TokenStore) -> Result<bool, Error> {
    let removed = store.clear_token()?;
    info!(message = "Cleared access token", removed = removed);
    Ok(removed)
}

/// Finds the access token for an API call.
///
/// Empty values are skipped, so an exported but empty environment variable
/// falls through to the keyring.
///
/// # Errors
///
/// Returns `Error::Auth` if no source provides a token or the keyring fails.
pub fn resolve_credential(
    token_flag: Option<&str>,
    token_env_var: &str,
    store: &dyn TokenStore,
) -> Result<Credential, Error> {
    if let Some(token) = token_flag.map(str::trim).filter(|t| !t.is_empty()) {
        debug!(message = "Using access token from the command line");
        return Ok(Credential::new(token));
    }

    if let Some(token) = std::env::var(token_env_var)
        .ok()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
    {
        debug!(message = "Using access token from the environment", variable = token_env_var);
        return Ok(Credential::new(token));
    }

    if let Some(token) = store.get_token()?.filter(|t| !t.is_empty()) {
        debug!(message = "Using access token from the keyring");
        return Ok(Credential::new(token));
    }

    Err(Error::Auth(format!(
        "No access token found. Pass --token, set {}, or run 'commerce auth set-token'.",
        token_env_var
    )))
}
