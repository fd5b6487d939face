use std::io;

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur in the commerce CLI application.
///
/// This enum represents all possible error conditions that can arise during
/// CLI operations, including credential lookup failures, configuration issues,
/// bad arguments and failed API calls.
#[derive(Error, Debug)]
pub enum Error {
    /// No usable access token could be found, or the keyring failed.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Configuration error occurred while loading, validating or saving the
    /// configuration file.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid command-line arguments were provided.
    ///
    /// This error is returned when the user provides invalid or incompatible
    /// command-line arguments that cannot be processed, such as a `--json`
    /// value that is not a JSON object.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Failed to load a file from the filesystem.
    #[error("Failed to load file '{path}'.")]
    LoadFile {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The API call failed.
    #[error(transparent)]
    Client(#[from] commerce_client::Error),

    /// The result could not be rendered.
    #[error("Failed to format output: {0}")]
    Output(String),
}
