//! Command modules for the commerce CLI.
//!
//! Each submodule handles a specific command category:
//!
//! - `auth_cmd`: Storing and clearing the access token in the system keyring
//! - `call_cmd`: Executing an API operation by its id
//! - `config_cmd`: Creating, validating and showing the configuration file
//! - `describe_cmd`: Showing the request shape of a single operation
//! - `list_cmd`: Listing the operations of the endpoint catalog

pub mod auth_cmd;
pub mod call_cmd;
pub mod config_cmd;
pub mod describe_cmd;
pub mod list_cmd;
