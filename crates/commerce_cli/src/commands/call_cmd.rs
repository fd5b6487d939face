//! Executes an API operation by its id.
//!
//! Arguments are given as `--arg KEY=VALUE` pairs, as a JSON object with
//! `--json`, or both; `--arg` values win over keys of the `--json` object.
//! The dispatcher decides from the operation's descriptor which arguments
//! become path segments, query parameters or body fields.
//!
//! ```bash
//! commerce call retrieve_loyalty_account --arg account_id=abc123
//!
//! commerce call accumulate_loyalty_points --arg account_id=abc123 \
//!     --idempotency-key auto --json '{"accumulate_points": {"order_id": "ORDER_1"}}'
//!
//! commerce call create_catalog_image --file image_file=./logo.png \
//!     --idempotency-key auto --dry-run
//! ```

use std::fs;
use std::path::Path;
use std::sync::Arc;

use clap::Args;
use commerce_client::{
    ApiCatalog, ArgumentBag, Credential, Dispatcher, EndpointDescriptor, FileUpload,
    MultipartPart, NormalizedResponse, OutboundRequest, RequestBody, ResponseBody,
};
use serde_json::{json, Map, Value};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::commands::auth_cmd::{resolve_credential, KeyringTokenStore};
use crate::commands::describe_cmd::find_operation;
use crate::config::{get_config_path, AppConfig};
use crate::errors::Error;

#[cfg(test)]
#[path = "call_cmd_tests.rs"]
mod tests;

/// Token used to build the request of a dry run when no access token is configured.
const DRY_RUN_TOKEN: &str = "dry-run-token";

/// Arguments for the `call` command.
#[derive(Args, Debug)]
pub struct CallArgs {
    /// Operation id, e.g. `retrieve_loyalty_account`.
    pub operation: String,

    /// An argument as KEY=VALUE. The value is parsed as JSON when possible and
    /// taken as a string otherwise.
    #[arg(short = 'a', long = "arg", value_parser = parse_key_val)]
    pub args: Vec<(String, String)>,

    /// Arguments as a JSON object.
    #[arg(long)]
    pub json: Option<String>,

    /// A file to upload as PART=PATH, for multipart operations.
    #[arg(long = "file", value_parser = parse_key_val)]
    pub files: Vec<(String, String)>,

    /// Access token. Overrides the environment variable and the keyring.
    #[arg(long)]
    pub token: Option<String>,

    /// Adds an `idempotency_key` argument. `auto` generates a random key.
    #[arg(long)]
    pub idempotency_key: Option<String>,

    /// Print the request instead of sending it.
    #[arg(long)]
    pub dry_run: bool,

    /// Path to the configuration file.
    #[arg(short, long)]
    pub config: Option<String>,
}

pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no `=` found in `{}`", s))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

/// Parses an `--arg` value: JSON if it parses, a plain string otherwise.
///
/// `10` becomes a number and `true` a boolean; to pass such values as strings,
/// quote them as JSON (`'"10"'`).
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[instrument(skip(args), fields(operation = %args.operation, dry_run = args.dry_run))]
pub async fn execute(args: &CallArgs) -> Result<(), Error> {
    let config = AppConfig::load_or_default(&get_config_path(args.config.as_deref()))?;
    let catalog = Arc::new(config.catalog()?);

    let store = KeyringTokenStore::new();
    let credential = match resolve_credential(
        args.token.as_deref(),
        &config.authentication.token_env_var,
        &store,
    ) {
        Ok(credential) => credential,
        Err(e) if args.dry_run => {
            debug!(message = "No access token for dry run", error = %e);
            Credential::new(DRY_RUN_TOKEN)
        }
        Err(e) => return Err(e),
    };

    let dispatcher = Dispatcher::new(&config.client)?.with_catalog(catalog.clone());
    let output = run_call(args, &catalog, &dispatcher, &credential).await?;
    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}

/// Builds the arguments, then either renders the request (dry run) or
/// executes it and renders the response.
pub async fn run_call(
    args: &CallArgs,
    catalog: &ApiCatalog,
    dispatcher: &Dispatcher,
    credential: &Credential,
) -> Result<String, Error> {
    let entry = find_operation(catalog, &args.operation)?;
    let arguments = build_arguments(args, &entry.descriptor)?;

    if args.dry_run {
        let request = dispatcher.prepare(&entry.descriptor, credential, arguments)?;
        return render_request(&request);
    }

    let response = dispatcher
        .dispatch(&entry.descriptor, credential, arguments)
        .await?;
    info!(
        message = "Operation succeeded",
        operation = %args.operation,
        status = response.status
    );
    render_response(&response)
}

/// Collects the `--json`, `--arg`, `--file` and `--idempotency-key` inputs into
/// one argument bag.
pub fn build_arguments(
    args: &CallArgs,
    descriptor: &EndpointDescriptor,
) -> Result<ArgumentBag, Error> {
    let mut bag = match &args.json {
        Some(raw) => {
            let value: Value = serde_json::from_str(raw)
                .map_err(|e| Error::InvalidArguments(format!("--json is not valid JSON: {}", e)))?;
            if !value.is_object() {
                return Err(Error::InvalidArguments(
                    "--json must be a JSON object".to_string(),
                ));
            }
            ArgumentBag::from_json(value)?
        }
        None => ArgumentBag::new(),
    };

    for (name, raw) in &args.args {
        bag.insert(name.clone(), parse_value(raw));
    }

    for (part, path) in &args.files {
        bag.insert_file(part.clone(), load_upload(Path::new(path))?);
    }

    if let Some(key) = &args.idempotency_key {
        if !descriptor.accepts_body() {
            return Err(Error::InvalidArguments(format!(
                "--idempotency-key is not supported for {} requests",
                descriptor.method
            )));
        }
        let key = if key == "auto" {
            Uuid::new_v4().to_string()
        } else {
            key.clone()
        };
        debug!(message = "Using idempotency key", key = %key);
        bag.insert("idempotency_key", key);
    }

    Ok(bag)
}

fn load_upload(path: &Path) -> Result<FileUpload, Error> {
    let bytes = fs::read(path).map_err(|e| Error::LoadFile {
        path: path.display().to_string(),
        source: e,
    })?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());

    let upload = FileUpload::new(file_name, bytes);
    Ok(match content_type_for(path) {
        Some(content_type) => upload.with_content_type(content_type),
        None => upload,
    })
}

/// Content type of an upload, from its file extension.
pub fn content_type_for(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "pdf" => Some("application/pdf"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        "tif" | "tiff" => Some("image/tiff"),
        _ => None,
    }
}

pub fn render_response(response: &NormalizedResponse) -> Result<String, Error> {
    match &response.body {
        ResponseBody::Json(value) => serde_json::to_string_pretty(value)
            .map_err(|e| Error::Output(format!("Failed to serialize to JSON: {}", e))),
        ResponseBody::Text(text) => Ok(text.clone()),
        ResponseBody::Empty => Ok(String::new()),
    }
}

/// Renders a prepared request as JSON. Sensitive header values are redacted
/// and file contents are summarized by size.
pub fn render_request(request: &OutboundRequest) -> Result<String, Error> {
    let mut headers = Map::new();
    for (name, value) in &request.headers {
        let shown = if value.is_sensitive() {
            "<redacted>".to_string()
        } else {
            value.to_str().unwrap_or("<binary>").to_string()
        };
        headers.insert(name.as_str().to_string(), Value::String(shown));
    }

    let body = match &request.body {
        None => Value::Null,
        Some(RequestBody::Json(value)) => value.clone(),
        Some(RequestBody::Multipart(parts)) => Value::Array(
            parts
                .iter()
                .map(|part| match part {
                    MultipartPart::Json { name, value } => json!({
                        "name": name,
                        "content_type": "application/json",
                        "value": value,
                    }),
                    MultipartPart::File { name, upload } => json!({
                        "name": name,
                        "file_name": upload.file_name,
                        "content_type": upload.content_type,
                        "size": upload.bytes.len(),
                    }),
                })
                .collect(),
        ),
    };

    let rendered = json!({
        "method": request.method.as_str(),
        "url": request.url.as_str(),
        "headers": headers,
        "body": body,
    });

    serde_json::to_string_pretty(&rendered)
        .map_err(|e| Error::Output(format!("Failed to serialize to JSON: {}", e)))
}
