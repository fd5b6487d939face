//! Shows the request shape of a single operation.
//!
//! ```bash
//! commerce describe retrieve_loyalty_account
//! commerce describe create_catalog_image --format json
//! ```

use clap::Args;
use colored::Colorize;
use commerce_client::{ApiCatalog, BodyKind, CatalogEntry, ReleaseStatus};
use tracing::instrument;

use crate::config::{get_config_path, AppConfig};
use crate::errors::Error;

#[cfg(test)]
#[path = "describe_cmd_tests.rs"]
mod tests;

/// Arguments for the `describe` command.
#[derive(Args, Debug)]
pub struct DescribeArgs {
    /// Operation id, e.g. `retrieve_loyalty_account`.
    pub operation: String,

    /// Output format (json or pretty).
    #[arg(long, default_value = "pretty")]
    pub format: String,

    /// Path to the configuration file.
    #[arg(short, long)]
    pub config: Option<String>,
}

#[instrument]
pub async fn execute(args: &DescribeArgs) -> Result<(), Error> {
    let config = AppConfig::load_or_default(&get_config_path(args.config.as_deref()))?;
    let catalog = config.catalog()?;

    let entry = find_operation(&catalog, &args.operation)?;
    let output = format_operation(entry, &args.format)?;
    println!("{}", output);
    Ok(())
}

/// Looks up an operation. An unknown id is reported together with the
/// operations whose names contain it.
pub fn find_operation<'a>(catalog: &'a ApiCatalog, operation: &str) -> Result<&'a CatalogEntry, Error> {
    if let Some(entry) = catalog.entry(operation) {
        return Ok(entry);
    }

    let suggestions: Vec<&str> = catalog
        .search(operation)
        .into_iter()
        .filter(|entry| entry.descriptor.operation.contains(operation))
        .map(|entry| entry.descriptor.operation.as_str())
        .take(5)
        .collect();

    if suggestions.is_empty() {
        Err(commerce_client::Error::UnknownOperation(operation.to_string()).into())
    } else {
        Err(Error::InvalidArguments(format!(
            "Unknown operation '{}'. Did you mean: {}?",
            operation,
            suggestions.join(", ")
        )))
    }
}

pub fn format_operation(entry: &CatalogEntry, format: &str) -> Result<String, Error> {
    match format {
        "json" => serde_json::to_string_pretty(entry)
            .map_err(|e| Error::Output(format!("Failed to serialize to JSON: {}", e))),
        "pretty" => Ok(format_operation_pretty(entry)),
        _ => Err(Error::InvalidArguments(format!(
            "Invalid format: '{}'. Use 'json' or 'pretty'.",
            format
        ))),
    }
}

fn format_operation_pretty(entry: &CatalogEntry) -> String {
    let descriptor = &entry.descriptor;
    let mut output = String::new();

    let status = match entry.release_status {
        ReleaseStatus::Public => String::new(),
        ReleaseStatus::Beta => format!(" {}", "[BETA]".yellow()),
        ReleaseStatus::Deprecated => format!(" {}", "[DEPRECATED]".red()),
    };
    output.push_str(&format!(
        "\n{}{}\n\n",
        descriptor.operation.bold().bright_cyan(),
        status
    ));

    output.push_str(&format!("{}: {}\n", "Service".bold(), descriptor.service));
    output.push_str(&format!(
        "{}: {} {}\n",
        "Request".bold(),
        descriptor.method.as_str().green(),
        descriptor.path
    ));
    if !entry.description.is_empty() {
        output.push_str(&format!("{}: {}\n", "Description".bold(), entry.description));
    }

    output.push_str(&format!("\n{}\n", "Path parameters:".bold()));
    if descriptor.path_parameters.is_empty() {
        output.push_str(&format!("  {}\n", "(none)".dimmed()));
    }
    for parameter in &descriptor.path_parameters {
        let marker = if parameter.required {
            "[required]".red().to_string()
        } else {
            "[optional]".dimmed().to_string()
        };
        output.push_str(&format!("  {} {}\n", parameter.name, marker));
    }

    output.push_str(&format!("\n{}\n", "Query parameters:".bold()));
    if descriptor.query_parameters.is_empty() {
        output.push_str(&format!("  {}\n", "(none)".dimmed()));
    }
    for parameter in &descriptor.query_parameters {
        output.push_str(&format!("  {} {}\n", parameter.name, "[optional]".dimmed()));
    }

    output.push_str(&format!("\n{} ", "Body:".bold()));
    match (&descriptor.body, descriptor.accepts_body()) {
        (_, false) => output.push_str(&format!("{}\n", "(none)".dimmed())),
        (BodyKind::Json, true) => output.push_str("JSON object of the remaining arguments\n"),
        (BodyKind::Multipart { json_part, file_parts }, true) => {
            output.push_str(&format!(
                "multipart form, remaining arguments in part '{}'\n",
                json_part
            ));
            for part in file_parts {
                let marker = if part.required {
                    "[required]".red().to_string()
                } else {
                    "[optional]".dimmed().to_string()
                };
                output.push_str(&format!("  file part {} {}\n", part.name, marker));
            }
        }
    }

    if let Some(request_type) = &descriptor.request_type {
        output.push_str(&format!("{}: {}\n", "Request type".bold(), request_type));
    }
    if let Some(response_type) = &descriptor.response_type {
        output.push_str(&format!("{}: {}\n", "Response type".bold(), response_type));
    }

    output.push_str(&format!("\n{}\n  {}\n", "Example:".bold(), example_call(entry)));
    output
}

/// A `commerce call` invocation with placeholders for the required inputs.
pub fn example_call(entry: &CatalogEntry) -> String {
    let descriptor = &entry.descriptor;
    let mut command = format!("commerce call {}", descriptor.operation);

    for parameter in descriptor
        .path_parameters
        .iter()
        .filter(|parameter| parameter.required)
    {
        command.push_str(&format!(" --arg {0}=<{0}>", parameter.name));
    }

    if let BodyKind::Multipart { file_parts, .. } = &descriptor.body {
        for part in file_parts.iter().filter(|part| part.required) {
            command.push_str(&format!(" --file {}=<path>", part.name));
        }
    }

    if descriptor.accepts_body() {
        command.push_str(" --idempotency-key auto --json '{...}'");
    }

    command
}
