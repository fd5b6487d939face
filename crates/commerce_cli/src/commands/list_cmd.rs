//! Operation listing for the commerce CLI.
//!
//! ```bash
//! # All public and beta operations, grouped by service
//! commerce list
//!
//! # Loyalty operations, including deprecated ones, as JSON
//! commerce list --service loyalty --include-deprecated --format json
//! ```

use clap::Args;
use colored::Colorize;
use commerce_client::{ApiCatalog, CatalogEntry, ReleaseStatus};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::config::{get_config_path, AppConfig};
use crate::errors::Error;

#[cfg(test)]
#[path = "list_cmd_tests.rs"]
mod tests;

/// Arguments for the `list` command.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only list operations of this service (case-insensitive).
    #[arg(long)]
    pub service: Option<String>,

    /// Only list operations whose id, path or description contains this text.
    #[arg(long)]
    pub search: Option<String>,

    /// Include deprecated operations.
    #[arg(long)]
    pub include_deprecated: bool,

    /// Output format (json or pretty).
    #[arg(long, default_value = "pretty")]
    pub format: String,

    /// Path to the configuration file.
    #[arg(short, long)]
    pub config: Option<String>,
}

/// One line of the operation listing.
#[derive(Debug, Clone, Serialize)]
pub struct OperationSummary {
    pub operation: String,
    pub service: String,
    pub method: String,
    pub path: String,
    pub release_status: ReleaseStatus,
}

impl From<&CatalogEntry> for OperationSummary {
    fn from(entry: &CatalogEntry) -> Self {
        Self {
            operation: entry.descriptor.operation.clone(),
            service: entry.descriptor.service.clone(),
            method: entry.descriptor.method.to_string(),
            path: entry.descriptor.path.clone(),
            release_status: entry.release_status,
        }
    }
}

#[instrument]
pub async fn execute(args: &ListArgs) -> Result<(), Error> {
    let config = AppConfig::load_or_default(&get_config_path(args.config.as_deref()))?;
    let catalog = config.catalog()?;

    let entries = select_operations(
        &catalog,
        args.service.as_deref(),
        args.search.as_deref(),
        args.include_deprecated,
    );
    debug!(message = "Selected operations", count = entries.len());

    let output = format_operations(&entries, &args.format)?;
    println!("{}", output);
    Ok(())
}

/// Filters the catalog. Catalog order is preserved.
pub fn select_operations<'a>(
    catalog: &'a ApiCatalog,
    service: Option<&str>,
    search: Option<&str>,
    include_deprecated: bool,
) -> Vec<&'a CatalogEntry> {
    let candidates: Vec<&CatalogEntry> = match search {
        Some(term) => catalog.search(term),
        None => catalog.iter().collect(),
    };

    candidates
        .into_iter()
        .filter(|entry| {
            service.map_or(true, |s| entry.descriptor.service.eq_ignore_ascii_case(s))
        })
        .filter(|entry| include_deprecated || entry.release_status != ReleaseStatus::Deprecated)
        .collect()
}

pub fn format_operations(entries: &[&CatalogEntry], format: &str) -> Result<String, Error> {
    match format {
        "json" => {
            let summaries: Vec<OperationSummary> =
                entries.iter().map(|entry| OperationSummary::from(*entry)).collect();
            serde_json::to_string_pretty(&summaries)
                .map_err(|e| Error::Output(format!("Failed to serialize to JSON: {}", e)))
        }
        "pretty" => Ok(format_operations_pretty(entries)),
        _ => Err(Error::InvalidArguments(format!(
            "Invalid format: '{}'. Use 'json' or 'pretty'.",
            format
        ))),
    }
}

fn format_operations_pretty(entries: &[&CatalogEntry]) -> String {
    if entries.is_empty() {
        return "No matching operations.".dimmed().to_string();
    }

    let mut services: Vec<&str> = entries
        .iter()
        .map(|entry| entry.descriptor.service.as_str())
        .collect();
    services.sort_unstable();
    services.dedup();

    let mut output = String::new();
    for service in services {
        output.push_str(&format!("\n{}\n", service.bold().bright_cyan()));
        for entry in entries
            .iter()
            .filter(|entry| entry.descriptor.service == service)
        {
            let status = match entry.release_status {
                ReleaseStatus::Public => String::new(),
                ReleaseStatus::Beta => format!(" {}", "[BETA]".yellow()),
                ReleaseStatus::Deprecated => format!(" {}", "[DEPRECATED]".red()),
            };
            output.push_str(&format!(
                "  {}{}  {}{}\n",
                format!("{:<7}", entry.descriptor.method.as_str()).green(),
                entry.descriptor.operation.bold(),
                entry.descriptor.path.dimmed(),
                status
            ));
        }
    }

    output.push_str(&format!("\n{} operation(s)\n", entries.len()));
    output
}
