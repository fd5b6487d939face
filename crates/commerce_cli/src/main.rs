use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commerce_cli::commands::{
    auth_cmd::{self, AuthCommands},
    call_cmd::{self, CallArgs},
    config_cmd::{self, ConfigCommands},
    describe_cmd::{self, DescribeArgs},
    list_cmd::{self, ListArgs},
};
use commerce_cli::errors::Error;

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;

/// Commerce CLI: Call commerce platform API operations from the command line
#[derive(Parser)]
#[command(name = "commerce")]
#[command(about = "Call commerce platform API operations from the command line", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(subcommand)]
    Auth(AuthCommands),

    /// Call an API operation
    Call(CallArgs),

    #[command(subcommand)]
    Config(ConfigCommands),

    /// Show the parameters of an API operation
    Describe(DescribeArgs),

    /// List the available API operations
    List(ListArgs),

    /// Show the CLI version
    Version,
}

async fn run(command: &Commands) -> Result<(), Error> {
    match command {
        Commands::Auth(cmd) => auth_cmd::execute(cmd).await,
        Commands::Call(args) => call_cmd::execute(args).await,
        Commands::Config(cmd) => config_cmd::execute(cmd).await,
        Commands::Describe(args) => describe_cmd::execute(args).await,
        Commands::List(args) => list_cmd::execute(args).await,
        Commands::Version => {
            println!(
                "commerce version {} (API version {})",
                option_env!("COMMERCE_VERSION").unwrap_or(env!("CARGO_PKG_VERSION")),
                commerce_client::config::DEFAULT_API_VERSION
            );
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_env("COMMERCE_LOG"))
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli.command).await {
        error!("Error: {e}");
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
