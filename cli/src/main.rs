//! # Applicator Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! This file serves as the main entry point for the Applicator CLI.
//! It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Routing execution to the command handlers
//!
//! ## Architecture
//!
//! - `commands`: command handlers (`create`)
//! - `common`: filesystem and process helpers
//! - `core`: configuration, errors and template location
//! - `rewrite`: the pure per-file rewrite engine
//!
//! ## Examples
//!
//! ```bash
//! # Get help
//! applicator --help
//!
//! # Clone the template with info-level logging
//! applicator -v create shop ./shop
//! ```
//!
//! Command processing flow:
//! 1. Parse command-line args via Clap
//! 2. Configure logging based on verbosity level
//! 3. Route to the command handler
//! 4. Format and display any errors that occur
//!
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // Command handlers
mod common; // Shared utilities (fs, process)
mod core; // Core infrastructure (errors, config, template source)
mod rewrite; // Template file rewrite engine

/// Defines the top-level command-line arguments structure using Clap's derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "applicator",
    about = "Clone a Go project template under a new module name",
    long_about = "Creates a new Go project from a template module, rewriting the module path,\n\
                  import paths, root package name and template name in every file.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

/// Enum defining all available top-level commands.
#[derive(Parser, Debug)]
enum Commands {
    /// Create a new project from the template.
    #[command(alias = "c")]
    Create(commands::create::CreateArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let command_result = match cli.command {
        Commands::Create(args) => commands::create::handle_create(args).await,
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_cmd::Command;
    use predicates::prelude::*;
    fn applicator_cmd() -> Command {
        Command::cargo_bin("applicator").expect("Failed to find applicator binary for testing")
    }
    #[test]
    fn test_main_help_flag() {
        applicator_cmd().arg("--help").assert().success();
    }
    #[test]
    fn test_main_version_flag() {
        applicator_cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }
}
