// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! `DataPass` CLI - mobile data quota from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Parse a saved datapass page
//! datapass parse page.html
//!
//! # Fetch usage for the Telekom network (needs mobile data)
//! datapass fetch --carrier telekom
//!
//! # Run one widget update like a tap would
//! datapass update --id 7 --carrier Telekom.de --mode regular
//!
//! # Track a widget and refresh all of them every 10 minutes
//! datapass widgets add 7 --operator Telekom.de
//! datapass watch --interval 600
//!
//! # JSON output
//! datapass fetch --format json --pretty
//! ```

mod commands;
mod host;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use datapass_store::{LogLevel, SettingsStore};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{carriers, config, fetch, parse, update, watch, widgets};

// ============================================================================
// CLI Definition
// ============================================================================

/// `DataPass` CLI - mobile data quota monitoring.
#[derive(Parser)]
#[command(name = "datapass")]
#[command(about = "Mobile data quota monitoring CLI")]
#[command(long_about = r#"
DataPass reads the remaining mobile data volume from the carrier's datapass
page. The page is only reachable over mobile data.

Supported carriers:
  • Telekom (telekom)
  • congstar (congstar)

Examples:
  datapass fetch                       # Telekom, text output
  datapass fetch --carrier congstar    # Reseller page
  datapass parse page.html             # Offline parse
  datapass widgets list                # Tracked widgets
"#)]
#[command(version)]
#[command(author = "DataPass Contributors")]
pub struct Cli {
    /// Subcommand to run. If none, runs 'fetch' by default.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Parse a saved datapass page.
    Parse(parse::ParseArgs),

    /// Fetch current usage (default if no command specified).
    #[command(visible_alias = "f")]
    Fetch(fetch::FetchArgs),

    /// Run one widget update.
    #[command(visible_alias = "u")]
    Update(update::UpdateArgs),

    /// Refresh all tracked widgets periodically.
    #[command(visible_alias = "w")]
    Watch(watch::WatchArgs),

    /// Manage tracked widgets.
    Widgets(widgets::WidgetsArgs),

    /// List supported carriers.
    #[command(visible_alias = "c")]
    Carriers,

    /// Manage configuration.
    Config(config::ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
    /// Carrier unsupported or not selected.
    CarrierMissing = 2,
    /// Parse error.
    ParseError = 3,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool, level: LogLevel) {
    if quiet {
        return; // No logging in quiet mode
    }

    let filter = if verbose {
        EnvFilter::new("datapass=debug,info")
    } else {
        EnvFilter::new(format!("datapass={level}"))
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = SettingsStore::load_default().await?;
    setup_logging(cli.verbose, cli.quiet, settings.get().await.log_level);

    let result = match &cli.command {
        Some(Commands::Parse(args)) => parse::run(args, &cli).await,
        Some(Commands::Fetch(args)) => fetch::run(args, &cli, &settings).await,
        Some(Commands::Update(args)) => update::run(args, &cli, &settings).await,
        Some(Commands::Watch(args)) => watch::run(args, &cli, &settings).await,
        Some(Commands::Widgets(args)) => widgets::run(args, &cli, &settings).await,
        Some(Commands::Carriers) => carriers::run(&cli),
        Some(Commands::Config(args)) => config::run(args, &cli, &settings).await,
        None => {
            // Default to fetch command
            fetch::run(&fetch::FetchArgs::default(), &cli, &settings).await
        }
    };

    match result {
        Ok(ExitCode::Success) => Ok(()),
        Ok(code) => std::process::exit(code as i32),
        Err(e) => {
            if !cli.quiet {
                eprintln!("Error: {e}");
            }
            std::process::exit(ExitCode::Error as i32);
        }
    }
}
