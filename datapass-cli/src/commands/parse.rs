//! Parse command - read a saved datapass page.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use datapass_carriers::parse_datapass_page;
use datapass_core::FetchOutcome;
use tracing::{info, warn};

use super::print_outcome;
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Saved HTML page.
    pub file: PathBuf,

    /// The page was served to a reseller line (no Telekom imprint expected).
    #[arg(long)]
    pub reseller: bool,
}

/// Runs the parse command.
pub async fn run(args: &ParseArgs, cli: &Cli) -> Result<ExitCode> {
    let html = tokio::fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let label = args.file.display().to_string();
    info!(file = %label, len = html.len(), reseller = args.reseller, "Parsing page");

    match parse_datapass_page(&html, !args.reseller) {
        Ok(content) => {
            print_outcome(cli, &label, &FetchOutcome::from(content))?;
            Ok(ExitCode::Success)
        }
        Err(e) => {
            warn!(error = %e, "Page could not be parsed");
            match cli.format {
                OutputFormat::Text => {
                    let formatter = TextFormatter::new(!cli.no_color);
                    println!("{}", formatter.format_error(&label, &e.to_string()));
                }
                OutputFormat::Json => {
                    let output = serde_json::json!({
                        "carrier": label,
                        "outcome": "error",
                        "error": e.to_string(),
                    });
                    println!("{}", JsonFormatter::new(cli.pretty).format(&output)?);
                }
            }
            Ok(ExitCode::ParseError)
        }
    }
}
