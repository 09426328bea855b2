//! Carriers command - list supported carriers.

use anyhow::Result;
use datapass_carriers::CarrierRegistry;
use tracing::info;

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, ExitCode, OutputFormat};

/// Runs the carriers command.
pub fn run(cli: &Cli) -> Result<ExitCode> {
    info!("Listing carriers");

    let carriers = CarrierRegistry::all();

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);

            println!("{}", formatter.format_carriers_header());
            println!("{}", "─".repeat(50));

            for desc in carriers {
                println!("{}", formatter.format_carrier_line(desc));
            }

            println!();
            println!("Total: {} carriers", carriers.len());
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_carriers(carriers)?);
        }
    }

    Ok(ExitCode::Success)
}
