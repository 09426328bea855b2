//! Watch command - periodic refresh of all tracked widgets.

use std::io::{Write, stdout};

use anyhow::Result;
use clap::Args;
use datapass_store::SettingsStore;
use datapass_widget::{Trigger, UpdateScheduler};
use tokio::time::{Duration, interval};
use tracing::{info, warn};

use super::build_orchestrator;
use crate::host::DeviceArgs;
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for watch command.
#[derive(Args)]
pub struct WatchArgs {
    /// Refresh interval in seconds. Defaults to the configured interval.
    #[arg(long, short)]
    pub interval: Option<u64>,

    /// Minimum interval to use.
    #[arg(long, default_value = "10")]
    pub min_interval: u64,

    #[command(flatten)]
    pub device: DeviceArgs,
}

/// Runs the watch command.
pub async fn run(args: &WatchArgs, cli: &Cli, settings: &SettingsStore) -> Result<ExitCode> {
    let settings = settings.get().await;
    let refresh_interval = args
        .interval
        .unwrap_or(settings.refresh_interval_secs)
        .max(args.min_interval);

    info!(interval = refresh_interval, "Starting watch mode");

    let scheduler =
        UpdateScheduler::new(build_orchestrator(cli, &settings, args.device.device()).await?);
    let formatter = TextFormatter::new(!cli.no_color);
    let json = JsonFormatter::new(cli.pretty);

    let mut ticker = interval(Duration::from_secs(refresh_interval));

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Watch mode stopped");
                return Ok(ExitCode::Success);
            }
        }

        let results = scheduler.handle(Trigger::Periodic).await;

        if cli.format == OutputFormat::Json {
            for result in &results {
                match result {
                    Ok(report) => println!("{}", json.format(report)?),
                    Err(e) => warn!(error = %e, "Update failed"),
                }
            }
            continue;
        }

        // Clear screen
        print!("\x1b[2J\x1b[H");
        stdout().flush()?;

        let now = chrono::Local::now();
        println!(
            "DataPass Watch Mode - {} (refresh: {}s)",
            now.format("%H:%M:%S"),
            refresh_interval
        );
        println!("{}", "─".repeat(50));
        println!();

        if results.is_empty() {
            println!("No widget due for an update");
        }
        for result in &results {
            match result {
                Ok(report) => println!("{}", formatter.format_report(report)),
                Err(e) => println!("{}", formatter.format_error("update", &e.to_string())),
            }
        }

        println!();
        println!("Press Ctrl+C to exit");
    }
}
