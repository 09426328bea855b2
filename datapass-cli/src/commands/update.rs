//! Update command - run one widget update.

use anyhow::Result;
use clap::Args;
use datapass_core::UpdateMode;
use datapass_store::SettingsStore;
use datapass_widget::{UpdateRequest, UpdateScheduler};
use tracing::info;

use super::{build_orchestrator, exit_code_for};
use crate::host::DeviceArgs;
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for update command.
#[derive(Args)]
pub struct UpdateArgs {
    /// Widget instance id.
    #[arg(long)]
    pub id: i32,

    /// Carrier text. Defaults to the tracked carrier of the widget.
    #[arg(long)]
    pub carrier: Option<String>,

    /// Feedback level: regular, silent or ultra-silent.
    #[arg(long, default_value = "regular")]
    pub mode: UpdateMode,

    #[command(flatten)]
    pub device: DeviceArgs,
}

/// Runs the update command.
pub async fn run(args: &UpdateArgs, cli: &Cli, settings: &SettingsStore) -> Result<ExitCode> {
    let settings = settings.get().await;
    let orchestrator = build_orchestrator(cli, &settings, args.device.device()).await?;

    let carrier = match &args.carrier {
        Some(carrier) => carrier.clone(),
        None => match orchestrator.instances().carrier_for(args.id).await {
            Some(carrier) => carrier,
            None => UpdateScheduler::new(orchestrator.clone()).carrier_for_new_instance(),
        },
    };
    info!(instance_id = args.id, carrier = %carrier, mode = %args.mode, "Running update");

    let report = orchestrator
        .run(UpdateRequest::new(args.id, carrier, args.mode))
        .await?;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_report(&report));
        }
        OutputFormat::Json => {
            println!("{}", JsonFormatter::new(cli.pretty).format(&report)?);
        }
    }

    Ok(exit_code_for(&report.outcome))
}
