//! Widgets command - manage tracked widget instances.

use anyhow::Result;
use clap::{Args, Subcommand};
use datapass_core::UpdateMode;
use datapass_store::SettingsStore;
use datapass_widget::{UpdateRequest, UpdateScheduler};
use tracing::info;

use super::{build_orchestrator, exit_code_for, load_instances};
use crate::host::DeviceArgs;
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for the widgets command.
#[derive(Args)]
pub struct WidgetsArgs {
    #[command(subcommand)]
    pub action: WidgetsAction,
}

/// Widgets subcommands.
#[derive(Subcommand)]
pub enum WidgetsAction {
    /// Track a widget.
    Add {
        /// Widget instance id.
        id: i32,

        /// Carrier text. Chosen from the device flags when absent.
        #[arg(long)]
        carrier: Option<String>,

        /// Run a regular update right away.
        #[arg(long)]
        update: bool,

        #[command(flatten)]
        device: DeviceArgs,
    },

    /// Stop tracking a widget.
    Remove {
        /// Widget instance id.
        id: i32,
    },

    /// List tracked widgets.
    List,

    /// Drop every widget not in the given live set.
    Prune {
        /// Ids of widgets that still exist.
        live: Vec<i32>,
    },
}

/// Runs the widgets command.
pub async fn run(args: &WidgetsArgs, cli: &Cli, settings: &SettingsStore) -> Result<ExitCode> {
    let settings = settings.get().await;

    match &args.action {
        WidgetsAction::Add {
            id,
            carrier,
            update,
            device,
        } => {
            let orchestrator = build_orchestrator(cli, &settings, device.device()).await?;
            let scheduler = UpdateScheduler::new(orchestrator.clone());

            let carrier = carrier
                .clone()
                .unwrap_or_else(|| scheduler.carrier_for_new_instance());
            orchestrator.instances().add(*id, &carrier).await;
            orchestrator.prefs().save().await?;
            info!(instance_id = id, carrier = %carrier, "Widget tracked");

            if !*update {
                println!("Tracking widget {id} ({carrier})");
                return Ok(ExitCode::Success);
            }

            let report = orchestrator
                .run(UpdateRequest::new(*id, carrier, UpdateMode::Regular))
                .await?;
            match cli.format {
                OutputFormat::Text => {
                    println!("{}", TextFormatter::new(!cli.no_color).format_report(&report));
                }
                OutputFormat::Json => {
                    println!("{}", JsonFormatter::new(cli.pretty).format(&report)?);
                }
            }
            Ok(exit_code_for(&report.outcome))
        }
        WidgetsAction::Remove { id } => {
            let instances = load_instances(&settings).await?;
            let Some(carrier) = instances.remove(*id).await else {
                anyhow::bail!("Unknown widget: {id}");
            };
            instances.preferences().save().await?;
            info!(instance_id = id, carrier = %carrier, "Widget removed");
            println!("Removed widget {id} ({carrier})");
            Ok(ExitCode::Success)
        }
        WidgetsAction::List => {
            let instances = load_instances(&settings).await?.all().await;
            match cli.format {
                OutputFormat::Text => {
                    println!("{}", TextFormatter::new(!cli.no_color).format_instances(&instances));
                }
                OutputFormat::Json => {
                    println!("{}", JsonFormatter::new(cli.pretty).format(&instances)?);
                }
            }
            Ok(ExitCode::Success)
        }
        WidgetsAction::Prune { live } => {
            let instances = load_instances(&settings).await?;
            let dropped = instances.prune(live).await;
            instances.preferences().save().await?;
            match cli.format {
                OutputFormat::Text => {
                    for instance in &dropped {
                        println!("Dropped widget {} ({})", instance.id, instance.carrier);
                    }
                    println!("{} widget(s) pruned", dropped.len());
                }
                OutputFormat::Json => {
                    println!("{}", JsonFormatter::new(cli.pretty).format(&dropped)?);
                }
            }
            Ok(ExitCode::Success)
        }
    }
}
