//! CLI command implementations.

pub mod carriers;
pub mod config;
pub mod fetch;
pub mod parse;
pub mod update;
pub mod watch;
pub mod widgets;

use std::sync::Arc;

use anyhow::Result;
use datapass_core::FetchOutcome;
use datapass_fetch::FetchContext;
use datapass_store::{PreferenceStore, Settings, TrackedInstances};
use datapass_widget::{StaticDevice, UpdateOrchestrator};

use crate::host::{LogRenderer, StderrNotifier};
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, ExitCode, OutputFormat};

/// Exit code for a fetch outcome.
pub fn exit_code_for(outcome: &FetchOutcome) -> ExitCode {
    match outcome {
        FetchOutcome::Success(_) | FetchOutcome::Wasted => ExitCode::Success,
        FetchOutcome::Error => ExitCode::Error,
        FetchOutcome::CarrierUnavailable | FetchOutcome::CarrierNotSelected => {
            ExitCode::CarrierMissing
        }
    }
}

/// Prints one outcome in the selected format.
pub fn print_outcome(cli: &Cli, carrier: &str, outcome: &FetchOutcome) -> Result<()> {
    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_outcome(carrier, outcome));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_outcome(carrier, outcome)?);
        }
    }
    Ok(())
}

/// Loads the tracked widgets with the configured throttle.
pub async fn load_instances(settings: &Settings) -> Result<TrackedInstances> {
    let prefs = PreferenceStore::load_default().await?;
    Ok(TrackedInstances::new(prefs)
        .with_min_time_between_requests(settings.min_time_between_requests()))
}

/// Builds an orchestrator over the real network and the on-disk store.
pub async fn build_orchestrator(
    cli: &Cli,
    settings: &Settings,
    device: StaticDevice,
) -> Result<UpdateOrchestrator> {
    let instances = load_instances(settings).await?;
    let ctx = FetchContext::with_settings(settings.fetch_settings())?;

    Ok(UpdateOrchestrator::new(
        ctx,
        instances,
        Arc::new(LogRenderer),
        Arc::new(StderrNotifier::new(cli.quiet)),
        Arc::new(device),
    ))
}
