//! Fetch command - query the datapass page once.

use anyhow::Result;
use clap::Args;
use datapass_carriers::CarrierRegistry;
use datapass_core::CarrierFamily;
use datapass_fetch::FetchContext;
use datapass_store::SettingsStore;
use tracing::info;

use super::{exit_code_for, print_outcome};
use crate::{Cli, ExitCode};

/// Arguments for fetch command.
#[derive(Args, Default)]
pub struct FetchArgs {
    /// Carrier CLI name (telekom, congstar) or operator name as the phone
    /// reports it. Defaults to Telekom.
    #[arg(long, short)]
    pub carrier: Option<String>,
}

/// Maps a CLI name to its operator marker; anything else is used verbatim.
pub fn carrier_text(carrier: Option<&str>) -> String {
    match carrier {
        None => CarrierFamily::Telekom.operator_marker().to_string(),
        Some(name) => CarrierRegistry::get_by_cli_name(&name.to_lowercase())
            .map_or_else(|| name.to_string(), |desc| desc.operator_marker.to_string()),
    }
}

/// Runs the fetch command.
pub async fn run(args: &FetchArgs, cli: &Cli, settings: &SettingsStore) -> Result<ExitCode> {
    let carrier = carrier_text(args.carrier.as_deref());
    let supplier = CarrierRegistry::resolve(&carrier);
    info!(carrier = %carrier, supplier = supplier.id(), "Fetching usage");

    let ctx = FetchContext::with_settings(settings.get().await.fetch_settings())?;
    let outcome = supplier.fetch(&ctx).await;

    print_outcome(cli, &carrier, &outcome)?;
    Ok(exit_code_for(&outcome))
}
