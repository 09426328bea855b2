//! Config command - manage configuration.

use anyhow::Result;
use clap::{Args, Subcommand};
use datapass_store::{
    Settings, SettingsStore, default_cache_dir, default_config_dir, default_preferences_path,
    default_settings_path,
};
use tracing::info;

use crate::output::JsonFormatter;
use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration.
    Show,

    /// Show configuration paths.
    Path,

    /// Reset to defaults.
    Reset,
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, cli: &Cli, store: &SettingsStore) -> Result<ExitCode> {
    match &args.action {
        ConfigAction::Show => show_config(cli, store).await?,
        ConfigAction::Path => show_paths(cli)?,
        ConfigAction::Reset => reset_config(store).await?,
    }
    Ok(ExitCode::Success)
}

async fn show_config(cli: &Cli, store: &SettingsStore) -> Result<()> {
    let settings = store.get().await;

    match cli.format {
        OutputFormat::Text => {
            println!("DataPass Configuration");
            println!("{}", "─".repeat(40));
            println!();
            println!("Refresh interval:      {}s", settings.refresh_interval_secs);
            println!(
                "Min time between runs: {}s",
                settings.min_time_between_requests_secs
            );
            println!("Connect timeout:       {}ms", settings.connect_timeout_ms);
            println!("Read timeout:          {}ms", settings.read_timeout_ms);
            println!("Log level:             {}", settings.log_level);
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&settings)?);
        }
    }

    Ok(())
}

fn show_paths(cli: &Cli) -> Result<()> {
    let config_dir = default_config_dir();
    let settings_path = default_settings_path();
    let cache_dir = default_cache_dir();
    let preferences_path = default_preferences_path();

    match cli.format {
        OutputFormat::Text => {
            println!("Configuration Paths");
            println!("{}", "─".repeat(40));
            println!();
            println!("Config dir:       {}", config_dir.display());
            println!("Settings file:    {}", settings_path.display());
            println!("Cache dir:        {}", cache_dir.display());
            println!("Preferences file: {}", preferences_path.display());
        }
        OutputFormat::Json => {
            let paths = serde_json::json!({
                "config_dir": config_dir.display().to_string(),
                "settings_file": settings_path.display().to_string(),
                "cache_dir": cache_dir.display().to_string(),
                "preferences_file": preferences_path.display().to_string(),
            });
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&paths)?);
        }
    }

    Ok(())
}

async fn reset_config(store: &SettingsStore) -> Result<()> {
    store.replace(Settings::default()).await?;
    info!(path = %store.path().display(), "Settings reset");
    println!("Configuration reset to defaults");
    Ok(())
}
