//! User settings store.
//!
//! Loads, validates and saves the settings file.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use datapass_fetch::FetchSettings;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::error::StoreError;
use crate::persistence::{JsonFile, default_settings_path};

// ============================================================================
// Settings Types
// ============================================================================

/// User settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Periodic refresh interval in seconds.
    pub refresh_interval_secs: u64,

    /// Minimum seconds between two automatic updates of one widget.
    pub min_time_between_requests_secs: u64,

    /// Connect timeout for the datapass request.
    pub connect_timeout_ms: u64,

    /// Read timeout for the datapass request.
    pub read_timeout_ms: u64,

    /// Log level.
    pub log_level: LogLevel,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 6 * 60 * 60,
            min_time_between_requests_secs: 15,
            connect_timeout_ms: 7000,
            read_timeout_ms: 7000,
            log_level: LogLevel::default(),
        }
    }
}

impl Settings {
    /// Periodic refresh interval.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    /// Throttle interval between automatic updates.
    pub fn min_time_between_requests(&self) -> Duration {
        Duration::from_secs(self.min_time_between_requests_secs)
    }

    /// Fetch settings with the configured timeouts.
    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings::default().with_timeouts(
            Duration::from_millis(self.connect_timeout_ms),
            Duration::from_millis(self.read_timeout_ms),
        )
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] naming the first invalid field.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.refresh_interval_secs == 0 {
            return Err(StoreError::Config(
                "refresh_interval_secs must be positive".to_string(),
            ));
        }
        if self.connect_timeout_ms == 0 || self.read_timeout_ms == 0 {
            return Err(StoreError::Config("timeouts must be positive".to_string()));
        }
        Ok(())
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// Error level logging.
    Error,
    /// Warning level logging.
    #[default]
    Warn,
    /// Info level logging.
    Info,
    /// Debug level logging.
    Debug,
    /// Trace level logging.
    Trace,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

// ============================================================================
// Settings Store
// ============================================================================

/// Persistent settings store.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    settings: Arc<RwLock<Settings>>,
    file: JsonFile,
}

impl SettingsStore {
    /// Creates a store with default settings.
    pub fn new(path: PathBuf) -> Self {
        Self {
            settings: Arc::new(RwLock::new(Settings::default())),
            file: JsonFile::new(path),
        }
    }

    /// Loads settings from the default path.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be loaded from disk.
    pub async fn load_default() -> Result<Self, StoreError> {
        Self::load(default_settings_path()).await
    }

    /// Loads settings from a path.
    ///
    /// A missing, unreadable or out-of-range file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be loaded from disk.
    pub async fn load(path: PathBuf) -> Result<Self, StoreError> {
        let file = JsonFile::new(path);
        let loaded: Settings = file.read_or_default("settings").await;
        let settings = match loaded.validate() {
            Ok(()) => loaded,
            Err(e) => {
                warn!(error = %e, "Invalid settings, using defaults");
                Settings::default()
            }
        };

        Ok(Self {
            settings: Arc::new(RwLock::new(settings)),
            file,
        })
    }

    /// Path of the settings file.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Gets a copy of the current settings.
    pub async fn get(&self) -> Settings {
        self.settings.read().await.clone()
    }

    /// Validates and applies `settings`, then writes them to disk.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] for out-of-range values (nothing is
    /// changed), or an I/O error if the file cannot be written.
    pub async fn replace(&self, settings: Settings) -> Result<(), StoreError> {
        settings.validate()?;
        let writer = self.file.lock().await;
        *self.settings.write().await = settings.clone();
        writer.write(&settings).await?;
        info!(path = %self.file.path().display(), "Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.refresh_interval(), Duration::from_secs(21_600));
        assert_eq!(settings.min_time_between_requests(), Duration::from_secs(15));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_fetch_settings_use_timeouts() {
        let settings = Settings {
            connect_timeout_ms: 1500,
            read_timeout_ms: 2500,
            ..Settings::default()
        };
        let fetch = settings.fetch_settings();
        assert_eq!(fetch.connect_timeout, Duration::from_millis(1500));
        assert_eq!(fetch.read_timeout, Duration::from_millis(2500));
    }

    #[test]
    fn test_validate_rejects_zero() {
        let settings = Settings {
            read_timeout_ms: 0,
            ..Settings::default()
        };
        assert!(matches!(settings.validate(), Err(StoreError::Config(_))));
    }

    #[tokio::test]
    async fn test_replace_rejects_invalid_and_keeps_old() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(temp_dir.path().join("settings.json"));
        let invalid = Settings {
            refresh_interval_secs: 0,
            ..Settings::default()
        };

        assert!(matches!(
            store.replace(invalid).await,
            Err(StoreError::Config(_))
        ));
        assert_eq!(store.get().await, Settings::default());
        assert!(!store.path().exists());
    }
}
