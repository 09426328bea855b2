// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `DataPass` Store
//!
//! Local state for the `DataPass` application.
//!
//! This crate provides:
//!
//! - **`PreferenceStore`**: Last known usage per carrier, as a persistent key/value map
//! - **`TrackedInstances`**: Placed widgets, their carriers and update throttle
//! - **`SettingsStore`**: User settings with persistence
//! - **`JsonFile`**: Serialized, atomic writes of one JSON document
//!
//! ## Usage
//!
//! ```ignore
//! use datapass_store::{PreferenceStore, TrackedInstances};
//!
//! let prefs = PreferenceStore::load_default().await?;
//! let instances = TrackedInstances::new(prefs.clone());
//!
//! instances.add(7, "Telekom.de").await;
//! let cached = prefs.cached_usage("Telekom.de").await;
//! prefs.save().await?;
//! ```

pub mod error;
pub mod instances;
pub mod persistence;
pub mod preferences;
pub mod settings;

pub use error::StoreError;
pub use instances::{DEFAULT_MIN_TIME_BETWEEN_REQUESTS, TrackedInstance, TrackedInstances};
pub use persistence::{
    JsonFile, JsonWriter, default_cache_dir, default_config_dir, default_preferences_path,
    default_settings_path,
};
pub use preferences::{CachedUsage, PreferenceData, PreferenceKey, PreferenceStore};
pub use settings::{LogLevel, Settings, SettingsStore};
#[cfg(test)]
mod persistence_tests;
