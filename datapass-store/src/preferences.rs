//! Persistent key/value preferences.
//!
//! A small string-keyed map that survives restarts: strings, integers and
//! string sets, stored together in one JSON file. Edits stay in memory until
//! [`PreferenceStore::save`] is called.
//!
//! Per-carrier usage fields are namespaced by appending the carrier text to
//! the field key (`trafficUnit` + `Telekom.de` -> `trafficUnitTelekom.de`).

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::StoreError;
use crate::persistence::{JsonFile, default_preferences_path};

// ============================================================================
// Keys
// ============================================================================

/// Per-carrier usage fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceKey {
    /// `"<used>/<available>"` text.
    TrafficProportion,
    /// Display unit symbol.
    TrafficUnit,
    /// Used share, `0..=100`.
    TrafficWastedPercentage,
    /// Carrier timestamp text.
    LastUpdate,
    /// Hint line shown under the gauge.
    Hint,
}

impl PreferenceKey {
    /// All usage fields.
    pub const ALL: [PreferenceKey; 5] = [
        PreferenceKey::TrafficProportion,
        PreferenceKey::TrafficUnit,
        PreferenceKey::TrafficWastedPercentage,
        PreferenceKey::LastUpdate,
        PreferenceKey::Hint,
    ];

    /// Field name without carrier suffix.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TrafficProportion => "trafficProportion",
            Self::TrafficUnit => "trafficUnit",
            Self::TrafficWastedPercentage => "trafficWastedPercentage",
            Self::LastUpdate => "lastUpdate",
            Self::Hint => "hint",
        }
    }

    /// Storage key for `carrier`.
    pub fn for_carrier(self, carrier: &str) -> String {
        format!("{}{carrier}", self.as_str())
    }
}

// ============================================================================
// Cached Usage
// ============================================================================

/// The last displayed usage of one carrier, as stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedUsage {
    /// `"<used>/<available>"`, empty when unknown.
    pub proportion: String,
    /// Unit symbol, empty when unknown.
    pub unit: String,
    /// Used share, `0..=100`.
    pub percentage: u8,
    /// Carrier timestamp text.
    pub last_update: String,
    /// Hint line.
    pub hint: String,
}

// ============================================================================
// Preference Data
// ============================================================================

/// On-disk representation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferenceData {
    /// String values.
    pub strings: BTreeMap<String, String>,
    /// Integer values.
    pub ints: BTreeMap<String, i64>,
    /// String set values.
    pub string_sets: BTreeMap<String, BTreeSet<String>>,
}

impl PreferenceData {
    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty() && self.ints.is_empty() && self.string_sets.is_empty()
    }
}

// ============================================================================
// Preference Store
// ============================================================================

/// Shared preference map, optionally backed by a JSON file.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    data: Arc<RwLock<PreferenceData>>,
    file: Option<JsonFile>,
}

impl PreferenceStore {
    /// Creates a store that is never written to disk.
    pub fn in_memory() -> Self {
        Self {
            data: Arc::new(RwLock::new(PreferenceData::default())),
            file: None,
        }
    }

    /// Loads preferences from the default path.
    ///
    /// # Errors
    ///
    /// Currently infallible; a missing or corrupt file yields an empty store.
    pub async fn load_default() -> Result<Self, StoreError> {
        Self::load(default_preferences_path()).await
    }

    /// Loads preferences from `path`.
    ///
    /// # Errors
    ///
    /// Currently infallible; a missing or corrupt file yields an empty store.
    pub async fn load(path: PathBuf) -> Result<Self, StoreError> {
        let file = JsonFile::new(path);
        let data: PreferenceData = file.read_or_default("preferences").await;

        Ok(Self {
            data: Arc::new(RwLock::new(data)),
            file: Some(file),
        })
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.file.as_ref().map(JsonFile::path)
    }

    /// Writes the current state to the backing file.
    ///
    /// Concurrent saves from clones of this store run one after another, and
    /// each writes the state as of its turn.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be written.
    pub async fn save(&self) -> Result<(), StoreError> {
        let Some(file) = &self.file else {
            return Ok(());
        };
        let writer = file.lock().await;
        let data = self.data.read().await.clone();
        writer.write(&data).await?;
        debug!(path = %file.path().display(), "Preferences saved");
        Ok(())
    }

    /// Copy of everything stored.
    pub async fn snapshot(&self) -> PreferenceData {
        self.data.read().await.clone()
    }

    /// Applies several edits under one lock.
    pub async fn edit<F>(&self, f: F)
    where
        F: FnOnce(&mut PreferenceData),
    {
        let mut data = self.data.write().await;
        f(&mut data);
    }

    /// Gets a string value.
    pub async fn get_string(&self, key: &str) -> Option<String> {
        self.data.read().await.strings.get(key).cloned()
    }

    /// Sets a string value.
    pub async fn put_string(&self, key: &str, value: impl Into<String>) {
        self.data
            .write()
            .await
            .strings
            .insert(key.to_string(), value.into());
    }

    /// Gets an integer value.
    pub async fn get_int(&self, key: &str) -> Option<i64> {
        self.data.read().await.ints.get(key).copied()
    }

    /// Sets an integer value.
    pub async fn put_int(&self, key: &str, value: i64) {
        self.data.write().await.ints.insert(key.to_string(), value);
    }

    /// Gets a string set, empty when absent.
    pub async fn get_set(&self, key: &str) -> BTreeSet<String> {
        self.data
            .read()
            .await
            .string_sets
            .get(key)
            .cloned()
            .unwrap_or_default()
    }

    /// Replaces a string set.
    pub async fn put_set(&self, key: &str, value: BTreeSet<String>) {
        self.data
            .write()
            .await
            .string_sets
            .insert(key.to_string(), value);
    }

    /// Returns true if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.data.read().await.is_empty()
    }

    // ========================================================================
    // Per-carrier usage
    // ========================================================================

    /// Returns true if any usage field is stored for `carrier`.
    pub async fn has_usage_for(&self, carrier: &str) -> bool {
        let data = self.data.read().await;
        PreferenceKey::ALL.iter().any(|key| {
            let key = key.for_carrier(carrier);
            data.strings.contains_key(&key) || data.ints.contains_key(&key)
        })
    }

    /// Reads the stored usage of `carrier`; absent fields are empty or zero.
    pub async fn cached_usage(&self, carrier: &str) -> CachedUsage {
        let data = self.data.read().await;
        let text = |key: PreferenceKey| {
            data.strings
                .get(&key.for_carrier(carrier))
                .cloned()
                .unwrap_or_default()
        };
        let percentage = data
            .ints
            .get(&PreferenceKey::TrafficWastedPercentage.for_carrier(carrier))
            .map_or(0, |v| u8::try_from((*v).clamp(0, 100)).unwrap_or(0));

        CachedUsage {
            proportion: text(PreferenceKey::TrafficProportion),
            unit: text(PreferenceKey::TrafficUnit),
            percentage,
            last_update: text(PreferenceKey::LastUpdate),
            hint: text(PreferenceKey::Hint),
        }
    }

    /// Stores all usage fields of `carrier` at once.
    pub async fn store_usage(&self, carrier: &str, usage: &CachedUsage) {
        self.edit(|data| {
            let mut put = |key: PreferenceKey, value: &str| {
                data.strings.insert(key.for_carrier(carrier), value.to_string());
            };
            put(PreferenceKey::TrafficProportion, &usage.proportion);
            put(PreferenceKey::TrafficUnit, &usage.unit);
            put(PreferenceKey::LastUpdate, &usage.last_update);
            put(PreferenceKey::Hint, &usage.hint);
            data.ints.insert(
                PreferenceKey::TrafficWastedPercentage.for_carrier(carrier),
                i64::from(usage.percentage),
            );
        })
        .await;
        debug!(carrier, percentage = usage.percentage, "Stored usage");
    }
}

impl Default for PreferenceStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

// ============================================================================
// Tests
// ============================================================================
