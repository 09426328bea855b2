//! Persistence round-trip and edge case tests.
//!
//! Tests file I/O, the preference file and settings reload.

use tempfile::TempDir;

use crate::instances::{TrackedInstance, TrackedInstances};
use crate::persistence::JsonFile;
use crate::preferences::{CachedUsage, PreferenceData, PreferenceStore};
use crate::settings::{LogLevel, Settings, SettingsStore};

// ============================================================================
// JSON File Tests
// ============================================================================

#[tokio::test]
async fn test_write_creates_parent_directories() {
    let temp_dir = TempDir::new().unwrap();
    let file = JsonFile::new(temp_dir.path().join("deeply").join("nested").join("prefs.json"));

    let result = file.lock().await.write(&serde_json::json!({"key": "value"})).await;
    assert!(result.is_ok());
    assert!(file.path().exists());
}

#[tokio::test]
async fn test_missing_file_reads_as_none() {
    let file = JsonFile::new("/nonexistent/path/settings.json");

    let result: Option<Settings> = file.read().await.unwrap();
    assert!(result.is_none());

    let fallback: Settings = file.read_or_default("settings").await;
    assert_eq!(fallback, Settings::default());
}

#[tokio::test]
async fn test_write_leaves_no_staging_files() {
    let temp_dir = TempDir::new().unwrap();
    let file = JsonFile::new(temp_dir.path().join("atomic.json"));

    file.lock().await.write(&Settings::default()).await.unwrap();

    let names: Vec<_> = std::fs::read_dir(temp_dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(names, vec![std::ffi::OsString::from("atomic.json")]);
}

// ============================================================================
// Preference File Tests
// ============================================================================

#[tokio::test]
async fn test_preferences_survive_reload() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("preferences.json");

    let store = PreferenceStore::load(path.clone()).await.unwrap();
    let usage = CachedUsage {
        proportion: "0,1/5,0".to_string(),
        unit: "GB".to_string(),
        percentage: 2,
        last_update: "24.03. - 13:37".to_string(),
        hint: String::new(),
    };
    store.store_usage("Telekom.de", &usage).await;
    let instances = TrackedInstances::new(store.clone());
    instances.add(17, "Telekom.de").await;
    store.save().await.unwrap();

    let reloaded = PreferenceStore::load(path).await.unwrap();
    assert_eq!(reloaded.cached_usage("Telekom.de").await, usage);
    assert_eq!(
        TrackedInstances::new(reloaded).all().await,
        vec![TrackedInstance::new(17, "Telekom.de")]
    );
}

#[tokio::test]
async fn test_preferences_file_layout() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("preferences.json");

    let store = PreferenceStore::load(path.clone()).await.unwrap();
    store.put_string("hintcongstar", "Mobile Daten einschalten").await;
    store.put_int("trafficWastedPercentagecongstar", 40).await;
    store.save().await.unwrap();

    let raw: serde_json::Value = JsonFile::new(path).read().await.unwrap().unwrap();
    assert_eq!(raw["strings"]["hintcongstar"], "Mobile Daten einschalten");
    assert_eq!(raw["ints"]["trafficWastedPercentagecongstar"], 40);
}

#[tokio::test]
async fn test_corrupt_preferences_start_empty() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("preferences.json");
    tokio::fs::write(&path, "{not json").await.unwrap();

    let store = PreferenceStore::load(path).await.unwrap();
    assert!(store.is_empty().await);
    assert_eq!(store.snapshot().await, PreferenceData::default());
}

#[tokio::test]
async fn test_unicode_carrier_names() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("preferences.json");

    let store = PreferenceStore::load(path.clone()).await.unwrap();
    let instances = TrackedInstances::new(store.clone());
    instances.add(1, "Telekom.de ✓ 日本").await;
    store.save().await.unwrap();

    let reloaded = TrackedInstances::new(PreferenceStore::load(path).await.unwrap());
    assert_eq!(
        reloaded.carrier_for(1).await.as_deref(),
        Some("Telekom.de ✓ 日本")
    );
}

#[tokio::test]
async fn test_concurrent_saves_all_succeed_and_keep_every_carrier() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("preferences.json");
    let store = PreferenceStore::load(path.clone()).await.unwrap();

    let saves = (0..16u8).map(|i| {
        let store = store.clone();
        tokio::spawn(async move {
            let usage = CachedUsage {
                percentage: i,
                ..CachedUsage::default()
            };
            store.store_usage(&format!("carrier{i}"), &usage).await;
            store.save().await
        })
    });
    for result in futures::future::join_all(saves).await {
        result.unwrap().unwrap();
    }

    let reloaded = PreferenceStore::load(path).await.unwrap();
    for i in 0..16u8 {
        assert_eq!(reloaded.cached_usage(&format!("carrier{i}")).await.percentage, i);
    }
    let leftovers = std::fs::read_dir(temp_dir.path()).unwrap().count();
    assert_eq!(leftovers, 1);
}

// ============================================================================
// Settings Tests
// ============================================================================

#[tokio::test]
async fn test_settings_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("settings.json");

    let store = SettingsStore::load(path.clone()).await.unwrap();
    store
        .replace(Settings {
            refresh_interval_secs: 3600,
            log_level: LogLevel::Debug,
            ..Settings::default()
        })
        .await
        .unwrap();

    let reloaded = SettingsStore::load(path).await.unwrap().get().await;
    assert_eq!(reloaded.refresh_interval_secs, 3600);
    assert_eq!(reloaded.log_level, LogLevel::Debug);
    assert_eq!(reloaded.read_timeout_ms, 7000);
}

#[tokio::test]
async fn test_load_minimal_json_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("minimal.json");
    tokio::fs::write(&path, r#"{"min_time_between_requests_secs": 30, "extra": 1}"#)
        .await
        .unwrap();

    let loaded = SettingsStore::load(path).await.unwrap().get().await;
    assert_eq!(loaded.min_time_between_requests_secs, 30);
    assert_eq!(loaded.refresh_interval_secs, Settings::default().refresh_interval_secs);
}

#[tokio::test]
async fn test_invalid_settings_fall_back_to_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("invalid.json");
    tokio::fs::write(&path, r#"{"connect_timeout_ms": 0}"#).await.unwrap();

    let loaded = SettingsStore::load(path).await.unwrap().get().await;
    assert_eq!(loaded, Settings::default());
}
