//! On-disk locations and the JSON file wrapper both stores use.
//!
//! Widgets refresh concurrently and every finished update saves the
//! preference file, so writes to one [`JsonFile`] go through a shared lock
//! and each write stages its bytes in its own temp file before the rename.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

use crate::error::StoreError;

// ============================================================================
// Default Paths
// ============================================================================

fn app_dir(base: Option<PathBuf>, mac_base: &[&str]) -> PathBuf {
    if cfg!(target_os = "macos") {
        dirs::home_dir().map_or_else(
            || PathBuf::from("."),
            |home| mac_base.iter().fold(home, |p, c| p.join(c)).join("DataPass"),
        )
    } else {
        base.map_or_else(|| PathBuf::from("."), |b| b.join("datapass"))
    }
}

/// Directory holding `settings.json`.
///
/// `~/Library/Application Support/DataPass` on macOS, `<config>/datapass`
/// elsewhere.
pub fn default_config_dir() -> PathBuf {
    app_dir(dirs::config_dir(), &["Library", "Application Support"])
}

/// Directory holding `preferences.json`.
///
/// `~/Library/Caches/DataPass` on macOS, `<cache>/datapass` elsewhere.
pub fn default_cache_dir() -> PathBuf {
    app_dir(dirs::cache_dir(), &["Library", "Caches"])
}

/// Default settings file.
pub fn default_settings_path() -> PathBuf {
    default_config_dir().join("settings.json")
}

/// Default preference file: last reading per carrier plus the widget list.
pub fn default_preferences_path() -> PathBuf {
    default_cache_dir().join("preferences.json")
}

// ============================================================================
// JSON File
// ============================================================================

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A JSON document at a fixed path.
///
/// Clones share the write lock, so every handle to the same store writes in
/// turn.
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
    writer: Arc<Mutex<()>>,
}

impl JsonFile {
    /// Wraps `path`. Nothing is touched on disk.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: Arc::new(Mutex::new(())),
        }
    }

    /// Location of the document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and decodes the document; `Ok(None)` when the file is absent.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or decoded.
    pub async fn read<T: DeserializeOwned>(&self) -> Result<Option<T>, StoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Reads the document, falling back to `T::default()` when it is absent
    /// or unreadable. `what` names the document in the log.
    pub async fn read_or_default<T: DeserializeOwned + Default>(&self, what: &str) -> T {
        match self.read().await {
            Ok(Some(data)) => {
                debug!(path = %self.path.display(), what, "Loaded");
                data
            }
            Ok(None) => {
                debug!(path = %self.path.display(), what, "Not found, starting from defaults");
                T::default()
            }
            Err(e) => {
                warn!(path = %self.path.display(), what, error = %e, "Unreadable, starting from defaults");
                T::default()
            }
        }
    }

    /// Waits for exclusive write access.
    ///
    /// Take the snapshot to persist after this returns, so a later state is
    /// never overwritten by an earlier one.
    pub async fn lock(&self) -> JsonWriter<'_> {
        JsonWriter {
            file: self,
            _guard: self.writer.lock().await,
        }
    }

    fn temp_path(&self) -> PathBuf {
        let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let name = self
            .path
            .file_name()
            .map_or_else(|| "data".into(), |name| name.to_string_lossy().into_owned());
        self.path
            .with_file_name(format!(".{name}.{}.{n}.tmp", std::process::id()))
    }
}

/// Exclusive write access to a [`JsonFile`].
#[derive(Debug)]
pub struct JsonWriter<'a> {
    file: &'a JsonFile,
    _guard: MutexGuard<'a, ()>,
}

impl JsonWriter<'_> {
    /// Replaces the document with `data`.
    ///
    /// Missing parent directories are created. On Unix the file is readable
    /// by its owner only.
    ///
    /// # Errors
    ///
    /// Returns error if encoding or any file operation fails. The previous
    /// document is left in place in that case.
    pub async fn write<T: Serialize>(&self, data: &T) -> Result<(), StoreError> {
        let path = self.file.path();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_vec_pretty(data)?;
        let staged = self.file.temp_path();
        tokio::fs::write(&staged, &json).await?;
        restrict_to_owner(&staged).await?;
        if let Err(e) = tokio::fs::rename(&staged, path).await {
            let _ = tokio::fs::remove_file(&staged).await;
            return Err(e.into());
        }

        debug!(path = %path.display(), bytes = json.len(), "Written");
        Ok(())
    }
}

#[cfg(unix)]
async fn restrict_to_owner(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;

    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).await?;
    Ok(())
}

#[cfg(not(unix))]
async fn restrict_to_owner(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
