//! Persisted user preferences

use crate::error::{I18nError, I18nResult};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// User preferences; only the locale is interpreted here
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    /// Chosen locale code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    /// Everything else, preserved across writes
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Where preferences are kept
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Current preferences; defaults when nothing was stored yet.
    async fn get(&self) -> I18nResult<Preferences>;

    /// Replace the stored preferences.
    async fn set(&self, preferences: &Preferences) -> I18nResult<()>;
}

/// Preferences stored as a JSON file
#[derive(Debug, Clone)]
pub struct JsonFilePreferences {
    path: PathBuf,
}

impl JsonFilePreferences {
    /// Use the file at `path`; it is created on the first write.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, action: &str, source: io::Error) -> I18nError {
        I18nError::Preferences {
            message: format!("failed to {action} {}", self.path.display()),
            source: Some(Box::new(source)),
        }
    }
}

#[async_trait]
impl PreferenceStore for JsonFilePreferences {
    async fn get(&self) -> I18nResult<Preferences> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No preferences at {:?}, using defaults", self.path);
                return Ok(Preferences::default());
            }
            Err(e) => return Err(self.io_error("read", e)),
        };

        serde_json::from_str(&raw).map_err(|e| I18nError::Preferences {
            message: format!("invalid preferences in {}", self.path.display()),
            source: Some(Box::new(e)),
        })
    }

    async fn set(&self, preferences: &Preferences) -> I18nResult<()> {
        let raw = serde_json::to_string_pretty(preferences).map_err(|e| I18nError::Preferences {
            message: "failed to serialize preferences".to_string(),
            source: Some(Box::new(e)),
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error("create directory for", e))?;
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, raw)
            .await
            .map_err(|e| self.io_error("write", e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| self.io_error("replace", e))?;

        debug!("Saved preferences to {:?}", self.path);
        Ok(())
    }
}

/// Preferences kept in memory
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    inner: Mutex<Preferences>,
}

impl MemoryPreferences {
    /// Start from `preferences`.
    pub fn new(preferences: Preferences) -> Self {
        Self {
            inner: Mutex::new(preferences),
        }
    }

    /// Snapshot of what is stored.
    pub fn snapshot(&self) -> Preferences {
        self.inner.lock().clone()
    }
}

#[async_trait]
impl PreferenceStore for MemoryPreferences {
    async fn get(&self) -> I18nResult<Preferences> {
        Ok(self.snapshot())
    }

    async fn set(&self, preferences: &Preferences) -> I18nResult<()> {
        *self.inner.lock() = preferences.clone();
        Ok(())
    }
}
