//! Configuration schema definitions using serde.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use weft_common::{LogFormat, LoggingConfig};

/// Main configuration structure for Weft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Chat API configuration.
    pub api: ApiConfig,
    /// Localization configuration.
    pub i18n: I18nConfig,
    /// Session configuration.
    pub session: SessionConfig,
    /// Logging configuration.
    pub logging: LoggingSettings,
}

/// Chat API configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// API root; interactions are posted to `{url}/interactions`.
    pub url: String,
    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,
}

/// Localization configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct I18nConfig {
    /// Base language; its tree is the fallback and defines the message shape.
    pub base_locale: String,
    /// URL of the translations directory served by the instance.
    pub translations_url: String,
    /// Local translations directory; takes precedence over the URL when set.
    pub translations_dir: Option<PathBuf>,
    /// Locale reported by the environment, used when no preference is stored.
    pub environment_locale: Option<String>,
    /// File holding user preferences.
    pub preferences_path: PathBuf,
}

/// Session configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Gateway session id sent with interactions.
    pub session_id: String,
    /// Authorization token sent with API requests.
    pub token: String,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter directive, e.g. `info` or `weft_i18n=debug`.
    pub level: String,
    /// Output format.
    pub format: LogFormat,
    /// Optional log file.
    pub file_path: Option<String>,
}

impl LoggingSettings {
    /// Converts the settings into a [`LoggingConfig`] for `weft_common::init_logging`.
    pub fn to_logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.level.clone(),
            format: self.format,
            file_path: self.file_path.clone(),
            ..LoggingConfig::default()
        }
    }
}
