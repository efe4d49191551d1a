//! Configuration loading utilities

use crate::schema::Config;
use crate::validator::{ConfigValidator, ValidationIssue};
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_VAR: &str = "WEFT_CONFIG_PATH";

/// Files probed, in order, when no explicit path is given.
const DEFAULT_CONFIG_FILES: [&str; 3] = ["weft.yaml", "weft.yml", "weft.toml"];

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file {path}: {source}")]
    Io {
        /// File that could not be read
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: std::io::Error,
    },

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("Failed to parse TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// File extension is neither YAML nor TOML
    #[error("Unsupported configuration format: {0}")]
    UnsupportedFormat(PathBuf),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParse {
        /// Variable name
        var: String,
        /// Underlying cause
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Configuration validation error
    #[error("Configuration validation failed: {}", join_issues(.0))]
    Invalid(Vec<ValidationIssue>),
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<ConfigError> for weft_common::WeftError {
    fn from(err: ConfigError) -> Self {
        weft_common::WeftError::config_with_source("Failed to load configuration", err)
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML or TOML file with environment variable overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let mut config = Self::parse_file(path.as_ref())?;
        Self::apply_overrides(&mut config, |var| env::var(var).ok())?;
        ConfigValidator::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from the first file found, falling back to defaults
    ///
    /// `WEFT_CONFIG_PATH` wins over the default file names.
    pub fn load() -> Result<Config, ConfigError> {
        if let Ok(path) = env::var(CONFIG_PATH_VAR) {
            return Self::load_config(path);
        }

        if let Some(path) = DEFAULT_CONFIG_FILES
            .iter()
            .map(Path::new)
            .find(|path| path.exists())
        {
            return Self::load_config(path);
        }

        debug!("No configuration file found, using defaults");
        let mut config = Config::default();
        Self::apply_overrides(&mut config, |var| env::var(var).ok())?;
        ConfigValidator::validate(&config)?;
        Ok(config)
    }

    /// Parse a configuration file without overrides or validation
    pub fn parse_file(path: &Path) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => serde_yaml::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        };

        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Apply `WEFT_*` overrides using `lookup` to read variables
    pub fn apply_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("WEFT_API_URL") {
            config.api.url = url;
        }

        if let Some(timeout) = lookup("WEFT_REQUEST_TIMEOUT") {
            config.api.request_timeout_seconds =
                timeout.parse().map_err(|e| ConfigError::EnvParse {
                    var: "WEFT_REQUEST_TIMEOUT".to_string(),
                    source: Box::new(e),
                })?;
        }

        if let Some(url) = lookup("WEFT_TRANSLATIONS_URL") {
            config.i18n.translations_url = url;
        }

        if let Some(dir) = lookup("WEFT_TRANSLATIONS_DIR") {
            config.i18n.translations_dir = Some(PathBuf::from(dir));
        }

        if let Some(locale) = lookup("WEFT_BASE_LOCALE") {
            config.i18n.base_locale = locale;
        }

        // LANG-style values such as `fr_FR.UTF-8` keep only the locale part.
        if let Some(locale) = lookup("WEFT_LOCALE") {
            let locale = locale.split('.').next().unwrap_or_default().to_string();
            if !locale.is_empty() {
                config.i18n.environment_locale = Some(locale);
            }
        }

        if let Some(path) = lookup("WEFT_PREFERENCES_PATH") {
            config.i18n.preferences_path = PathBuf::from(path);
        }

        if let Some(session_id) = lookup("WEFT_SESSION_ID") {
            config.session.session_id = session_id;
        }

        if let Some(token) = lookup("WEFT_TOKEN") {
            config.session.token = token;
        }

        if let Some(level) = lookup("WEFT_LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_overrides_apply() {
        let mut config = Config::default();
        ConfigLoader::apply_overrides(
            &mut config,
            lookup_from(&[
                ("WEFT_API_URL", "https://chat.example/api/v9"),
                ("WEFT_LOCALE", "fr_FR.UTF-8"),
                ("WEFT_REQUEST_TIMEOUT", "5"),
                ("WEFT_SESSION_ID", "abc"),
            ]),
        )
        .unwrap();

        assert_eq!(config.api.url, "https://chat.example/api/v9");
        assert_eq!(config.api.request_timeout_seconds, 5);
        assert_eq!(config.i18n.environment_locale.as_deref(), Some("fr_FR"));
        assert_eq!(config.session.session_id, "abc");
    }

    #[test]
    fn test_bad_numeric_override_is_reported() {
        let mut config = Config::default();
        let err = ConfigLoader::apply_overrides(
            &mut config,
            lookup_from(&[("WEFT_REQUEST_TIMEOUT", "soon")]),
        )
        .unwrap_err();

        assert!(err.to_string().contains("WEFT_REQUEST_TIMEOUT"));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weft.ini");
        std::fs::write(&path, "x=1").unwrap();

        assert!(matches!(
            ConfigLoader::parse_file(&path),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }
}
