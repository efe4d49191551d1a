//! Default values for every configuration section.

use crate::schema::*;
use std::path::PathBuf;
use weft_common::LogFormat;

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            i18n: I18nConfig::default(),
            session: SessionConfig::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8080/api/v9".to_string(),
            request_timeout_seconds: 30,
        }
    }
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            base_locale: "en".to_string(),
            translations_url: "http://localhost:8080/translations/".to_string(),
            translations_dir: None,
            environment_locale: None,
            preferences_path: PathBuf::from("preferences.json"),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_id: String::new(),
            token: String::new(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            file_path: None,
        }
    }
}
