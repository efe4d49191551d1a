//! Runtime validation of a loaded configuration.

use crate::loader::ConfigError;
use crate::schema::Config;
use std::fmt;
use tracing::warn;
use unic_langid::LanguageIdentifier;
use url::Url;

/// A single problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Dotted path of the offending field.
    pub field: &'static str,
    /// What is wrong with it.
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates a configuration, failing with every issue found.
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let issues = Self::issues(config);
        if issues.is_empty() {
            if config.session.session_id.is_empty() {
                warn!("session.session_id is empty; component interactions will be rejected");
            }
            Ok(())
        } else {
            Err(ConfigError::Invalid(issues))
        }
    }

    /// Collects all validation issues without failing fast.
    pub fn issues(config: &Config) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if let Err(message) = check_http_url(&config.api.url) {
            issues.push(ValidationIssue {
                field: "api.url",
                message,
            });
        }

        if config.api.request_timeout_seconds == 0 {
            issues.push(ValidationIssue {
                field: "api.request_timeout_seconds",
                message: "must be greater than zero".to_string(),
            });
        }

        if config.i18n.translations_dir.is_none() {
            if let Err(message) = check_http_url(&config.i18n.translations_url) {
                issues.push(ValidationIssue {
                    field: "i18n.translations_url",
                    message,
                });
            }
        }

        if let Err(message) = check_locale(&config.i18n.base_locale) {
            issues.push(ValidationIssue {
                field: "i18n.base_locale",
                message,
            });
        }

        if let Some(locale) = &config.i18n.environment_locale {
            if let Err(message) = check_locale(locale) {
                issues.push(ValidationIssue {
                    field: "i18n.environment_locale",
                    message,
                });
            }
        }

        if config.logging.level.trim().is_empty() {
            issues.push(ValidationIssue {
                field: "logging.level",
                message: "cannot be empty".to_string(),
            });
        }

        issues
    }
}

fn check_http_url(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|e| format!("invalid URL {raw:?}: {e}"))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!("unsupported scheme {other:?}")),
    }
}

fn check_locale(raw: &str) -> Result<(), String> {
    raw.replace('_', "-")
        .parse::<LanguageIdentifier>()
        .map(|_| ())
        .map_err(|e| format!("invalid locale {raw:?}: {e}"))
}
