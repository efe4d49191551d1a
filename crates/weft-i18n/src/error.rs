//! Error types for internationalization operations

use thiserror::Error;

/// Errors that can occur during internationalization operations
#[derive(Error, Debug)]
pub enum I18nError {
    /// Base language is not a valid BCP-47 identifier
    #[error("Invalid base language {code}: {source}")]
    InvalidLanguageId {
        /// Configured code
        code: String,
        /// Parser error
        #[source]
        source: unic_langid::LanguageIdentifierError,
    },

    /// Locale code is not offered by the catalog
    #[error("Unknown locale: {code}")]
    UnknownLocale {
        /// Requested code
        code: String,
    },

    /// Failed to read or fetch a resource
    #[error("Failed to load resource {path}: {source}")]
    ResourceLoad {
        /// File path or URL of the resource
        path: String,
        /// Underlying cause
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Resource was read but is not a valid locale tree or catalog
    #[error("Failed to parse resource {path}: {source}")]
    ResourceParse {
        /// File path or URL of the resource
        path: String,
        /// Underlying cause
        #[source]
        source: serde_json::Error,
    },

    /// Message not found in any tree
    #[error("Message not found: {key}")]
    MessageNotFound {
        /// Dotted key that was requested
        key: String,
    },

    /// No locale has been committed yet
    #[error("No locale loaded yet")]
    NotReady,

    /// Preference store failure
    #[error("Preference store error: {message}")]
    Preferences {
        /// What failed
        message: String,
        /// Underlying cause
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl I18nError {
    /// Shorthand for [`I18nError::MessageNotFound`].
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::MessageNotFound { key: key.into() }
    }

    /// Shorthand for [`I18nError::ResourceLoad`].
    pub fn load(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ResourceLoad {
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// Whether this error only means a key is missing.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::MessageNotFound { .. })
    }
}

impl From<I18nError> for weft_common::WeftError {
    fn from(err: I18nError) -> Self {
        let locale = match &err {
            I18nError::UnknownLocale { code } | I18nError::InvalidLanguageId { code, .. } => {
                Some(code.clone())
            }
            _ => None,
        };
        weft_common::WeftError::Localization {
            message: err.to_string(),
            locale,
            source: Some(Box::new(err)),
        }
    }
}

/// Result type for i18n operations
pub type I18nResult<T> = Result<T, I18nError>;
