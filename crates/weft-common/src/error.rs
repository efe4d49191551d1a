//! Workspace-wide error type
//!
//! Each crate keeps its own precise error enum and converts into [`WeftError`]
//! at the application boundary, so callers that only log or report failures
//! can stay on one type.

use thiserror::Error;

/// Boxed source error carried by [`WeftError`] variants.
pub type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Result type alias for Weft operations
pub type Result<T> = std::result::Result<T, WeftError>;

fn boxed(source: impl std::error::Error + Send + Sync + 'static) -> Option<BoxedSource> {
    Some(Box::new(source))
}

/// Failure categories shared across the workspace
#[derive(Error, Debug)]
pub enum WeftError {
    /// Bad or unreadable configuration, including logging setup
    #[error("Configuration error: {message}")]
    Config {
        /// Human readable description
        message: String,
        /// Underlying cause
        #[source]
        source: Option<BoxedSource>,
    },

    /// Local file access
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Requests to the chat API or the translation host
    #[error("Network error: {message}")]
    Network {
        /// Human readable description
        message: String,
        /// HTTP status, when the server answered
        status_code: Option<u16>,
        /// Underlying cause
        #[source]
        source: Option<BoxedSource>,
    },

    /// JSON payloads
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Locale loading and message lookup
    #[error("Localization error: {message}")]
    Localization {
        /// Human readable description
        message: String,
        /// Locale code involved, if any
        locale: Option<String>,
        /// Underlying cause
        #[source]
        source: Option<BoxedSource>,
    },

    /// Component decoding and interactions
    #[error("Component error: {message}")]
    Component {
        /// Human readable description
        message: String,
        /// Underlying cause
        #[source]
        source: Option<BoxedSource>,
    },

    /// Rejected user input
    #[error("Validation error: {message}")]
    Validation {
        /// Human readable description
        message: String,
        /// Offending field, if known
        field: Option<String>,
    },

    /// Anything else
    #[error("{message}")]
    Generic {
        /// Human readable description
        message: String,
        /// Underlying cause
        #[source]
        source: Option<BoxedSource>,
    },
}

impl WeftError {
    /// Free-form error without a cause.
    pub fn new(msg: impl Into<String>) -> Self {
        Self::Generic {
            message: msg.into(),
            source: None,
        }
    }

    /// Free-form error wrapping `source`.
    pub fn with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Generic {
            message: msg.into(),
            source: boxed(source),
        }
    }

    /// Configuration problem without a cause.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Configuration problem wrapping `source`.
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: boxed(source),
        }
    }

    /// Localization failure tied to `locale`.
    pub fn localization_with_locale(msg: impl Into<String>, locale: impl Into<String>) -> Self {
        Self::Localization {
            message: msg.into(),
            locale: Some(locale.into()),
            source: None,
        }
    }

    /// Component failure wrapping `source`.
    pub fn component_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Component {
            message: msg.into(),
            source: boxed(source),
        }
    }

    /// Validation failure on `field`.
    pub fn validation_field(msg: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: Some(field.into()),
        }
    }

    /// HTTP status attached to a network failure.
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Network { status_code, .. } => *status_code,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for WeftError {
    fn from(err: reqwest::Error) -> Self {
        let status_code = err.status().map(|s| s.as_u16());
        let message = match status_code {
            _ if err.is_timeout() => "Request timeout".to_string(),
            _ if err.is_connect() => "Connection failed".to_string(),
            Some(code) => format!("HTTP error: {code}"),
            None => "Network request failed".to_string(),
        };

        Self::Network {
            message,
            status_code,
            source: boxed(err),
        }
    }
}
