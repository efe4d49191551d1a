//! Application-wide error types using thiserror.

use weft_common::WeftError;
use weft_components::ComponentError;
use weft_config::ConfigError;
use weft_i18n::I18nError;

/// Main application error type.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Localization error.
    #[error("Localization error: {0}")]
    I18n(#[from] I18nError),

    /// Component error.
    #[error("Component error: {0}")]
    Component(#[from] ComponentError),

    /// Configured URL does not parse.
    #[error("Invalid URL {url}: {source}")]
    InvalidUrl {
        /// Offending value
        url: String,
        /// Underlying cause
        #[source]
        source: url::ParseError,
    },

    /// Shared infrastructure error, such as logging setup.
    #[error(transparent)]
    Common(#[from] WeftError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the client application.
pub type ClientResult<T> = Result<T, ClientError>;
