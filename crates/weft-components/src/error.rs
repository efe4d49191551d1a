//! Error types for component decoding and interactions

use thiserror::Error;

/// Errors raised when reading component payloads or activating components
#[derive(Error, Debug)]
pub enum ComponentError {
    /// The payload is not a JSON array of components
    #[error("Invalid component payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// The control is disabled or has nothing to send
    #[error("Component is disabled: {custom_id}")]
    Disabled {
        /// Custom id of the control, empty when it has none
        custom_id: String,
    },

    /// Link buttons open their URL and never send an interaction
    #[error("Link button does not send interactions: {url}")]
    LinkButton {
        /// Target URL
        url: String,
    },

    /// Chosen select values violate the select's constraints
    #[error("Invalid selection for {custom_id}: {reason}")]
    InvalidSelection {
        /// Custom id of the select
        custom_id: String,
        /// What is wrong
        reason: String,
    },

    /// The API base URL cannot take a path
    #[error("Invalid API endpoint: {url}")]
    InvalidEndpoint {
        /// Offending URL
        url: String,
    },

    /// Neither the message author nor the context names an application
    #[error("No application to send the interaction to")]
    MissingApplication,

    /// Request could not be delivered
    #[error("Interaction request failed: {source}")]
    Transport {
        /// Underlying cause
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a non-success status
    #[error("Interaction rejected with status {status}")]
    Rejected {
        /// HTTP status code
        status: u16,
    },
}

impl ComponentError {
    /// Shorthand for [`ComponentError::InvalidSelection`].
    pub fn invalid_selection(custom_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSelection {
            custom_id: custom_id.into(),
            reason: reason.into(),
        }
    }
}

impl From<reqwest::Error> for ComponentError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::Rejected {
                status: status.as_u16(),
            },
            None => Self::Transport { source: err },
        }
    }
}

impl From<ComponentError> for weft_common::WeftError {
    fn from(err: ComponentError) -> Self {
        match err {
            ComponentError::Transport { source } => source.into(),
            ComponentError::Rejected { status } => Self::Network {
                message: format!("HTTP error: {status}"),
                status_code: Some(status),
                source: None,
            },
            ComponentError::InvalidSelection { ref custom_id, .. } => {
                Self::validation_field(err.to_string(), custom_id.clone())
            }
            other => Self::component_with_source(other.to_string(), other),
        }
    }
}

/// Result type for component operations
pub type ComponentResult<T> = Result<T, ComponentError>;
