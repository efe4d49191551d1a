//! # Weft Common
//!
//! Shared types, utilities, and common functionality for Weft.
//!
//! This crate provides the error type, snowflake identifiers, logging
//! bootstrap, and small helpers used across all other crates in the
//! workspace.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod logging;
pub mod types;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use error::{Result, WeftError};
pub use logging::{
    init_default_logging, init_dev_logging, init_logging, init_prod_logging, LogFormat,
    LoggingConfig,
};
pub use types::*;
pub use utils::*;
