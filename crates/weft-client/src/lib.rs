//! # Weft Client
//!
//! Binary crate wiring the Weft core together: configuration, logging, the
//! locale manager with its preference store, and component rendering with
//! outbound interactions.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod error;

pub use app::*;
pub use error::*;
