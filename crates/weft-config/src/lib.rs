//! # Weft Config
//!
//! Type-safe configuration management for Weft.
//!
//! This crate provides configuration loading from YAML or TOML files,
//! environment overrides, validation, and a lock-free cache for atomic
//! updates.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod defaults;
pub mod loader;
pub mod schema;
pub mod validator;

pub use cache::*;
pub use loader::*;
pub use schema::*;
pub use validator::*;
