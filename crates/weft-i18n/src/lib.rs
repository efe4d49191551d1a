//! Runtime localization for Weft
//!
//! This crate loads locale JSON trees and resolves dotted message keys into
//! display strings. It includes:
//!
//! - Locale trees and the `$N` / `{{PLURAL:..}}` / `{{GENDER:..}}` template engine
//! - Primary/fallback resolution with a strict not-found error
//! - Locale catalogs and code negotiation (`en-US` -> `en` -> base language)
//! - Directory, HTTP, and in-memory resource sources
//! - A locale manager whose switches are last-write-wins
//! - A base-tree-shaped [`Messages`] accessor rebuilt on every switch
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use weft_i18n::{I18nManager, LocaleCatalog, LocaleTree, MemorySource};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let source = MemorySource::new()
//!     .with_tree("en.json", LocaleTree::from_json(r#"{"hello": "Hello, $1!"}"#)?);
//! let catalog = LocaleCatalog::from_json(r#"{"en.json": "English"}"#)?;
//! let manager = I18nManager::with_catalog(Arc::new(source), catalog, "en");
//!
//! manager.switch_locale("en-GB").await?;
//! assert_eq!(manager.resolve("hello", &["Ada"])?, "Hello, Ada!");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod accessor;
pub mod error;
pub mod locale;
pub mod manager;
pub mod preferences;
pub mod resolver;
pub mod resource;
pub mod template;
pub mod tree;

pub use accessor::{Message, MessageTable, Messages, Scope};
pub use error::{I18nError, I18nResult};
pub use locale::{normalize_locale, primary_subtag, CatalogEntry, LocaleCatalog, Negotiated, Negotiation};
pub use manager::{I18nManager, LocaleState, ReadyLocale, SwitchOutcome};
pub use preferences::{JsonFilePreferences, MemoryPreferences, PreferenceStore, Preferences};
pub use resolver::{translate_slots, ResolvedLocale, TextSlot};
pub use resource::{DirectorySource, HttpSource, LocaleSource, MemorySource, CATALOG_FILE};
pub use template::{expand, Gender};
pub use tree::{LocaleNode, LocaleTree};
