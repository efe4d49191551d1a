//! Locale catalogs and code negotiation

use crate::error::{I18nError, I18nResult};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, warn};
use unic_langid::LanguageIdentifier;

/// Extension of every locale resource file.
const RESOURCE_EXTENSION: &str = ".json";

/// Normalize a locale identifier for lookup: trims whitespace and turns
/// `_` into `-` (`pt_BR` -> `pt-BR`).
pub fn normalize_locale(code: &str) -> String {
    code.trim().replace('_', "-")
}

/// The language subtag of a code (`en-US` -> `en`).
///
/// Codes that are not valid BCP 47 identifiers are cut at the first `-`.
pub fn primary_subtag(code: &str) -> String {
    let code = normalize_locale(code);
    code.parse::<LanguageIdentifier>().map_or_else(
        |_| code.split('-').next().unwrap_or_default().to_string(),
        |langid| langid.language.as_str().to_string(),
    )
}

/// One locale offered by the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Locale code (`fr`, `pt-BR`)
    pub code: String,
    /// Resource file name (`fr.json`)
    pub file: String,
    /// Human readable name, when the index provides one
    pub display_name: Option<String>,
}

/// How a requested code was mapped onto the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Negotiation {
    /// The exact code is offered
    Exact,
    /// Only the language subtag is offered
    PrimarySubtag,
    /// Nothing matched; the base language was substituted
    Substituted,
}

/// Result of [`LocaleCatalog::negotiate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Negotiated {
    /// Code to load
    pub code: String,
    /// How it was chosen
    pub negotiation: Negotiation,
}

/// The set of available locales, keyed by code
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleCatalog {
    entries: BTreeMap<String, CatalogEntry>,
}

impl LocaleCatalog {
    /// Parse the translations index: an object mapping resource file names
    /// (`"fr.json"`) to display names. Keys without the `.json` extension
    /// are ignored.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let index: BTreeMap<String, Value> = serde_json::from_str(raw)?;
        Ok(Self::from_index(index))
    }

    /// Build a catalog from an already parsed index.
    pub fn from_index(index: BTreeMap<String, Value>) -> Self {
        let entries = index
            .into_iter()
            .filter_map(|(file, name)| {
                let Some(code) = file.strip_suffix(RESOURCE_EXTENSION) else {
                    debug!("Ignoring catalog entry without {} suffix: {}", RESOURCE_EXTENSION, file);
                    return None;
                };
                let entry = CatalogEntry {
                    code: code.to_string(),
                    file: file.clone(),
                    display_name: name.as_str().map(str::to_string),
                };
                Some((entry.code.clone(), entry))
            })
            .collect();
        Self { entries }
    }

    /// Build a catalog from bare codes, using `<code>.json` as file names.
    pub fn from_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = codes
            .into_iter()
            .map(|code| {
                let code = code.into();
                let entry = CatalogEntry {
                    file: format!("{code}{RESOURCE_EXTENSION}"),
                    code: code.clone(),
                    display_name: None,
                };
                (code, entry)
            })
            .collect();
        Self { entries }
    }

    /// Offered codes in sorted order.
    pub fn options(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Whether `code` is offered exactly.
    pub fn contains(&self, code: &str) -> bool {
        self.entries.contains_key(code)
    }

    /// Catalog entry for `code`.
    pub fn entry(&self, code: &str) -> Option<&CatalogEntry> {
        self.entries.get(code)
    }

    /// Resource file for `code`; codes outside the catalog map to `<code>.json`.
    pub fn file_for(&self, code: &str) -> String {
        self.entry(code).map_or_else(
            || format!("{code}{RESOURCE_EXTENSION}"),
            |entry| entry.file.clone(),
        )
    }

    /// Like [`Self::entry`], failing with [`I18nError::UnknownLocale`].
    pub fn require(&self, code: &str) -> I18nResult<&CatalogEntry> {
        self.entry(code).ok_or_else(|| I18nError::UnknownLocale {
            code: code.to_string(),
        })
    }

    /// Map a requested code onto the catalog.
    ///
    /// Tries the exact (normalized) code, then its language subtag, then
    /// substitutes `base` with a warning.
    pub fn negotiate(&self, requested: &str, base: &str) -> Negotiated {
        let normalized = normalize_locale(requested);
        if self.contains(&normalized) {
            return Negotiated {
                code: normalized,
                negotiation: Negotiation::Exact,
            };
        }

        let language = primary_subtag(&normalized);
        if language != normalized && self.contains(&language) {
            debug!("Locale {} not offered, using {}", normalized, language);
            return Negotiated {
                code: language,
                negotiation: Negotiation::PrimarySubtag,
            };
        }

        warn!("Language {} not found, defaulting to {}", requested, base);
        Negotiated {
            code: base.to_string(),
            negotiation: Negotiation::Substituted,
        }
    }
}
