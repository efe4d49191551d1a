//! Key resolution against a primary tree and its fallback

use crate::error::{I18nError, I18nResult};
use crate::template::expand;
use crate::tree::LocaleTree;
use std::sync::Arc;
use tracing::{error, warn};

/// The trees of one committed locale: the locale's own tree first, then
/// the base language tree when the locale is not the base language.
#[derive(Debug, Clone)]
pub struct ResolvedLocale {
    code: String,
    primary: Arc<LocaleTree>,
    fallback: Option<Arc<LocaleTree>>,
}

impl ResolvedLocale {
    /// Pair a primary tree with an optional fallback.
    pub fn new(
        code: impl Into<String>,
        primary: Arc<LocaleTree>,
        fallback: Option<Arc<LocaleTree>>,
    ) -> Self {
        Self {
            code: code.into(),
            primary,
            fallback,
        }
    }

    /// Negotiated locale code.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The locale's own tree.
    pub fn primary(&self) -> &LocaleTree {
        &self.primary
    }

    /// The base language tree, when distinct from the primary.
    pub fn fallback(&self) -> Option<&LocaleTree> {
        self.fallback.as_deref()
    }

    /// The tree that defines the message shape: the fallback if present,
    /// otherwise the primary (which then is the base language).
    pub fn base_tree(&self) -> &LocaleTree {
        self.fallback().unwrap_or_else(|| self.primary())
    }

    fn trees(&self) -> impl Iterator<Item = &LocaleTree> {
        std::iter::once(self.primary()).chain(self.fallback())
    }

    /// The raw template for `key` from the first tree that has it.
    pub fn template(&self, key: &str) -> Option<&str> {
        self.trees().find_map(|tree| tree.lookup(key))
    }

    /// Whether any tree can resolve `key`.
    pub fn has_message(&self, key: &str) -> bool {
        self.template(key).is_some()
    }

    /// Resolve `key` and expand it with positional `args`.
    pub fn resolve(&self, key: &str, args: &[&str]) -> I18nResult<String> {
        self.template(key)
            .map(|template| expand(template, args))
            .ok_or_else(|| I18nError::not_found(key))
    }

    /// Resolve `key`, returning `default` when it is missing.
    pub fn resolve_or_default(&self, key: &str, args: &[&str], default: &str) -> String {
        self.resolve(key, args).unwrap_or_else(|_| {
            warn!("Message '{}' not found in locale {}, using default", key, self.code);
            default.to_string()
        })
    }
}

/// A displayed string bound to a message key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSlot {
    /// Dotted message key
    pub key: String,
    /// Positional arguments
    pub args: Vec<String>,
    /// Text currently shown, if any
    pub text: Option<String>,
}

impl TextSlot {
    /// A slot with no arguments and nothing shown yet.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            args: Vec::new(),
            text: None,
        }
    }

    /// Append a positional argument.
    #[must_use]
    pub fn arg(mut self, value: impl Into<String>) -> Self {
        self.args.push(value.into());
        self
    }
}

/// Re-resolve every slot against `locale`.
///
/// Slots whose key cannot be resolved keep their current text; each such
/// failure is logged. Returns how many slots were left untouched.
pub fn translate_slots(locale: &ResolvedLocale, slots: &mut [TextSlot]) -> usize {
    let mut failed = 0;
    for slot in slots.iter_mut() {
        let args: Vec<&str> = slot.args.iter().map(String::as_str).collect();
        match locale.resolve(&slot.key, &args) {
            Ok(text) => slot.text = Some(text),
            Err(e) => {
                error!("Couldn't get {}'s translation: {}", slot.key, e);
                failed += 1;
            }
        }
    }
    failed
}
