//! Test utilities and shared test helpers for Weft.
//!
//! This module provides common testing utilities, fixtures, and helper functions
//! that can be used across all crates in the workspace for unit and integration testing.

use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize test logging once per test run.
static INIT: Once = Once::new();

/// Initialize logging for tests with a sensible default configuration.
/// This function is safe to call multiple times and will only initialize once.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// Locale resources shared by the i18n and component tests.
pub mod locale_fixtures {
    /// Base language tree.
    pub const EN_JSON: &str = r#"{
  "@metadata": { "locale": "en", "authors": ["weft"] },
  "greeting": "Hello, $1!",
  "onlyEnglish": "Only in English",
  "interactions": {
    "notImpl": "This component ($1) is not implemented yet",
    "nonsence": "Component type $1 does not exist"
  },
  "messages": {
    "replyCount": "$1 {{PLURAL:$1|reply|replies}}",
    "typing": "{{GENDER:$1|He|She|They}} is typing"
  },
  "settings": { "language": "Language" }
}"#;

    /// French tree: same shape as the base minus `onlyEnglish`, plus one extra key.
    pub const FR_JSON: &str = r#"{
  "@metadata": { "locale": "fr" },
  "greeting": "Bonjour, $1 !",
  "frenchOnly": "Seulement en français",
  "interactions": {
    "notImpl": "Ce composant ($1) n'est pas encore pris en charge",
    "nonsence": "Le type de composant $1 n'existe pas"
  },
  "messages": {
    "replyCount": "$1 {{PLURAL:$1|réponse|réponses}}",
    "typing": "{{GENDER:$1|Il|Elle|Iel}} écrit"
  },
  "settings": { "language": "Langue" }
}"#;

    /// Catalog index mapping resource files to display names.
    pub const LANGS_JSON: &str = r#"{ "en.json": "English", "fr.json": "Français" }"#;
}

/// Component payloads as the chat API delivers them.
pub mod component_fixtures {
    /// A message with a container, an action row, a gallery, and one bogus component.
    pub const MESSAGE_COMPONENTS_JSON: &str = r#"[
  {
    "type": 17,
    "accent_color": 703487,
    "components": [
      { "type": 10, "content": "**Release notes**" },
      { "type": 14, "divider": false, "spacing": 2 },
      {
        "type": 12,
        "items": [
          { "media": { "url": "https://cdn.example/a.png" }, "description": "first" },
          { "media": { "url": "https://cdn.example/b.png" }, "spoiler": true },
          { "media": { "url": "https://cdn.example/c.png" } }
        ]
      }
    ]
  },
  {
    "type": 1,
    "components": [
      { "type": 2, "style": 1, "label": "Accept", "custom_id": "accept" },
      { "type": 2, "style": 5, "label": "Docs", "url": "https://docs.example" },
      { "type": 2, "style": 4, "label": "Delete", "custom_id": "delete", "disabled": true }
    ]
  },
  {
    "type": 3,
    "custom_id": "colour",
    "placeholder": "Pick colours",
    "min_values": 1,
    "max_values": 2,
    "options": [
      { "label": "Red", "value": "red" },
      { "label": "Green", "value": "green", "default": true },
      { "label": "Blue", "value": "blue", "description": "cool" }
    ]
  },
  { "type": 9999, "whatever": true }
]"#;
}

/// Property-based testing utilities using proptest.
#[cfg(feature = "proptest")]
pub mod property_testing {
    use proptest::prelude::*;

    /// Strategy for template text free of placeholder syntax.
    pub fn plain_text_strategy() -> impl Strategy<Value = String> {
        r"[a-zA-Z0-9 ,.!?]{0,40}".prop_map(|s| s)
    }

    /// Strategy for positional argument lists.
    pub fn args_strategy() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec(r"[a-z0-9]{0,8}", 0..6)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_multiple_calls() {
        init_test_logging();
        init_test_logging();
    }

    #[test]
    fn test_fixtures_are_valid_json() {
        for raw in [
            locale_fixtures::EN_JSON,
            locale_fixtures::FR_JSON,
            locale_fixtures::LANGS_JSON,
            component_fixtures::MESSAGE_COMPONENTS_JSON,
        ] {
            assert!(serde_json::from_str::<serde_json::Value>(raw).is_ok());
        }
    }
}
