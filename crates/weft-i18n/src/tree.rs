//! Locale trees: nested string-keyed maps of translation templates

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Key holding resource metadata (`{"@metadata": {"locale": "en"}}`).
pub const METADATA_KEY: &str = "@metadata";

/// One value inside a locale tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocaleNode {
    /// Template leaf
    Text(String),
    /// Nested section
    Branch(BTreeMap<String, LocaleNode>),
    /// Any other JSON value; kept but never resolvable
    Other(serde_json::Value),
}

/// A parsed locale resource
///
/// Trees are immutable once loaded; the manager shares them behind `Arc`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocaleTree {
    root: BTreeMap<String, LocaleNode>,
}

impl LocaleTree {
    /// Parse a tree from JSON text; the top level must be an object.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Build a tree from an already parsed JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Walk a dotted path and return the template at its end.
    ///
    /// Returns `None` when a segment is missing, when a string or other
    /// non-section value is met before the last segment, or when the path
    /// ends on a section.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        let mut segments = key.split('.');
        let mut node = self.root.get(segments.next()?)?;

        for segment in segments {
            match node {
                LocaleNode::Branch(children) => node = children.get(segment)?,
                LocaleNode::Text(_) | LocaleNode::Other(_) => return None,
            }
        }

        match node {
            LocaleNode::Text(text) => Some(text),
            LocaleNode::Branch(_) | LocaleNode::Other(_) => None,
        }
    }

    /// `@metadata.locale`, when the resource declares it.
    pub fn metadata_locale(&self) -> Option<&str> {
        match self.root.get(METADATA_KEY)? {
            LocaleNode::Branch(meta) => match meta.get("locale")? {
                LocaleNode::Text(locale) => Some(locale),
                _ => None,
            },
            _ => None,
        }
    }

    /// Dotted paths of every template leaf, in key order.
    ///
    /// Top-level keys starting with `@` are metadata and are skipped.
    pub fn leaf_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        for (key, node) in self.root.iter().filter(|(key, _)| !key.starts_with('@')) {
            collect_leaves(key.clone(), node, &mut paths);
        }
        paths
    }

    /// Number of top-level entries.
    pub fn len(&self) -> usize {
        self.root.len()
    }

    /// Whether the tree has no entries at all.
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}

fn collect_leaves(path: String, node: &LocaleNode, out: &mut Vec<String>) {
    match node {
        LocaleNode::Text(_) => out.push(path),
        LocaleNode::Branch(children) => {
            for (key, child) in children {
                collect_leaves(format!("{path}.{key}"), child, out);
            }
        }
        LocaleNode::Other(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> LocaleTree {
        LocaleTree::from_json(
            r#"{
                "@metadata": { "locale": "en", "revision": 3 },
                "title": "Weft",
                "count": 12,
                "menu": { "open": "Open", "recent": { "clear": "Clear recent" }, "flags": [1, 2] }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_lookup_walks_sections() {
        let tree = tree();
        assert_eq!(tree.lookup("title"), Some("Weft"));
        assert_eq!(tree.lookup("menu.recent.clear"), Some("Clear recent"));
    }

    #[test]
    fn test_lookup_rejects_partial_and_non_text_paths() {
        let tree = tree();
        assert_eq!(tree.lookup("menu"), None);
        assert_eq!(tree.lookup("title.more"), None);
        assert_eq!(tree.lookup("count"), None);
        assert_eq!(tree.lookup("count.deeper"), None);
        assert_eq!(tree.lookup("menu.flags.0"), None);
        assert_eq!(tree.lookup("menu.missing"), None);
        assert_eq!(tree.lookup(""), None);
    }

    #[test]
    fn test_metadata_and_leaf_paths() {
        let tree = tree();
        assert_eq!(tree.metadata_locale(), Some("en"));
        assert_eq!(
            tree.leaf_paths(),
            vec!["menu.open", "menu.recent.clear", "title"]
        );
    }

    #[test]
    fn test_top_level_must_be_an_object() {
        assert!(LocaleTree::from_json("[1, 2, 3]").is_err());
        assert!(LocaleTree::from_json("{}").unwrap().is_empty());
    }
}
