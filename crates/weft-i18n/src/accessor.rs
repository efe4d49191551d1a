//! Message accessor shaped like the base language tree
//!
//! Every committed locale gets a [`Messages`] value. Its table is a
//! registration pass over the base tree's leaf paths, so the set of callable
//! paths is fixed by the base language while each call resolves in the
//! current locale (falling back to the base tree per key).

use crate::error::{I18nError, I18nResult};
use crate::resolver::ResolvedLocale;
use crate::tree::LocaleTree;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Dotted paths registered from a base tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageTable {
    paths: BTreeSet<String>,
}

impl MessageTable {
    /// Register every leaf path of `tree`.
    pub fn from_tree(tree: &LocaleTree) -> Self {
        Self {
            paths: tree.leaf_paths().into_iter().collect(),
        }
    }

    /// Whether `path` was registered.
    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    /// Number of registered paths.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether nothing was registered.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Accessor over one committed locale
#[derive(Debug, Clone)]
pub struct Messages {
    table: Arc<MessageTable>,
    locale: Arc<ResolvedLocale>,
}

impl Messages {
    /// Build the accessor for `locale`, registering its base tree.
    pub fn new(locale: Arc<ResolvedLocale>) -> Self {
        let table = Arc::new(MessageTable::from_tree(locale.base_tree()));
        Self { table, locale }
    }

    /// Callable for `path`, if the base tree has it.
    pub fn get(&self, path: &str) -> Option<Message<'_>> {
        self.table.paths.get(path).map(|path| Message {
            path,
            locale: &self.locale,
        })
    }

    /// Resolve `path` with `args`; paths outside the table are not found.
    pub fn call(&self, path: &str, args: &[&str]) -> I18nResult<String> {
        self.get(path)
            .map(|message| message.call(args))
            .ok_or_else(|| I18nError::not_found(path))
    }

    /// View of the paths below `prefix` (`interactions` -> `interactions.*`).
    pub fn scope(&self, prefix: &str) -> Scope<'_> {
        Scope {
            messages: self,
            prefix: prefix.to_string(),
        }
    }

    /// Registered paths in key order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.table.paths.iter().map(String::as_str)
    }

    /// The registration table.
    pub fn table(&self) -> &MessageTable {
        &self.table
    }

    /// The locale calls resolve in.
    pub fn locale(&self) -> &ResolvedLocale {
        &self.locale
    }
}

/// One registered path bound to the current locale
#[derive(Debug, Clone, Copy)]
pub struct Message<'a> {
    path: &'a str,
    locale: &'a ResolvedLocale,
}

impl Message<'_> {
    /// Resolve this path with positional `args`.
    pub fn call(&self, args: &[&str]) -> String {
        // Registered paths always exist in the base tree.
        self.locale
            .resolve(self.path, args)
            .unwrap_or_else(|_| self.path.to_string())
    }

    /// Dotted path of the message.
    pub fn path(&self) -> &str {
        self.path
    }
}

/// Paths below a common prefix
#[derive(Debug, Clone)]
pub struct Scope<'a> {
    messages: &'a Messages,
    prefix: String,
}

impl<'a> Scope<'a> {
    fn full_path(&self, path: &str) -> String {
        format!("{}.{}", self.prefix, path)
    }

    /// Callable for `prefix.path`.
    pub fn get(&self, path: &str) -> Option<Message<'a>> {
        self.messages.get(&self.full_path(path))
    }

    /// Resolve `prefix.path` with `args`.
    pub fn call(&self, path: &str, args: &[&str]) -> I18nResult<String> {
        self.messages.call(&self.full_path(path), args)
    }

    /// Nested scope `prefix.path`.
    pub fn scope(&self, path: &str) -> Self {
        Self {
            messages: self.messages,
            prefix: self.full_path(path),
        }
    }
}

/// Resolve a message through a [`Messages`] accessor with positional
/// arguments of any `ToString` type.
///
/// ```rust
/// # use std::sync::Arc;
/// # use weft_i18n::{tr, LocaleTree, Messages, ResolvedLocale};
/// let tree = LocaleTree::from_json(r#"{"count": "$1 {{PLURAL:$1|item|items}}"}"#).unwrap();
/// let messages = Messages::new(Arc::new(ResolvedLocale::new("en", Arc::new(tree), None)));
/// assert_eq!(tr!(messages, "count", 3).unwrap(), "3 items");
/// ```
#[macro_export]
macro_rules! tr {
    ($messages:expr, $key:expr $(,)?) => {
        $messages.call($key, &[])
    };
    ($messages:expr, $key:expr, $($arg:expr),+ $(,)?) => {{
        let owned: ::std::vec::Vec<::std::string::String> =
            ::std::vec![$(::std::string::ToString::to_string(&$arg)),+];
        let args: ::std::vec::Vec<&str> = owned.iter().map(::std::string::String::as_str).collect();
        $messages.call($key, &args)
    }};
}
