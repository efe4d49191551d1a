//! # Weft Components
//!
//! Message components for Weft: the tagged component payloads of the chat
//! API, the node tree they decode into, a markup-neutral renderer, and the
//! interaction requests that buttons and selects fire.
//!
//! Decoding is total. Unknown or malformed components become
//! [`NodeKind::Unsupported`] placeholders next to their decoded siblings.
//!
//! ```rust
//! use weft_common::ChannelId;
//! use weft_components::{Components, RenderContext};
//!
//! let raw = r#"[{"type": 10, "content": "hi"}, {"type": 9999}]"#;
//! let components = Components::from_json(raw, RenderContext::channel(None, ChannelId(1))).unwrap();
//! assert_eq!(components.len(), 2);
//! assert!(components.nodes()[1].is_unsupported());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod context;
pub mod decoder;
pub mod error;
pub mod interaction;
pub mod media;
pub mod node;
pub mod render;
pub mod spec;

pub use context::{CollectionId, MessageContext, RenderContext};
pub use decoder::Components;
pub use error::{ComponentError, ComponentResult};
pub use interaction::{
    HttpInteractionSink, InteractionData, InteractionDispatcher, InteractionRequest,
    InteractionSink, NonceTracker, MAX_PENDING_NONCES,
};
pub use media::{MediaAttachment, MediaRef, SiblingList};
pub use node::{
    ActionRow, Button, ButtonAction, ButtonStyle, ComponentNode, Container, MediaGallery,
    NodeKind, Select, SelectOption, Separator, Spacing, TextDisplay, Unsupported,
};
pub use render::{Element, Render, RenderEnv};
pub use spec::{ComponentKind, ComponentSpec};
