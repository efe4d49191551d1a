//! Rendering decoded components into a markup-neutral element tree
//!
//! The element tree carries tag names, classes, inline styles, attributes,
//! and text. Turning it into pixels is left to whoever consumes it.

use crate::decoder::Components;
use crate::media::MediaRef;
use crate::node::{
    ActionRow, Button, ButtonAction, ComponentNode, Container, MediaGallery, NodeKind, Select,
    Separator, Spacing, TextDisplay, Unsupported,
};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::error;
use weft_common::format_hex_color;
use weft_i18n::Messages;

/// Gallery rows as item ranges; items past the last row are not shown.
const GALLERY_ROWS: [(usize, usize); 3] = [(0, 2), (2, 5), (5, 10)];

/// Message key for documented component types without a renderer.
const NOT_IMPLEMENTED_KEY: &str = "interactions.notImpl";
/// Message key for tags outside the documented range.
const NONSENSE_KEY: &str = "interactions.nonsence";

/// One node of rendered output
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Element {
    /// Tag name
    pub tag: String,
    /// CSS classes in insertion order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    /// Inline style properties
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub style: BTreeMap<String, String>,
    /// Attributes
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    /// Text content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Child elements
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Element>,
}

impl Element {
    /// An empty element.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Add a class.
    #[must_use]
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Set an inline style property.
    #[must_use]
    pub fn style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.insert(property.into(), value.into());
        self
    }

    /// Set an attribute.
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Set the text content.
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Append children.
    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = Self>) -> Self {
        self.children.extend(children);
        self
    }

    /// Whether the element has `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// What rendering may consult
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderEnv<'a> {
    messages: Option<&'a Messages>,
}

impl<'a> RenderEnv<'a> {
    /// Render with translated placeholder labels.
    pub const fn new(messages: &'a Messages) -> Self {
        Self {
            messages: Some(messages),
        }
    }

    /// Render without a locale; placeholders get no text.
    pub const fn untranslated() -> Self {
        Self { messages: None }
    }

    fn translate(&self, key: &str, args: &[&str]) -> Option<String> {
        let messages = self.messages?;
        match messages.call(key, args) {
            Ok(text) => Some(text),
            Err(e) => {
                error!("Couldn't get {}'s translation: {}", key, e);
                None
            }
        }
    }
}

/// Produce an element tree
pub trait Render {
    /// Render `self` in `env`.
    fn render(&self, env: &RenderEnv<'_>) -> Element;
}

fn render_all<'n>(
    nodes: impl IntoIterator<Item = &'n ComponentNode>,
    env: &RenderEnv<'_>,
) -> Vec<Element> {
    nodes.into_iter().map(|node| node.render(env)).collect()
}

impl Render for Components {
    fn render(&self, env: &RenderEnv<'_>) -> Element {
        Element::new("div")
            .class("flexttb")
            .children(render_all(self.nodes(), env))
    }
}

impl Render for ComponentNode {
    fn render(&self, env: &RenderEnv<'_>) -> Element {
        match self.kind() {
            NodeKind::ActionRow(row) => row.render(env),
            NodeKind::Button(button) => button.render(env),
            NodeKind::Select(select) => select.render(env),
            NodeKind::Container(container) => container.render(env),
            NodeKind::TextDisplay(text) => text.render(env),
            NodeKind::Separator(separator) => separator.render(env),
            NodeKind::MediaGallery(gallery) => gallery.render(env),
            NodeKind::Unsupported(unsupported) => unsupported.render(env),
        }
    }
}

impl Render for ActionRow {
    fn render(&self, env: &RenderEnv<'_>) -> Element {
        Element::new("div")
            .class("flexltr")
            .children(render_all(&self.children, env))
    }
}

impl Render for Container {
    fn render(&self, env: &RenderEnv<'_>) -> Element {
        let mut element = Element::new("div").class("flexttb").class("displayComp");
        if let Some(color) = self.accent_color {
            element = element.style("--accent-color", format_hex_color(color));
        }
        element.children(render_all(&self.children, env))
    }
}

impl Render for Button {
    fn render(&self, _env: &RenderEnv<'_>) -> Element {
        let mut element = Element::new("button")
            .class(self.style.class())
            .class("interButton");
        if let Some(label) = &self.label {
            element = element.text(label.clone());
        }
        match self.action() {
            ButtonAction::Disabled => {}
            ButtonAction::OpenLink(url) => element = element.attr("href", url),
            ButtonAction::Interact(custom_id) => element = element.attr("data-custom-id", custom_id),
        }
        if self.disabled {
            element = element.attr("disabled", "true");
        }
        element
    }
}

impl Render for Select {
    fn render(&self, _env: &RenderEnv<'_>) -> Element {
        let mut element = Element::new("select")
            .class("fancySelect")
            .attr("data-custom-id", self.custom_id.clone())
            .attr("data-min", self.min_values.to_string())
            .attr("data-max", self.max_values.to_string());
        if self.max_values > 1 {
            element = element.attr("multiple", "true");
        }
        if let Some(placeholder) = &self.placeholder {
            element = element.attr("placeholder", placeholder.clone());
        }
        if self.disabled {
            element = element.attr("disabled", "true");
        }

        element.children(self.options.iter().map(|option| {
            let mut item = Element::new("option")
                .attr("value", option.value.clone())
                .text(option.label.clone());
            if let Some(description) = &option.description {
                item = item.attr("title", description.clone());
            }
            if option.default {
                item = item.attr("selected", "true");
            }
            item
        }))
    }
}

impl Render for TextDisplay {
    fn render(&self, _env: &RenderEnv<'_>) -> Element {
        Element::new("div").class("markdown").text(self.content.clone())
    }
}

impl Render for Separator {
    fn render(&self, _env: &RenderEnv<'_>) -> Element {
        match (self.divider, self.spacing) {
            (true, Spacing::Small) => Element::new("hr").style("margin", "4px"),
            (true, Spacing::Large) => Element::new("hr").style("margin", "8px"),
            (false, Spacing::Small) => Element::new("span").style("height", "16px"),
            (false, Spacing::Large) => Element::new("span").style("height", "32px"),
        }
    }
}

impl Render for MediaRef {
    fn render(&self, _env: &RenderEnv<'_>) -> Element {
        let Some(media) = self.attachment() else {
            return Element::new("img");
        };
        let mut element = Element::new("img").attr("src", media.url);
        if let Some(description) = media.description {
            element = element.attr("alt", description);
        }
        if media.spoiler {
            element = element.class("spoiler");
        }
        element
    }
}

impl Render for MediaGallery {
    fn render(&self, env: &RenderEnv<'_>) -> Element {
        let rows = GALLERY_ROWS
            .iter()
            .filter(|(start, _)| *start == 0 || self.items.len() > *start)
            .map(|&(start, end)| {
                let end = end.min(self.items.len());
                let start = start.min(end);
                Element::new("div")
                    .class("flexltr")
                    .children(self.items[start..end].iter().map(|item| item.render(env)))
            });

        Element::new("div")
            .class("flexttb")
            .class("mediaDisp")
            .children(rows)
    }
}

impl Render for Unsupported {
    fn render(&self, env: &RenderEnv<'_>) -> Element {
        let key = if self.is_known_tag() {
            NOT_IMPLEMENTED_KEY
        } else {
            NONSENSE_KEY
        };
        let tag = self.tag.to_string();

        let element = Element::new("span").class("unsupportedComponent");
        match env.translate(key, &[&tag]) {
            Some(text) => element.text(text),
            None => element,
        }
    }
}
