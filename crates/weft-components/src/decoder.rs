//! Turning component specs into nodes

use crate::context::{CollectionId, RenderContext};
use crate::error::ComponentResult;
use crate::media::share_items;
use crate::node::{
    ActionRow, Button, ButtonStyle, ComponentNode, Container, MediaGallery, NodeKind, Select,
    SelectOption, Separator, Spacing, TextDisplay, Unsupported,
};
use crate::spec::{ButtonSpec, ComponentSpec, SelectSpec, SeparatorSpec};
use tracing::debug;

/// An ordered collection of decoded components and its owner
#[derive(Debug, Clone)]
pub struct Components {
    id: CollectionId,
    context: RenderContext,
    nodes: Vec<ComponentNode>,
}

impl Components {
    /// Decode `specs` for `owner`. Never fails: anything undecodable becomes
    /// an unsupported node in place.
    pub fn decode(specs: &[ComponentSpec], owner: RenderContext) -> Self {
        let id = CollectionId::next();
        let nodes = Decoder { owner: id }.decode_all(specs);
        debug!("Decoded {} components into {}", nodes.len(), id);
        Self {
            id,
            context: owner,
            nodes,
        }
    }

    /// Parse a JSON array of components and decode it.
    pub fn from_json(raw: &str, owner: RenderContext) -> ComponentResult<Self> {
        let specs: Vec<ComponentSpec> = serde_json::from_str(raw)?;
        Ok(Self::decode(&specs, owner))
    }

    /// Handle shared by every node of this collection.
    pub const fn id(&self) -> CollectionId {
        self.id
    }

    /// Where the collection lives.
    pub const fn context(&self) -> &RenderContext {
        &self.context
    }

    /// Top-level nodes in input order.
    pub fn nodes(&self) -> &[ComponentNode] {
        &self.nodes
    }

    /// Number of top-level nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether there are no top-level nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every node, depth first.
    pub fn walk(&self) -> impl Iterator<Item = &ComponentNode> {
        self.nodes.iter().flat_map(ComponentNode::walk)
    }

    /// First button with `custom_id`.
    pub fn find_button(&self, custom_id: &str) -> Option<&Button> {
        self.walk()
            .filter_map(ComponentNode::as_button)
            .find(|button| button.custom_id.as_deref() == Some(custom_id))
    }

    /// First select with `custom_id`.
    pub fn find_select(&self, custom_id: &str) -> Option<&Select> {
        self.walk()
            .filter_map(ComponentNode::as_select)
            .find(|select| select.custom_id == custom_id)
    }
}

struct Decoder {
    owner: CollectionId,
}

impl Decoder {
    fn decode_all(&self, specs: &[ComponentSpec]) -> Vec<ComponentNode> {
        specs.iter().map(|spec| self.decode(spec)).collect()
    }

    fn decode(&self, spec: &ComponentSpec) -> ComponentNode {
        let kind = match spec {
            ComponentSpec::ActionRow(row) => NodeKind::ActionRow(ActionRow {
                children: self.decode_all(&row.components),
            }),
            ComponentSpec::Container(container) => NodeKind::Container(Container {
                children: self.decode_all(&container.components),
                accent_color: container.accent_color,
                spoiler: container.spoiler.unwrap_or(false),
            }),
            ComponentSpec::Button(button) => button_kind(button),
            ComponentSpec::StringSelect(select) => NodeKind::Select(select_node(select)),
            ComponentSpec::TextDisplay(text) => NodeKind::TextDisplay(TextDisplay {
                content: text.content.clone(),
            }),
            ComponentSpec::Separator(separator) => NodeKind::Separator(separator_node(separator)),
            ComponentSpec::MediaGallery(gallery) => {
                let (siblings, items) = share_items(&gallery.items);
                NodeKind::MediaGallery(MediaGallery { siblings, items })
            }
            ComponentSpec::Unsupported { tag, .. } => {
                debug!("Unsupported component type {}", tag);
                NodeKind::Unsupported(Unsupported { tag: *tag })
            }
        };
        ComponentNode::new(self.owner, kind)
    }
}

fn button_kind(spec: &ButtonSpec) -> NodeKind {
    let Some(style) = spec.style.and_then(ButtonStyle::from_code) else {
        debug!("Button without a valid style: {:?}", spec.style);
        return NodeKind::Unsupported(Unsupported { tag: 2 });
    };
    NodeKind::Button(Button {
        custom_id: spec.custom_id.clone(),
        label: spec.label.clone(),
        url: spec.url.clone(),
        style,
        disabled: spec.disabled.unwrap_or(false),
    })
}

fn select_node(spec: &SelectSpec) -> Select {
    let max_values = spec.max_values.unwrap_or(1).max(1);
    Select {
        custom_id: spec.custom_id.clone(),
        placeholder: spec.placeholder.clone(),
        options: spec
            .options
            .iter()
            .map(|option| SelectOption {
                label: option.label.clone(),
                value: option.value.clone(),
                description: option.description.clone(),
                default: option.default.unwrap_or(false),
            })
            .collect(),
        min_values: spec.min_values.unwrap_or(1).min(max_values),
        max_values,
        disabled: spec.disabled.unwrap_or(false),
    }
}

fn separator_node(spec: &SeparatorSpec) -> Separator {
    Separator {
        divider: spec.divider.unwrap_or(true),
        spacing: match spec.spacing.unwrap_or(1) {
            1 => Spacing::Small,
            _ => Spacing::Large,
        },
    }
}
