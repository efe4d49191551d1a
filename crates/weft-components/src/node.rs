//! Decoded component nodes

use crate::context::CollectionId;
use crate::media::{MediaRef, SiblingList};
use crate::spec::KNOWN_TAGS;
use serde::Serialize;

/// Button appearance, codes 1 to 6
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ButtonStyle {
    /// Blurple call to action
    Primary,
    /// Grey
    Secondary,
    /// Green
    Success,
    /// Red
    Danger,
    /// Opens a URL
    Link,
    /// Purchases an SKU
    Premium,
}

impl ButtonStyle {
    /// Map a wire code to a style.
    pub const fn from_code(code: i64) -> Option<Self> {
        Some(match code {
            1 => Self::Primary,
            2 => Self::Secondary,
            3 => Self::Success,
            4 => Self::Danger,
            5 => Self::Link,
            6 => Self::Premium,
            _ => return None,
        })
    }

    /// CSS class of the style.
    pub const fn class(self) -> &'static str {
        match self {
            Self::Primary => "buttonPrimary",
            Self::Secondary => "buttonSecondary",
            Self::Success => "buttonSuccess",
            Self::Danger => "buttonDanger",
            Self::Link => "buttonLink",
            Self::Premium => "buttonPremium",
        }
    }
}

/// What activating a button does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction<'a> {
    /// Nothing
    Disabled,
    /// Open the URL
    OpenLink(&'a str),
    /// Send an interaction with this custom id
    Interact(&'a str),
}

/// `type: 2`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    /// Developer id sent back on click
    pub custom_id: Option<String>,
    /// Visible text
    pub label: Option<String>,
    /// Target of link buttons
    pub url: Option<String>,
    /// Appearance
    pub style: ButtonStyle,
    /// Greyed out
    pub disabled: bool,
}

impl Button {
    /// Resolve what a click does. A URL takes precedence over a custom id;
    /// a button with neither does nothing.
    pub fn action(&self) -> ButtonAction<'_> {
        if self.disabled {
            return ButtonAction::Disabled;
        }
        match (self.url.as_deref(), self.custom_id.as_deref()) {
            (Some(url), _) => ButtonAction::OpenLink(url),
            (None, Some(custom_id)) => ButtonAction::Interact(custom_id),
            (None, None) => ButtonAction::Disabled,
        }
    }
}

/// One choice of a select
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    /// Visible text
    pub label: String,
    /// Value sent back when chosen
    pub value: String,
    /// Secondary text
    pub description: Option<String>,
    /// Pre-selected
    pub default: bool,
}

/// `type: 3`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Select {
    /// Developer id sent back on submit
    pub custom_id: String,
    /// Text shown when nothing is chosen
    pub placeholder: Option<String>,
    /// Choices
    pub options: Vec<SelectOption>,
    /// Fewest values to choose
    pub min_values: u32,
    /// Most values to choose, at least 1
    pub max_values: u32,
    /// Greyed out
    pub disabled: bool,
}

impl Select {
    /// Values of the pre-selected options.
    pub fn default_values(&self) -> Vec<&str> {
        self.options
            .iter()
            .filter(|option| option.default)
            .map(|option| option.value.as_str())
            .collect()
    }
}

/// `type: 1`
#[derive(Debug, Clone)]
pub struct ActionRow {
    /// Children in input order
    pub children: Vec<ComponentNode>,
}

/// `type: 17`
#[derive(Debug, Clone)]
pub struct Container {
    /// Children in input order
    pub children: Vec<ComponentNode>,
    /// RGB accent colour
    pub accent_color: Option<u32>,
    /// Hidden until revealed
    pub spoiler: bool,
}

/// `type: 10`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDisplay {
    /// Markdown source
    pub content: String,
}

/// Separator height
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Spacing {
    /// `spacing: 1`
    Small,
    /// Any other value
    Large,
}

/// `type: 14`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Separator {
    /// Draw a line
    pub divider: bool,
    /// Height
    pub spacing: Spacing,
}

/// `type: 12`
#[derive(Debug, Clone)]
pub struct MediaGallery {
    /// Shared item list
    pub siblings: SiblingList,
    /// One ref per item, in input order
    pub items: Vec<MediaRef>,
}

/// Placeholder for anything that could not be decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unsupported {
    /// Raw `type` tag
    pub tag: i64,
}

impl Unsupported {
    /// Whether the tag is a documented component type this crate lacks,
    /// as opposed to a value outside the documented range.
    pub fn is_known_tag(&self) -> bool {
        KNOWN_TAGS.contains(&self.tag)
    }
}

/// Variant payload of a [`ComponentNode`]
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Horizontal row
    ActionRow(ActionRow),
    /// Button
    Button(Button),
    /// String select
    Select(Select),
    /// Accent-coloured group
    Container(Container),
    /// Markdown text
    TextDisplay(TextDisplay),
    /// Spacing or divider
    Separator(Separator),
    /// Media grid
    MediaGallery(MediaGallery),
    /// Placeholder
    Unsupported(Unsupported),
}

/// A decoded component and the collection it belongs to
#[derive(Debug, Clone)]
pub struct ComponentNode {
    owner: CollectionId,
    kind: NodeKind,
}

impl ComponentNode {
    pub(crate) const fn new(owner: CollectionId, kind: NodeKind) -> Self {
        Self { owner, kind }
    }

    /// Collection this node was decoded into.
    pub const fn owner(&self) -> CollectionId {
        self.owner
    }

    /// Variant payload.
    pub const fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Children of rows and containers; empty for leaves.
    pub fn children(&self) -> &[Self] {
        match &self.kind {
            NodeKind::ActionRow(row) => &row.children,
            NodeKind::Container(container) => &container.children,
            _ => &[],
        }
    }

    /// Wire tag of the node.
    pub const fn tag(&self) -> i64 {
        match &self.kind {
            NodeKind::ActionRow(_) => 1,
            NodeKind::Button(_) => 2,
            NodeKind::Select(_) => 3,
            NodeKind::Container(_) => 17,
            NodeKind::TextDisplay(_) => 10,
            NodeKind::Separator(_) => 14,
            NodeKind::MediaGallery(_) => 12,
            NodeKind::Unsupported(unsupported) => unsupported.tag,
        }
    }

    /// Whether this is a placeholder.
    pub const fn is_unsupported(&self) -> bool {
        matches!(self.kind, NodeKind::Unsupported(_))
    }

    /// The button payload, if this is a button.
    pub const fn as_button(&self) -> Option<&Button> {
        match &self.kind {
            NodeKind::Button(button) => Some(button),
            _ => None,
        }
    }

    /// The select payload, if this is a select.
    pub const fn as_select(&self) -> Option<&Select> {
        match &self.kind {
            NodeKind::Select(select) => Some(select),
            _ => None,
        }
    }

    /// Depth-first walk over this node and its descendants.
    pub fn walk(&self) -> Vec<&Self> {
        let mut out = vec![self];
        for child in self.children() {
            out.extend(child.walk());
        }
        out
    }
}
