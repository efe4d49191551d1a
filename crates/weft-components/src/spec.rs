//! Component payloads as delivered by the chat API
//!
//! [`ComponentSpec`] deserialization never fails for a JSON object: an
//! unknown `type`, or a known one whose payload does not match its shape,
//! becomes [`ComponentSpec::Unsupported`] carrying the raw tag.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::ops::RangeInclusive;
use tracing::warn;

/// Tags the chat API documents for message components.
pub const KNOWN_TAGS: RangeInclusive<i64> = 1..=20;

/// Component type codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// Row of buttons or a select
    ActionRow,
    /// Clickable button
    Button,
    /// Select menu over string options
    StringSelect,
    /// Text input (modals only)
    TextInput,
    /// User select
    UserSelect,
    /// Role select
    RoleSelect,
    /// Mentionable select
    MentionableSelect,
    /// Channel select
    ChannelSelect,
    /// Text beside an accessory
    Section,
    /// Markdown text block
    TextDisplay,
    /// Small image accessory
    Thumbnail,
    /// Grid of media items
    MediaGallery,
    /// Attached file
    File,
    /// Vertical spacing, optionally with a divider line
    Separator,
    /// Boxed group of components with an accent colour
    Container,
    /// Label around a modal component
    Label,
    /// File upload (modals only)
    FileUpload,
}

impl ComponentKind {
    /// Map a wire code to a kind.
    pub const fn from_code(code: i64) -> Option<Self> {
        Some(match code {
            1 => Self::ActionRow,
            2 => Self::Button,
            3 => Self::StringSelect,
            4 => Self::TextInput,
            5 => Self::UserSelect,
            6 => Self::RoleSelect,
            7 => Self::MentionableSelect,
            8 => Self::ChannelSelect,
            9 => Self::Section,
            10 => Self::TextDisplay,
            11 => Self::Thumbnail,
            12 => Self::MediaGallery,
            13 => Self::File,
            14 => Self::Separator,
            17 => Self::Container,
            18 => Self::Label,
            19 => Self::FileUpload,
            _ => return None,
        })
    }

    /// Wire code of this kind.
    pub const fn code(self) -> i64 {
        match self {
            Self::ActionRow => 1,
            Self::Button => 2,
            Self::StringSelect => 3,
            Self::TextInput => 4,
            Self::UserSelect => 5,
            Self::RoleSelect => 6,
            Self::MentionableSelect => 7,
            Self::ChannelSelect => 8,
            Self::Section => 9,
            Self::TextDisplay => 10,
            Self::Thumbnail => 11,
            Self::MediaGallery => 12,
            Self::File => 13,
            Self::Separator => 14,
            Self::Container => 17,
            Self::Label => 18,
            Self::FileUpload => 19,
        }
    }
}

/// `type: 1`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ActionRowSpec {
    /// Nested components
    #[serde(default)]
    pub components: Vec<ComponentSpec>,
}

/// `type: 2`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ButtonSpec {
    /// Style code, 1 to 6
    #[serde(default)]
    pub style: Option<i64>,
    /// Visible text
    #[serde(default)]
    pub label: Option<String>,
    /// Developer id sent back on click
    #[serde(default)]
    pub custom_id: Option<String>,
    /// Target of link buttons
    #[serde(default)]
    pub url: Option<String>,
    /// Greyed out
    #[serde(default)]
    pub disabled: Option<bool>,
}

/// One choice of a select
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SelectOptionSpec {
    /// Visible text
    pub label: String,
    /// Value sent back when chosen
    pub value: String,
    /// Secondary text
    #[serde(default)]
    pub description: Option<String>,
    /// Pre-selected
    #[serde(default)]
    pub default: Option<bool>,
}

/// `type: 3`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SelectSpec {
    /// Developer id sent back on submit
    pub custom_id: String,
    /// Choices
    #[serde(default)]
    pub options: Vec<SelectOptionSpec>,
    /// Text shown when nothing is chosen
    #[serde(default)]
    pub placeholder: Option<String>,
    /// Fewest values to choose
    #[serde(default)]
    pub min_values: Option<u32>,
    /// Most values to choose
    #[serde(default)]
    pub max_values: Option<u32>,
    /// Greyed out
    #[serde(default)]
    pub disabled: Option<bool>,
}

/// `type: 17`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ContainerSpec {
    /// Nested components
    #[serde(default)]
    pub components: Vec<ComponentSpec>,
    /// RGB accent colour
    #[serde(default)]
    pub accent_color: Option<u32>,
    /// Hidden until revealed
    #[serde(default)]
    pub spoiler: Option<bool>,
}

/// `type: 10`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TextDisplaySpec {
    /// Markdown source
    pub content: String,
}

/// `type: 14`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SeparatorSpec {
    /// Draw a line
    #[serde(default)]
    pub divider: Option<bool>,
    /// 1 for small, 2 for large
    #[serde(default)]
    pub spacing: Option<i64>,
}

/// Media referenced by a gallery item
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UnfurledMediaSpec {
    /// Source URL
    pub url: String,
    /// CDN proxy URL
    #[serde(default)]
    pub proxy_url: Option<String>,
    /// Pixel width
    #[serde(default)]
    pub width: Option<u32>,
    /// Pixel height
    #[serde(default)]
    pub height: Option<u32>,
    /// MIME type
    #[serde(default)]
    pub content_type: Option<String>,
}

/// One gallery entry
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GalleryItemSpec {
    /// The media
    pub media: UnfurledMediaSpec,
    /// Alt text
    #[serde(default)]
    pub description: Option<String>,
    /// Hidden until revealed
    #[serde(default)]
    pub spoiler: Option<bool>,
}

/// `type: 12`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MediaGallerySpec {
    /// Entries in display order
    #[serde(default)]
    pub items: Vec<GalleryItemSpec>,
}

/// A component as received
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentSpec {
    /// `type: 1`
    ActionRow(ActionRowSpec),
    /// `type: 2`
    Button(ButtonSpec),
    /// `type: 3`
    StringSelect(SelectSpec),
    /// `type: 17`
    Container(ContainerSpec),
    /// `type: 10`
    TextDisplay(TextDisplaySpec),
    /// `type: 14`
    Separator(SeparatorSpec),
    /// `type: 12`
    MediaGallery(MediaGallerySpec),
    /// Anything this crate does not decode
    Unsupported {
        /// Raw `type` value; 0 when missing or not an integer, saturated at
        /// `i64::MAX` for larger unsigned values
        tag: i64,
        /// The whole payload
        raw: Value,
    },
}

impl ComponentSpec {
    /// Classify a raw JSON payload.
    pub fn from_value(raw: Value) -> Self {
        let tag = raw.get("type").map_or(0, |t| {
            t.as_i64()
                .or_else(|| t.as_u64().map(|_| i64::MAX))
                .unwrap_or(0)
        });

        let decoded = match ComponentKind::from_code(tag) {
            Some(ComponentKind::ActionRow) => serde_json::from_value(raw.clone()).map(Self::ActionRow),
            Some(ComponentKind::Button) => serde_json::from_value(raw.clone()).map(Self::Button),
            Some(ComponentKind::StringSelect) => {
                serde_json::from_value(raw.clone()).map(Self::StringSelect)
            }
            Some(ComponentKind::Container) => serde_json::from_value(raw.clone()).map(Self::Container),
            Some(ComponentKind::TextDisplay) => {
                serde_json::from_value(raw.clone()).map(Self::TextDisplay)
            }
            Some(ComponentKind::Separator) => serde_json::from_value(raw.clone()).map(Self::Separator),
            Some(ComponentKind::MediaGallery) => {
                serde_json::from_value(raw.clone()).map(Self::MediaGallery)
            }
            _ => return Self::Unsupported { tag, raw },
        };

        decoded.unwrap_or_else(|e| {
            warn!("Malformed component of type {}: {}", tag, e);
            Self::Unsupported { tag, raw }
        })
    }

    /// Raw `type` tag.
    pub const fn tag(&self) -> i64 {
        match self {
            Self::ActionRow(_) => 1,
            Self::Button(_) => 2,
            Self::StringSelect(_) => 3,
            Self::Container(_) => 17,
            Self::TextDisplay(_) => 10,
            Self::Separator(_) => 14,
            Self::MediaGallery(_) => 12,
            Self::Unsupported { tag, .. } => *tag,
        }
    }
}

impl<'de> Deserialize<'de> for ComponentSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}
