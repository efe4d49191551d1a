//! Gallery media shared between the items of one gallery

use crate::spec::GalleryItemSpec;
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;

/// One decoded gallery entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaAttachment {
    /// Source URL
    pub url: String,
    /// CDN proxy URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,
    /// Pixel width
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Pixel height
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// MIME type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Alt text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Hidden until revealed
    pub spoiler: bool,
}

impl From<&GalleryItemSpec> for MediaAttachment {
    fn from(item: &GalleryItemSpec) -> Self {
        Self {
            url: item.media.url.clone(),
            proxy_url: item.media.proxy_url.clone(),
            width: item.media.width,
            height: item.media.height,
            content_type: item.media.content_type.clone(),
            description: item.description.clone(),
            spoiler: item.spoiler.unwrap_or(false),
        }
    }
}

/// The full item list of one gallery, shared by all of its [`MediaRef`]s
#[derive(Debug, Clone, Default)]
pub struct SiblingList(Arc<RwLock<Vec<MediaAttachment>>>);

impl SiblingList {
    /// Share `items`.
    pub fn new(items: Vec<MediaAttachment>) -> Self {
        Self(Arc::new(RwLock::new(items)))
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    /// Whether the gallery is empty.
    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }

    /// Copy of the item at `index`.
    pub fn get(&self, index: usize) -> Option<MediaAttachment> {
        self.0.read().get(index).cloned()
    }

    /// Copy of every item.
    pub fn snapshot(&self) -> Vec<MediaAttachment> {
        self.0.read().clone()
    }

    /// Mutate the item at `index`; returns whether it exists.
    pub fn update<F>(&self, index: usize, f: F) -> bool
    where
        F: FnOnce(&mut MediaAttachment),
    {
        self.0.write().get_mut(index).map(f).is_some()
    }

    /// Whether both handles point to the same list.
    pub fn same_list(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Handle to one item of a gallery
#[derive(Debug, Clone)]
pub struct MediaRef {
    index: usize,
    siblings: SiblingList,
}

impl MediaRef {
    /// Position within the gallery.
    pub const fn index(&self) -> usize {
        self.index
    }

    /// The shared item list.
    pub const fn siblings(&self) -> &SiblingList {
        &self.siblings
    }

    /// Current state of this item.
    pub fn attachment(&self) -> Option<MediaAttachment> {
        self.siblings.get(self.index)
    }

    /// Mutate this item in place; visible through every ref of the gallery.
    pub fn update<F>(&self, f: F) -> bool
    where
        F: FnOnce(&mut MediaAttachment),
    {
        self.siblings.update(self.index, f)
    }

    /// The following item, if any.
    pub fn next(&self) -> Option<Self> {
        let index = self.index + 1;
        (index < self.siblings.len()).then(|| Self {
            index,
            siblings: self.siblings.clone(),
        })
    }

    /// The preceding item, if any.
    pub fn previous(&self) -> Option<Self> {
        self.index.checked_sub(1).map(|index| Self {
            index,
            siblings: self.siblings.clone(),
        })
    }
}

/// Decode gallery items into refs sharing one list.
pub fn share_items(items: &[GalleryItemSpec]) -> (SiblingList, Vec<MediaRef>) {
    let siblings = SiblingList::new(items.iter().map(MediaAttachment::from).collect());
    let refs = (0..items.len())
        .map(|index| MediaRef {
            index,
            siblings: siblings.clone(),
        })
        .collect();
    (siblings, refs)
}
