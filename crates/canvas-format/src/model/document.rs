//! The document: a node map plus parent-to-children adjacency.

use rustc_hash::FxHashMap;

use crate::model::node::Node;

/// Node identifier, unique and stable for the lifetime of a node.
pub type NodeId = String;

/// An image resource referenced by image paints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageResource {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub mime: Option<String>,
}

/// A raw RGBA8 bitmap owned by the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// A user-declared document property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDefinition {
    pub type_name: String,
    pub default_value: Option<String>,
}

/// A canvas document.
///
/// `links[parent]` lists children in render order (first is bottom-most).
/// Every node except a scene has exactly one parent; scenes are roots and
/// are listed in `scenes`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub nodes: FxHashMap<NodeId, Node>,
    pub links: FxHashMap<NodeId, Vec<NodeId>>,
    pub scenes: Vec<NodeId>,
    pub images: FxHashMap<String, ImageResource>,
    pub bitmaps: FxHashMap<String, Bitmap>,
    pub properties: FxHashMap<String, PropertyDefinition>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Children of `id` in render order; empty for leaves and unknown ids.
    pub fn children(&self, id: &str) -> &[NodeId] {
        self.links.get(id).map_or(&[], Vec::as_slice)
    }

    /// Finds the parent of `id` by scanning the links.
    pub fn parent_of(&self, id: &str) -> Option<&NodeId> {
        self.links
            .iter()
            .find(|(_, children)| children.iter().any(|c| c == id))
            .map(|(parent, _)| parent)
    }
}

/// A decoded buffer: the document together with the schema version it was
/// written with.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasFile {
    pub schema_version: String,
    pub document: Document,
}
