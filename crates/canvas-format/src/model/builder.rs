//! Builder API for ergonomic document construction.
//!
//! # Example
//!
//! ```rust
//! use canvas_format::model::builder::DocumentBuilder;
//! use canvas_format::model::{BasicShape, BasicShapeNode, ContainerNode, SceneNode, TextNode};
//!
//! let doc = DocumentBuilder::new()
//!     .scene(SceneNode::new("page", "Page 1"), |s| s
//!         .child(BasicShapeNode::new("bg", "Background", BasicShape::rectangle()))
//!         .parent(ContainerNode::new("card", "Card"), |c| c
//!             .child(TextNode::new("title", "Title", "Hello"))
//!         )
//!     )
//!     .build();
//!
//! assert_eq!(doc.children("page"), ["bg", "card"]);
//! assert_eq!(doc.children("card"), ["title"]);
//! assert!(doc.children("title").is_empty());
//! ```

use crate::model::document::{Document, ImageResource, NodeId};
use crate::model::node::{Node, SceneNode};

/// Builder for constructing a [`Document`].
///
/// Every inserted node gets a `links` entry, so a built document compares
/// equal to its decoded form.
#[derive(Debug, Clone, Default)]
pub struct DocumentBuilder {
    document: Document,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a scene and populates its children.
    pub fn scene<F>(mut self, scene: SceneNode, f: F) -> Self
    where
        F: for<'d> FnOnce(ChildrenBuilder<'d>) -> ChildrenBuilder<'d>,
    {
        let id = scene.system.id.clone();
        self.document.scenes.push(id.clone());
        insert(&mut self.document, Node::Scene(scene));
        f(ChildrenBuilder {
            document: &mut self.document,
            parent: id,
        });
        self
    }

    /// Appends `node` as the last child of `parent`.
    pub fn child(mut self, parent: &str, node: impl Into<Node>) -> Self {
        let node = node.into();
        let id = node.id().clone();
        insert(&mut self.document, node);
        self.document
            .links
            .entry(parent.to_owned())
            .or_default()
            .push(id);
        self
    }

    /// Adds a node without a parent.
    pub fn node(mut self, node: impl Into<Node>) -> Self {
        insert(&mut self.document, node.into());
        self
    }

    /// Registers an image resource.
    pub fn image(mut self, id: impl Into<String>, resource: ImageResource) -> Self {
        self.document.images.insert(id.into(), resource);
        self
    }

    pub fn build(self) -> Document {
        self.document
    }
}

fn insert(document: &mut Document, node: Node) {
    let id = node.id().clone();
    document.links.entry(id.clone()).or_default();
    document.nodes.insert(id, node);
}

/// Appends children to one parent.
#[derive(Debug)]
pub struct ChildrenBuilder<'d> {
    document: &'d mut Document,
    parent: NodeId,
}

impl<'d> ChildrenBuilder<'d> {
    /// Appends a leaf child.
    pub fn child(self, node: impl Into<Node>) -> Self {
        let node = node.into();
        let id = node.id().clone();
        insert(self.document, node);
        push_link(self.document, &self.parent, id);
        self
    }

    /// Appends a child and populates its own children.
    pub fn parent<F>(self, node: impl Into<Node>, f: F) -> Self
    where
        F: FnOnce(ChildrenBuilder<'d>) -> ChildrenBuilder<'d>,
    {
        let node = node.into();
        let id = node.id().clone();
        let ChildrenBuilder { document, parent } = self;
        insert(document, node);
        push_link(document, &parent, id.clone());
        let inner = f(ChildrenBuilder {
            document,
            parent: id,
        });
        ChildrenBuilder {
            document: inner.document,
            parent,
        }
    }
}

fn push_link(document: &mut Document, parent: &str, child: NodeId) {
    document
        .links
        .entry(parent.to_owned())
        .or_default()
        .push(child);
}
