//! Semantic validation for canvas documents.
//!
//! Structural validation happens during decode. The checks here cover
//! tree and value invariants that the codec repairs or passes through
//! silently, so callers can reject a document before encoding it or
//! audit one after decoding.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::ValidationError;
use crate::model::{Document, Node, NodeId};

/// Validates a document, returning the first violation found.
///
/// Checks, in order:
/// - every listed scene exists and is a scene node
/// - every link parent and child exists
/// - every node has at most one parent; scenes and unknown nodes have none
/// - the links contain no cycles
/// - per-node values (segment indices, opacity, font feature tags)
///
/// Nodes are visited in id order, so the reported error is stable.
pub fn validate_document(document: &Document) -> Result<(), ValidationError> {
    for id in &document.scenes {
        match document.nodes.get(id) {
            None => return Err(ValidationError::MissingScene { id: id.clone() }),
            Some(node) if !node.is_scene() => {
                return Err(ValidationError::NotAScene { id: id.clone() });
            }
            Some(_) => {}
        }
    }

    let parents = parent_map(document)?;
    check_cycles(&parents)?;

    let mut ids: Vec<&NodeId> = document.nodes.keys().collect();
    ids.sort();
    for id in ids {
        if let Some(node) = document.nodes.get(id) {
            validate_node(node)?;
        }
    }
    Ok(())
}

fn parent_map(document: &Document) -> Result<FxHashMap<&str, &str>, ValidationError> {
    let mut link_parents: Vec<&NodeId> = document.links.keys().collect();
    link_parents.sort();

    let mut parents: FxHashMap<&str, &str> = FxHashMap::default();
    for parent in link_parents {
        if !document.nodes.contains_key(parent) {
            return Err(ValidationError::DanglingLink { id: parent.clone() });
        }
        for child in document.children(parent) {
            let Some(node) = document.nodes.get(child) else {
                return Err(ValidationError::DanglingLink { id: child.clone() });
            };
            if node.is_scene() {
                return Err(ValidationError::SceneHasParent {
                    id: child.clone(),
                    parent: parent.clone(),
                });
            }
            if let Node::Unknown(_) = node {
                return Err(ValidationError::UnknownHasParent {
                    id: child.clone(),
                    parent: parent.clone(),
                });
            }
            if let Some(first) = parents.insert(child.as_str(), parent.as_str()) {
                return Err(ValidationError::MultipleParents {
                    child: child.clone(),
                    first: first.to_owned(),
                    second: parent.clone(),
                });
            }
        }
    }
    Ok(parents)
}

fn check_cycles(parents: &FxHashMap<&str, &str>) -> Result<(), ValidationError> {
    let mut acyclic: FxHashSet<&str> = FxHashSet::default();
    let mut ids: Vec<&str> = parents.keys().copied().collect();
    ids.sort_unstable();

    for start in ids {
        let mut path: FxHashSet<&str> = FxHashSet::default();
        let mut current = start;
        loop {
            if acyclic.contains(current) {
                break;
            }
            if !path.insert(current) {
                return Err(ValidationError::Cycle {
                    id: current.to_owned(),
                });
            }
            match parents.get(current) {
                Some(parent) => current = *parent,
                None => break,
            }
        }
        acyclic.extend(path);
    }
    Ok(())
}

fn validate_node(node: &Node) -> Result<(), ValidationError> {
    if let Some(layer) = node.layer() {
        if !(0.0..=1.0).contains(&layer.opacity) {
            return Err(ValidationError::OpacityOutOfRange {
                node: node.id().clone(),
                opacity: layer.opacity,
            });
        }
    }
    match node {
        Node::Vector(v) => {
            if let Some((segment, vertex)) = v.network.out_of_range().next() {
                return Err(ValidationError::SegmentOutOfRange {
                    node: node.id().clone(),
                    segment,
                    vertex,
                    vertices: v.network.vertices.len(),
                });
            }
        }
        Node::Text(t) => {
            if t.style.font_features.keys().any(|tag| !tag.is_ascii()) {
                return Err(ValidationError::InvalidFontFeature {
                    node: node.id().clone(),
                });
            }
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        DocumentBuilder, FontFeatureTag, GroupNode, Point2D, SceneNode, SystemTrait, TextNode,
        UnknownNode, VectorNetwork, VectorNode, VectorSegment,
    };

    fn sample() -> Document {
        DocumentBuilder::new()
            .scene(SceneNode::new("scene", "Page"), |c| {
                c.parent(GroupNode::new("g", "Group"), |c| {
                    c.child(GroupNode::new("a", "A"))
                })
            })
            .build()
    }

    #[test]
    fn test_valid_document() {
        assert_eq!(validate_document(&sample()), Ok(()));
        assert_eq!(validate_document(&Document::new()), Ok(()));
    }

    #[test]
    fn test_scene_checks() {
        let mut doc = sample();
        doc.scenes.push("nope".into());
        assert!(matches!(
            validate_document(&doc),
            Err(ValidationError::MissingScene { .. })
        ));

        let mut doc = sample();
        doc.scenes.push("g".into());
        assert!(matches!(
            validate_document(&doc),
            Err(ValidationError::NotAScene { .. })
        ));

        let mut doc = sample();
        doc.links.get_mut("g").unwrap().push("scene".into());
        assert!(matches!(
            validate_document(&doc),
            Err(ValidationError::SceneHasParent { .. })
        ));

        let mut doc = sample();
        doc.nodes.insert(
            "u".into(),
            UnknownNode {
                system: SystemTrait::new("u", "Unsupported"),
            }
            .into(),
        );
        doc.links.get_mut("g").unwrap().push("u".into());
        assert_eq!(
            validate_document(&doc),
            Err(ValidationError::UnknownHasParent {
                id: "u".into(),
                parent: "g".into(),
            })
        );
    }

    #[test]
    fn test_link_checks() {
        let mut doc = sample();
        doc.links.get_mut("g").unwrap().push("ghost".into());
        assert_eq!(
            validate_document(&doc),
            Err(ValidationError::DanglingLink { id: "ghost".into() })
        );

        let mut doc = sample();
        doc.links.get_mut("scene").unwrap().push("a".into());
        assert!(matches!(
            validate_document(&doc),
            Err(ValidationError::MultipleParents { ref child, .. }) if child == "a"
        ));
    }

    #[test]
    fn test_cycle() {
        let mut doc = sample();
        doc.nodes.insert("x".into(), GroupNode::new("x", "X").into());
        doc.nodes.insert("y".into(), GroupNode::new("y", "Y").into());
        doc.links.insert("x".into(), vec!["y".into()]);
        doc.links.insert("y".into(), vec!["x".into()]);
        assert!(matches!(
            validate_document(&doc),
            Err(ValidationError::Cycle { .. })
        ));
    }

    #[test]
    fn test_node_values() {
        let mut doc = sample();
        if let Some(layer) = doc.nodes.get_mut("a").and_then(Node::layer_mut) {
            layer.opacity = 1.5;
        }
        assert!(matches!(
            validate_document(&doc),
            Err(ValidationError::OpacityOutOfRange { .. })
        ));

        let network = VectorNetwork {
            vertices: vec![Point2D::ZERO],
            segments: vec![VectorSegment::line(0, 3)],
        };
        let doc = DocumentBuilder::new()
            .node(VectorNode::new("v", "Path", network))
            .build();
        assert!(matches!(
            validate_document(&doc),
            Err(ValidationError::SegmentOutOfRange { vertex: 3, .. })
        ));

        let mut text = TextNode::new("t", "Text", "hi");
        text.style
            .font_features
            .insert(FontFeatureTag([0xC3, b'a', b'b', b'c']), true);
        let doc = DocumentBuilder::new().node(text).build();
        assert!(matches!(
            validate_document(&doc),
            Err(ValidationError::InvalidFontFeature { .. })
        ));
    }
}
