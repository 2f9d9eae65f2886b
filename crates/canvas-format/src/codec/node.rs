//! Node records.
//!
//! Every record is a table whose field 1 is the [`SystemTrait`] and, for
//! all kinds except scenes and unknown placeholders, field 2 is the
//! [`LayerTrait`] including the node's [`ParentReference`]. Kind-specific
//! fields follow. Which decoder applies is decided by the [`NodeTypeTag`]
//! stored alongside the record.

use crate::codec::effects::{decode_effects, encode_effects};
use crate::codec::geometry::{decode_stroke_style, encode_stroke_style};
use crate::codec::layout::{decode_layout, encode_layout};
use crate::codec::paint::{decode_paints, encode_paints};
use crate::codec::shape::{decode_basic_shape, encode_basic_shape};
use crate::codec::table::{BuiltTable, BuiltVector, Table, TableBuilder};
use crate::codec::text::{decode_text, encode_text};
use crate::codec::vector::{SegmentPolicy, decode_vector_network, encode_vector_network};
use crate::error::DecodeError;
use crate::model::{
    BooleanOperationNode, ContainerNode, Edge, EdgePoint, GroupNode, Guide, ImageMaskType,
    LayerMaskType, LayerTrait, LineNode, Node, NodeId, SceneNode, SystemTrait, UnknownNode,
    VectorNode,
};

/// Record field holding the system trait.
pub(crate) const NODE_SYSTEM: u32 = 1;
/// Record field holding the layer trait.
pub(crate) const NODE_LAYER: u32 = 2;

const SYSTEM_ID: u32 = 1;
const SYSTEM_NAME: u32 = 2;
const SYSTEM_ACTIVE: u32 = 3;
const SYSTEM_LOCKED: u32 = 4;

const IDENTIFIER_ID: u32 = 1;

const LAYER_OPACITY: u32 = 1;
const LAYER_BLEND_MODE: u32 = 2;
const LAYER_MASK_TYPE: u32 = 3;
const LAYER_MASK: u32 = 4;
const LAYER_EFFECTS: u32 = 5;
const LAYER_PARENT: u32 = 6;
const LAYER_LAYOUT: u32 = 7;
const LAYER_TRANSFORM: u32 = 8;

const MASK_IMAGE: u64 = 1;
const MASK_GEOMETRY: u64 = 2;
const MASK_IMAGE_TYPE: u32 = 1;

const PARENT_ID: u32 = 1;
const PARENT_ORDER_KEY: u32 = 2;

const SCENE_CHILDREN: u32 = 3;
const SCENE_GUIDES: u32 = 4;
const SCENE_EDGES: u32 = 5;
const SCENE_POSITION: u32 = 6;
const SCENE_BACKGROUND: u32 = 7;

const GUIDE_AXIS: u32 = 1;
const GUIDE_OFFSET: u32 = 2;

const EDGE_ID: u32 = 1;
const EDGE_A_TYPE: u32 = 2;
const EDGE_A: u32 = 3;
const EDGE_B_TYPE: u32 = 4;
const EDGE_B: u32 = 5;

const EDGE_POINT_POSITION: u64 = 1;
const EDGE_POINT_ANCHOR: u64 = 2;
const EDGE_POINT_VALUE: u32 = 1;

const CONTAINER_CORNER_SMOOTHING: u32 = 3;
const CONTAINER_STROKE_STYLE: u32 = 4;
const CONTAINER_FILLS: u32 = 5;
const CONTAINER_STROKES: u32 = 6;
const CONTAINER_CLIPS: u32 = 7;
const CONTAINER_CORNER_RADII: u32 = 8;
const CONTAINER_STROKE_WIDTHS: u32 = 9;

const LINE_STROKE_WIDTH: u32 = 3;
const LINE_STROKE_STYLE: u32 = 4;
const LINE_STROKES: u32 = 5;

// Vector and boolean records share fields 4..9.
const PATH_CORNER_RADIUS: u32 = 4;
const PATH_CORNER_SMOOTHING: u32 = 5;
const PATH_STROKE_WIDTH: u32 = 6;
const PATH_STROKE_STYLE: u32 = 7;
const PATH_FILLS: u32 = 8;
const PATH_STROKES: u32 = 9;

const VECTOR_NETWORK: u32 = 3;
const BOOLEAN_OP: u32 = 3;

/// Type tag stored next to each node record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeTypeTag {
    Scene,
    BasicShape,
    Container,
    TextSpan,
    Line,
    Vector,
    BooleanOperation,
    Group,
    Unknown,
}

impl NodeTypeTag {
    pub fn code(self) -> u64 {
        match self {
            NodeTypeTag::Scene => 1,
            NodeTypeTag::BasicShape => 2,
            NodeTypeTag::Container => 3,
            NodeTypeTag::TextSpan => 4,
            NodeTypeTag::Line => 5,
            NodeTypeTag::Vector => 6,
            NodeTypeTag::BooleanOperation => 7,
            NodeTypeTag::Group => 8,
            NodeTypeTag::Unknown => 9,
        }
    }

    /// Maps a wire code back to a tag. Zero and unassigned codes are `None`.
    pub fn from_code(code: u64) -> Option<Self> {
        Some(match code {
            1 => NodeTypeTag::Scene,
            2 => NodeTypeTag::BasicShape,
            3 => NodeTypeTag::Container,
            4 => NodeTypeTag::TextSpan,
            5 => NodeTypeTag::Line,
            6 => NodeTypeTag::Vector,
            7 => NodeTypeTag::BooleanOperation,
            8 => NodeTypeTag::Group,
            9 => NodeTypeTag::Unknown,
            _ => return None,
        })
    }

    pub fn of(node: &Node) -> Self {
        match node {
            Node::Scene(_) => NodeTypeTag::Scene,
            Node::BasicShape(_) => NodeTypeTag::BasicShape,
            Node::Container(_) => NodeTypeTag::Container,
            Node::Text(_) => NodeTypeTag::TextSpan,
            Node::Line(_) => NodeTypeTag::Line,
            Node::Vector(_) => NodeTypeTag::Vector,
            Node::BooleanOperation(_) => NodeTypeTag::BooleanOperation,
            Node::Group(_) => NodeTypeTag::Group,
            Node::Unknown(_) => NodeTypeTag::Unknown,
        }
    }
}

/// A node's position among its siblings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentReference {
    pub parent_id: NodeId,
    pub order_key: String,
}

/// A decoded record: the node and, if stored, where it hangs in the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedNode {
    pub node: Node,
    pub parent: Option<ParentReference>,
}

// =============================================================================
// ENCODING
// =============================================================================

/// Encodes one node record.
///
/// `parent` is ignored for scenes and unknown nodes, which carry no layer.
pub fn encode_node(node: &Node, parent: Option<&ParentReference>) -> (NodeTypeTag, BuiltTable) {
    let record = match node {
        Node::Scene(n) => encode_scene(n),
        Node::BasicShape(n) => encode_basic_shape(n, parent),
        Node::Container(n) => encode_container(n, parent),
        Node::Text(n) => encode_text(n, parent),
        Node::Line(n) => encode_line(n, parent),
        Node::Vector(n) => encode_vector(n, parent),
        Node::BooleanOperation(n) => encode_boolean(n, parent),
        Node::Group(n) => encode_group(n, parent),
        Node::Unknown(n) => {
            let system = encode_system(&n.system);
            let mut t = TableBuilder::new();
            t.table(NODE_SYSTEM, &system);
            t.finish()
        }
    };
    (NodeTypeTag::of(node), record)
}

pub(crate) fn encode_identifier(id: &str) -> BuiltTable {
    let mut t = TableBuilder::new();
    t.string(IDENTIFIER_ID, id);
    t.finish()
}

pub(crate) fn encode_system(system: &SystemTrait) -> BuiltTable {
    let id = encode_identifier(&system.id);
    let mut t = TableBuilder::new();
    t.table(SYSTEM_ID, &id);
    t.string(SYSTEM_NAME, &system.name);
    t.bool(SYSTEM_ACTIVE, system.active);
    t.bool(SYSTEM_LOCKED, system.locked);
    t.finish()
}

pub(crate) fn encode_layer(layer: &LayerTrait, parent: Option<&ParentReference>) -> BuiltTable {
    let (mask_type, mask) = {
        let mut m = TableBuilder::new();
        let kind = match layer.mask_type {
            LayerMaskType::Image(image) => {
                m.code(MASK_IMAGE_TYPE, image);
                MASK_IMAGE
            }
            LayerMaskType::Geometry => MASK_GEOMETRY,
        };
        (kind, m.finish())
    };
    let effects = encode_effects(&layer.effects);
    let parent = parent.map(|p| {
        let id = encode_identifier(&p.parent_id);
        let mut t = TableBuilder::new();
        t.table(PARENT_ID, &id);
        t.string(PARENT_ORDER_KEY, &p.order_key);
        t.finish()
    });
    let layout = encode_layout(&layer.layout);

    let mut t = TableBuilder::new();
    t.f32(LAYER_OPACITY, layer.opacity);
    t.code(LAYER_BLEND_MODE, layer.blend_mode);
    t.varint(LAYER_MASK_TYPE, mask_type);
    t.table(LAYER_MASK, &mask);
    if let Some(effects) = &effects {
        t.table(LAYER_EFFECTS, effects);
    }
    if let Some(parent) = &parent {
        t.table(LAYER_PARENT, parent);
    }
    t.table(LAYER_LAYOUT, &layout);
    t.inline(LAYER_TRANSFORM, &layer.transform);
    t.finish()
}

/// Opens a record with its system and layer traits already attached.
pub(crate) fn layer_record(
    system: &SystemTrait,
    layer: &LayerTrait,
    parent: Option<&ParentReference>,
) -> TableBuilder {
    let system = encode_system(system);
    let layer = encode_layer(layer, parent);
    let mut t = TableBuilder::new();
    t.table(NODE_SYSTEM, &system);
    t.table(NODE_LAYER, &layer);
    t
}

fn encode_scene(scene: &SceneNode) -> BuiltTable {
    let system = encode_system(&scene.system);
    let guides = BuiltVector::tables(scene.guides.iter().map(|g| {
        let mut t = TableBuilder::new();
        t.code(GUIDE_AXIS, g.axis);
        t.f32(GUIDE_OFFSET, g.offset);
        t.finish()
    }));
    let edges = BuiltVector::tables(scene.edges.iter().map(encode_edge));

    let mut t = TableBuilder::new();
    t.table(NODE_SYSTEM, &system);
    t.code(SCENE_CHILDREN, scene.children);
    t.vector(SCENE_GUIDES, &guides);
    t.vector(SCENE_EDGES, &edges);
    t.string_opt(SCENE_POSITION, scene.position.as_deref());
    if let Some(color) = &scene.background_color {
        t.inline(SCENE_BACKGROUND, color);
    }
    t.finish()
}

fn encode_edge(edge: &Edge) -> BuiltTable {
    let (a_type, a) = encode_edge_point(&edge.a);
    let (b_type, b) = encode_edge_point(&edge.b);
    let mut t = TableBuilder::new();
    t.string(EDGE_ID, &edge.id);
    t.varint(EDGE_A_TYPE, a_type);
    t.table(EDGE_A, &a);
    t.varint(EDGE_B_TYPE, b_type);
    t.table(EDGE_B, &b);
    t.finish()
}

fn encode_edge_point(point: &EdgePoint) -> (u64, BuiltTable) {
    let mut t = TableBuilder::new();
    let kind = match point {
        EdgePoint::Position(p) => {
            t.inline(EDGE_POINT_VALUE, p);
            EDGE_POINT_POSITION
        }
        EdgePoint::Anchor { target } => {
            t.table(EDGE_POINT_VALUE, &encode_identifier(target));
            EDGE_POINT_ANCHOR
        }
    };
    (kind, t.finish())
}

fn encode_container(n: &ContainerNode, parent: Option<&ParentReference>) -> BuiltTable {
    let stroke_style = encode_stroke_style(&n.stroke_style);
    let fills = encode_paints(&n.fill_paints);
    let strokes = encode_paints(&n.stroke_paints);

    let mut t = layer_record(&n.system, &n.layer, parent);
    t.f32(CONTAINER_CORNER_SMOOTHING, n.corner_smoothing);
    t.table(CONTAINER_STROKE_STYLE, &stroke_style);
    t.vector(CONTAINER_FILLS, &fills);
    t.vector(CONTAINER_STROKES, &strokes);
    t.bool(CONTAINER_CLIPS, n.clips_content);
    t.inline(CONTAINER_CORNER_RADII, &n.corner_radii);
    t.inline(CONTAINER_STROKE_WIDTHS, &n.stroke_widths);
    t.finish()
}

fn encode_line(n: &LineNode, parent: Option<&ParentReference>) -> BuiltTable {
    let stroke_style = encode_stroke_style(&n.stroke_style);
    let strokes = encode_paints(&n.stroke_paints);

    let mut t = layer_record(&n.system, &n.layer, parent);
    t.f32(LINE_STROKE_WIDTH, n.stroke_width);
    t.table(LINE_STROKE_STYLE, &stroke_style);
    t.vector(LINE_STROKES, &strokes);
    t.finish()
}

fn encode_vector(n: &VectorNode, parent: Option<&ParentReference>) -> BuiltTable {
    let network = encode_vector_network(&n.network);
    let stroke_style = encode_stroke_style(&n.stroke_style);
    let fills = encode_paints(&n.fill_paints);
    let strokes = encode_paints(&n.stroke_paints);

    let mut t = layer_record(&n.system, &n.layer, parent);
    t.table(VECTOR_NETWORK, &network);
    t.f32(PATH_CORNER_RADIUS, n.corner_radius);
    t.f32(PATH_CORNER_SMOOTHING, n.corner_smoothing);
    t.f32(PATH_STROKE_WIDTH, n.stroke_width);
    t.table(PATH_STROKE_STYLE, &stroke_style);
    t.vector(PATH_FILLS, &fills);
    t.vector(PATH_STROKES, &strokes);
    t.finish()
}

fn encode_boolean(n: &BooleanOperationNode, parent: Option<&ParentReference>) -> BuiltTable {
    let stroke_style = encode_stroke_style(&n.stroke_style);
    let fills = encode_paints(&n.fill_paints);
    let strokes = encode_paints(&n.stroke_paints);

    let mut t = layer_record(&n.system, &n.layer, parent);
    t.code(BOOLEAN_OP, n.op);
    t.f32(PATH_CORNER_RADIUS, n.corner_radius);
    t.f32(PATH_CORNER_SMOOTHING, n.corner_smoothing);
    t.f32(PATH_STROKE_WIDTH, n.stroke_width);
    t.table(PATH_STROKE_STYLE, &stroke_style);
    t.vector(PATH_FILLS, &fills);
    t.vector(PATH_STROKES, &strokes);
    t.finish()
}

fn encode_group(n: &GroupNode, parent: Option<&ParentReference>) -> BuiltTable {
    layer_record(&n.system, &n.layer, parent).finish()
}

// =============================================================================
// DECODING
// =============================================================================

/// Decodes one node record according to its tag.
pub fn decode_node(
    tag: NodeTypeTag,
    record: &Table<'_>,
    policy: SegmentPolicy,
) -> Result<DecodedNode, DecodeError> {
    let system = decode_system(record)?;
    let layered = || decode_layer(record);

    let (node, parent) = match tag {
        NodeTypeTag::Scene => (Node::Scene(decode_scene(system, record)?), None),
        NodeTypeTag::Unknown => (Node::Unknown(UnknownNode { system }), None),
        NodeTypeTag::BasicShape => {
            let (layer, parent) = layered()?;
            (Node::BasicShape(decode_basic_shape(system, layer, record)?), parent)
        }
        NodeTypeTag::TextSpan => {
            let (layer, parent) = layered()?;
            (Node::Text(decode_text(system, layer, record)?), parent)
        }
        NodeTypeTag::Container => {
            let (layer, parent) = layered()?;
            (Node::Container(decode_container(system, layer, record)?), parent)
        }
        NodeTypeTag::Line => {
            let (layer, parent) = layered()?;
            let line = LineNode {
                system,
                layer,
                stroke_width: record.f32(LINE_STROKE_WIDTH).unwrap_or(0.0),
                stroke_style: decode_stroke_style(
                    record.table(LINE_STROKE_STYLE, "stroke style")?.as_ref(),
                )?,
                stroke_paints: decode_paints(record, LINE_STROKES)?,
            };
            (Node::Line(line), parent)
        }
        NodeTypeTag::Vector => {
            let (layer, parent) = layered()?;
            (Node::Vector(decode_vector(system, layer, record, policy)?), parent)
        }
        NodeTypeTag::BooleanOperation => {
            let (layer, parent) = layered()?;
            (Node::BooleanOperation(decode_boolean(system, layer, record)?), parent)
        }
        NodeTypeTag::Group => {
            let (layer, parent) = layered()?;
            (Node::Group(GroupNode { system, layer }), parent)
        }
    };
    Ok(DecodedNode { node, parent })
}

fn decode_container(
    system: SystemTrait,
    layer: LayerTrait,
    record: &Table<'_>,
) -> Result<ContainerNode, DecodeError> {
    Ok(ContainerNode {
        system,
        layer,
        corner_radii: record.inline(CONTAINER_CORNER_RADII)?.unwrap_or_default(),
        corner_smoothing: record.f32(CONTAINER_CORNER_SMOOTHING).unwrap_or(0.0),
        stroke_widths: record.inline(CONTAINER_STROKE_WIDTHS)?.unwrap_or_default(),
        stroke_style: decode_stroke_style(
            record.table(CONTAINER_STROKE_STYLE, "stroke style")?.as_ref(),
        )?,
        fill_paints: decode_paints(record, CONTAINER_FILLS)?,
        stroke_paints: decode_paints(record, CONTAINER_STROKES)?,
        clips_content: record.bool(CONTAINER_CLIPS).unwrap_or(false),
    })
}

fn decode_vector(
    system: SystemTrait,
    layer: LayerTrait,
    record: &Table<'_>,
    policy: SegmentPolicy,
) -> Result<VectorNode, DecodeError> {
    let network = record.table(VECTOR_NETWORK, "vector network")?;
    Ok(VectorNode {
        system,
        layer,
        network: decode_vector_network(network.as_ref(), policy)?,
        corner_radius: record.f32(PATH_CORNER_RADIUS).unwrap_or(0.0),
        corner_smoothing: record.f32(PATH_CORNER_SMOOTHING).unwrap_or(0.0),
        stroke_width: record.f32(PATH_STROKE_WIDTH).unwrap_or(0.0),
        stroke_style: decode_stroke_style(
            record.table(PATH_STROKE_STYLE, "stroke style")?.as_ref(),
        )?,
        fill_paints: decode_paints(record, PATH_FILLS)?,
        stroke_paints: decode_paints(record, PATH_STROKES)?,
    })
}

fn decode_boolean(
    system: SystemTrait,
    layer: LayerTrait,
    record: &Table<'_>,
) -> Result<BooleanOperationNode, DecodeError> {
    Ok(BooleanOperationNode {
        system,
        layer,
        op: record.code(BOOLEAN_OP),
        corner_radius: record.f32(PATH_CORNER_RADIUS).unwrap_or(0.0),
        corner_smoothing: record.f32(PATH_CORNER_SMOOTHING).unwrap_or(0.0),
        stroke_width: record.f32(PATH_STROKE_WIDTH).unwrap_or(0.0),
        stroke_style: decode_stroke_style(
            record.table(PATH_STROKE_STYLE, "stroke style")?.as_ref(),
        )?,
        fill_paints: decode_paints(record, PATH_FILLS)?,
        stroke_paints: decode_paints(record, PATH_STROKES)?,
    })
}

pub(crate) fn decode_identifier(table: &Table<'_>) -> Result<Option<NodeId>, DecodeError> {
    table.string(IDENTIFIER_ID)
}

fn decode_system(record: &Table<'_>) -> Result<SystemTrait, DecodeError> {
    let system = record
        .table(NODE_SYSTEM, "system trait")?
        .ok_or(DecodeError::MissingField {
            table: "node",
            field: "system",
        })?;
    let id = system
        .table(SYSTEM_ID, "node identifier")?
        .map(|t| decode_identifier(&t))
        .transpose()?
        .flatten()
        .ok_or(DecodeError::MissingField {
            table: "system trait",
            field: "id",
        })?;
    Ok(SystemTrait {
        id,
        name: system.string(SYSTEM_NAME)?.unwrap_or_default(),
        active: system.bool(SYSTEM_ACTIVE).unwrap_or(true),
        locked: system.bool(SYSTEM_LOCKED).unwrap_or(false),
    })
}

fn decode_layer(
    record: &Table<'_>,
) -> Result<(LayerTrait, Option<ParentReference>), DecodeError> {
    let Some(t) = record.table(NODE_LAYER, "layer trait")? else {
        return Ok((LayerTrait::default(), None));
    };
    let mask = t.table(LAYER_MASK, "layer mask")?;
    let mask_type = match (t.varint(LAYER_MASK_TYPE), &mask) {
        (Some(MASK_GEOMETRY), _) => LayerMaskType::Geometry,
        (Some(MASK_IMAGE), Some(m)) => LayerMaskType::Image(m.code::<ImageMaskType>(MASK_IMAGE_TYPE)),
        _ => LayerMaskType::default(),
    };
    let parent = match t.table(LAYER_PARENT, "parent reference")? {
        Some(p) => decode_parent(&p)?,
        None => None,
    };
    let layer = LayerTrait {
        opacity: t.f32(LAYER_OPACITY).unwrap_or(1.0),
        blend_mode: t.code(LAYER_BLEND_MODE),
        mask_type,
        effects: decode_effects(t.table(LAYER_EFFECTS, "effects")?.as_ref())?,
        transform: t.inline(LAYER_TRANSFORM)?.unwrap_or_default(),
        layout: decode_layout(t.table(LAYER_LAYOUT, "layout")?.as_ref())?,
    };
    Ok((layer, parent))
}

fn decode_parent(t: &Table<'_>) -> Result<Option<ParentReference>, DecodeError> {
    let parent_id = match t.table(PARENT_ID, "node identifier")? {
        Some(id) => decode_identifier(&id)?,
        None => None,
    };
    let Some(parent_id) = parent_id else {
        tracing::debug!("parent reference without parent id");
        return Ok(None);
    };
    Ok(Some(ParentReference {
        parent_id,
        order_key: t.string(PARENT_ORDER_KEY)?.unwrap_or_default(),
    }))
}

fn decode_scene(system: SystemTrait, record: &Table<'_>) -> Result<SceneNode, DecodeError> {
    let guides = match record.vector(SCENE_GUIDES, "guides")? {
        Some(v) => v
            .tables("guide")?
            .iter()
            .map(|g| Guide {
                axis: g.code(GUIDE_AXIS),
                offset: g.f32(GUIDE_OFFSET).unwrap_or(0.0),
            })
            .collect(),
        None => Vec::new(),
    };
    let edges = match record.vector(SCENE_EDGES, "edges")? {
        Some(v) => v
            .tables("edge")?
            .iter()
            .map(decode_edge)
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .flatten()
            .collect(),
        None => Vec::new(),
    };
    Ok(SceneNode {
        system,
        guides,
        edges,
        background_color: record.inline(SCENE_BACKGROUND)?,
        position: record.string(SCENE_POSITION)?,
        children: record.code(SCENE_CHILDREN),
    })
}

fn decode_edge(t: &Table<'_>) -> Result<Option<Edge>, DecodeError> {
    let a = decode_edge_point(t, EDGE_A_TYPE, EDGE_A)?;
    let b = decode_edge_point(t, EDGE_B_TYPE, EDGE_B)?;
    let (Some(a), Some(b)) = (a, b) else {
        tracing::debug!("skipping edge with unreadable endpoint");
        return Ok(None);
    };
    Ok(Some(Edge {
        id: t.string(EDGE_ID)?.unwrap_or_default(),
        a,
        b,
    }))
}

fn decode_edge_point(
    t: &Table<'_>,
    type_field: u32,
    value_field: u32,
) -> Result<Option<EdgePoint>, DecodeError> {
    let Some(value) = t.table(value_field, "edge point")? else {
        return Ok(None);
    };
    Ok(match t.varint(type_field) {
        Some(EDGE_POINT_POSITION) => value.inline(EDGE_POINT_VALUE)?.map(EdgePoint::Position),
        Some(EDGE_POINT_ANCHOR) => value
            .table(EDGE_POINT_VALUE, "node identifier")?
            .map(|id| decode_identifier(&id))
            .transpose()?
            .flatten()
            .map(|target| EdgePoint::Anchor { target }),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Axis, BooleanOperation, ContainerStyle, CornerRadii, FeBlurEffect, LayerBlendMode,
        Layout, Paint, Point2D, Rgba32F, SceneChildren, StrokeWidths, Transform2D, VectorNetwork,
    };

    fn roundtrip(node: Node, parent: Option<&ParentReference>) -> DecodedNode {
        let (tag, built) = encode_node(&node, parent);
        let table = Table::parse(built.as_bytes(), "node").unwrap();
        decode_node(tag, &table, SegmentPolicy::default()).unwrap()
    }

    fn parent() -> ParentReference {
        ParentReference {
            parent_id: "scene".into(),
            order_key: "a0".into(),
        }
    }

    #[test]
    fn test_tag_codes() {
        for code in 1..=9 {
            assert_eq!(NodeTypeTag::from_code(code).unwrap().code(), code);
        }
        assert_eq!(NodeTypeTag::from_code(0), None);
        assert_eq!(NodeTypeTag::from_code(10), None);
    }

    #[test]
    fn test_scene_roundtrip() {
        let mut scene = SceneNode::new("scene", "Page 1");
        scene.children = SceneChildren::Single;
        scene.background_color = Some(Rgba32F::WHITE);
        scene.position = Some("a0".into());
        scene.guides.push(Guide {
            axis: Axis::Vertical,
            offset: 120.0,
        });
        scene.edges.push(Edge {
            id: "e1".into(),
            a: EdgePoint::Position(Point2D::new(1.0, 2.0)),
            b: EdgePoint::Anchor {
                target: "rect".into(),
            },
        });
        let node = Node::Scene(scene);
        // scenes never carry a parent
        let decoded = roundtrip(node.clone(), Some(&parent()));
        assert_eq!(decoded.node, node);
        assert_eq!(decoded.parent, None);
    }

    #[test]
    fn test_layer_trait_roundtrip() {
        let mut group = GroupNode::new("g", "Group");
        group.layer.opacity = 0.5;
        group.layer.blend_mode = LayerBlendMode::Blend(crate::model::BlendMode::Multiply);
        group.layer.mask_type = LayerMaskType::Geometry;
        group.layer.effects.blur = Some(FeBlurEffect::gaussian(4.0));
        group.layer.transform = Transform2D::translate(10.0, 20.0);
        group.layer.layout = Layout::fixed(10.0, 20.0, 100.0, 50.0);
        group.system.locked = true;
        group.system.active = false;

        let node = Node::Group(group);
        let decoded = roundtrip(node.clone(), Some(&parent()));
        assert_eq!(decoded.node, node);
        assert_eq!(decoded.parent, Some(parent()));
    }

    #[test]
    fn test_container_line_vector_boolean_roundtrip() {
        let mut container = ContainerNode::new("c", "Frame");
        container.corner_radii = CornerRadii {
            top_left: 1.0,
            top_right: 2.0,
            bottom_right: 3.0,
            bottom_left: 4.0,
        };
        container.stroke_widths = StrokeWidths::uniform(2.0);
        container.clips_content = true;
        container.fill_paints.push(Paint::solid(Rgba32F::WHITE));
        container.layer.layout.container = Some(ContainerStyle::default());

        let mut line = LineNode::new("l", "Line");
        line.stroke_width = 3.0;
        line.stroke_paints.push(Paint::solid(Rgba32F::BLACK));

        let mut vector = VectorNode::new(
            "v",
            "Triangle",
            VectorNetwork::polygon(&[
                Point2D::new(0.0, 0.0),
                Point2D::new(10.0, 0.0),
                Point2D::new(5.0, 8.0),
            ]),
        );
        vector.corner_radius = 2.0;

        let mut boolean = BooleanOperationNode::new("b", "Union", BooleanOperation::Xor);
        boolean.stroke_width = 1.5;

        for node in [
            Node::Container(container),
            Node::Line(line),
            Node::Vector(vector),
            Node::BooleanOperation(boolean),
        ] {
            assert_eq!(roundtrip(node.clone(), Some(&parent())).node, node);
        }
    }

    #[test]
    fn test_unknown_keeps_system_only() {
        let node = Node::Unknown(UnknownNode {
            system: SystemTrait::new("x", "Mystery"),
        });
        let decoded = roundtrip(node.clone(), Some(&parent()));
        assert_eq!(decoded.node, node);
        assert_eq!(decoded.parent, None);
    }

    #[test]
    fn test_missing_system_is_fatal() {
        let empty = TableBuilder::new().finish();
        let table = Table::parse(empty.as_bytes(), "node").unwrap();
        let err = decode_node(NodeTypeTag::Group, &table, SegmentPolicy::Drop).unwrap_err();
        assert!(matches!(err, DecodeError::MissingField { field: "system", .. }));
    }

    #[test]
    fn test_missing_layer_uses_defaults() {
        let system = encode_system(&SystemTrait::new("g", "Group"));
        let mut t = TableBuilder::new();
        t.table(NODE_SYSTEM, &system);
        let built = t.finish();
        let table = Table::parse(built.as_bytes(), "node").unwrap();

        let decoded = decode_node(NodeTypeTag::Group, &table, SegmentPolicy::Drop).unwrap();
        assert_eq!(decoded.node, Node::Group(GroupNode::new("g", "Group")));
        assert_eq!(decoded.parent, None);
    }
}
