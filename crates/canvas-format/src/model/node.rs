//! Scene graph nodes.
//!
//! Every node carries a [`SystemTrait`]. All nodes except scenes and
//! unknown placeholders also carry a [`LayerTrait`].

use crate::model::document::NodeId;
use crate::model::effects::LayerEffects;
use crate::model::geometry::{CornerRadii, Point2D, Rgba32F, StrokeWidths, Transform2D};
use crate::model::layout::Layout;
use crate::model::paint::Paints;
use crate::model::style::{
    Axis, BooleanOperation, LayerBlendMode, LayerMaskType, SceneChildren, StrokeStyle, TextAlign,
    TextAlignVertical,
};
use crate::model::text::TextStyle;
use crate::model::vector::VectorNetwork;

/// Identity and editor flags.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemTrait {
    pub id: NodeId,
    pub name: String,
    /// Visibility.
    pub active: bool,
    pub locked: bool,
}

impl SystemTrait {
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            active: true,
            locked: false,
        }
    }
}

/// Compositing, effects and layout of a rendered layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerTrait {
    pub opacity: f32,
    pub blend_mode: LayerBlendMode,
    pub mask_type: LayerMaskType,
    pub effects: LayerEffects,
    /// Cached relative transform, kept for consumers that skip layout.
    pub transform: Transform2D,
    pub layout: Layout,
}

impl Default for LayerTrait {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            blend_mode: LayerBlendMode::PassThrough,
            mask_type: LayerMaskType::default(),
            effects: LayerEffects::default(),
            transform: Transform2D::IDENTITY,
            layout: Layout::default(),
        }
    }
}

// =============================================================================
// SCENE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Guide {
    pub axis: Axis,
    pub offset: f32,
}

/// One end of a scene edge.
#[derive(Debug, Clone, PartialEq)]
pub enum EdgePoint {
    Position(Point2D),
    Anchor { target: NodeId },
}

/// A connector drawn between two points or nodes of a scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: String,
    pub a: EdgePoint,
    pub b: EdgePoint,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub system: SystemTrait,
    pub guides: Vec<Guide>,
    pub edges: Vec<Edge>,
    pub background_color: Option<Rgba32F>,
    /// Order key of the scene among the document's scenes.
    pub position: Option<String>,
    pub children: SceneChildren,
}

impl SceneNode {
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>) -> Self {
        Self {
            system: SystemTrait::new(id, name),
            guides: Vec::new(),
            edges: Vec::new(),
            background_color: None,
            position: None,
            children: SceneChildren::Multiple,
        }
    }
}

// =============================================================================
// SHAPES
// =============================================================================

/// Geometry of a basic shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BasicShape {
    Rectangle {
        corner_radii: CornerRadii,
        stroke_widths: StrokeWidths,
    },
    /// Ring sector; a full ellipse has `inner_radius = 0`, `angle = 360`.
    Ellipse {
        inner_radius: f32,
        start_angle: f32,
        angle: f32,
    },
    RegularPolygon {
        point_count: u32,
        corner_radius: f32,
    },
    RegularStarPolygon {
        point_count: u32,
        inner_radius: f32,
        corner_radius: f32,
    },
}

impl BasicShape {
    pub const fn rectangle() -> Self {
        BasicShape::Rectangle {
            corner_radii: CornerRadii::uniform(0.0),
            stroke_widths: StrokeWidths::uniform(0.0),
        }
    }

    pub const fn ellipse() -> Self {
        BasicShape::Ellipse {
            inner_radius: 0.0,
            start_angle: 0.0,
            angle: 360.0,
        }
    }

    pub const fn polygon() -> Self {
        BasicShape::RegularPolygon {
            point_count: 3,
            corner_radius: 0.0,
        }
    }

    pub const fn star() -> Self {
        BasicShape::RegularStarPolygon {
            point_count: 5,
            inner_radius: 0.5,
            corner_radius: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BasicShapeNode {
    pub system: SystemTrait,
    pub layer: LayerTrait,
    pub shape: BasicShape,
    pub corner_smoothing: f32,
    pub fill_paints: Paints,
    pub stroke_paints: Paints,
    /// Uniform stroke width; rectangles use their per-side widths instead.
    pub stroke_width: f32,
    pub stroke_style: StrokeStyle,
}

impl BasicShapeNode {
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>, shape: BasicShape) -> Self {
        Self {
            system: SystemTrait::new(id, name),
            layer: LayerTrait::default(),
            shape,
            corner_smoothing: 0.0,
            fill_paints: Vec::new(),
            stroke_paints: Vec::new(),
            stroke_width: 0.0,
            stroke_style: StrokeStyle::default(),
        }
    }
}

// =============================================================================
// CONTAINER
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ContainerNode {
    pub system: SystemTrait,
    pub layer: LayerTrait,
    pub corner_radii: CornerRadii,
    pub corner_smoothing: f32,
    pub stroke_widths: StrokeWidths,
    pub stroke_style: StrokeStyle,
    pub fill_paints: Paints,
    pub stroke_paints: Paints,
    pub clips_content: bool,
}

impl ContainerNode {
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>) -> Self {
        Self {
            system: SystemTrait::new(id, name),
            layer: LayerTrait::default(),
            corner_radii: CornerRadii::default(),
            corner_smoothing: 0.0,
            stroke_widths: StrokeWidths::default(),
            stroke_style: StrokeStyle::default(),
            fill_paints: Vec::new(),
            stroke_paints: Vec::new(),
            clips_content: false,
        }
    }

    /// Widest side stroke.
    pub fn stroke_width(&self) -> f32 {
        self.stroke_widths.max()
    }
}

// =============================================================================
// TEXT
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct TextNode {
    pub system: SystemTrait,
    pub layer: LayerTrait,
    pub text: Option<String>,
    pub style: TextStyle,
    pub text_align: TextAlign,
    pub text_align_vertical: TextAlignVertical,
    pub max_lines: Option<u32>,
    pub ellipsis: Option<String>,
    pub stroke_width: f32,
    pub stroke_style: StrokeStyle,
    pub fill_paints: Paints,
    pub stroke_paints: Paints,
}

impl TextNode {
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            system: SystemTrait::new(id, name),
            layer: LayerTrait::default(),
            text: Some(text.into()),
            style: TextStyle::default(),
            text_align: TextAlign::Left,
            text_align_vertical: TextAlignVertical::Top,
            max_lines: None,
            ellipsis: None,
            stroke_width: 0.0,
            stroke_style: StrokeStyle::default(),
            fill_paints: Vec::new(),
            stroke_paints: Vec::new(),
        }
    }
}

// =============================================================================
// PATHS
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct LineNode {
    pub system: SystemTrait,
    pub layer: LayerTrait,
    pub stroke_width: f32,
    pub stroke_style: StrokeStyle,
    pub stroke_paints: Paints,
}

impl LineNode {
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>) -> Self {
        Self {
            system: SystemTrait::new(id, name),
            layer: LayerTrait::default(),
            stroke_width: 0.0,
            stroke_style: StrokeStyle::default(),
            stroke_paints: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VectorNode {
    pub system: SystemTrait,
    pub layer: LayerTrait,
    pub network: VectorNetwork,
    pub corner_radius: f32,
    pub corner_smoothing: f32,
    pub stroke_width: f32,
    pub stroke_style: StrokeStyle,
    pub fill_paints: Paints,
    pub stroke_paints: Paints,
}

impl VectorNode {
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>, network: VectorNetwork) -> Self {
        Self {
            system: SystemTrait::new(id, name),
            layer: LayerTrait::default(),
            network,
            corner_radius: 0.0,
            corner_smoothing: 0.0,
            stroke_width: 0.0,
            stroke_style: StrokeStyle::default(),
            fill_paints: Vec::new(),
            stroke_paints: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BooleanOperationNode {
    pub system: SystemTrait,
    pub layer: LayerTrait,
    pub op: BooleanOperation,
    pub corner_radius: f32,
    pub corner_smoothing: f32,
    pub stroke_width: f32,
    pub stroke_style: StrokeStyle,
    pub fill_paints: Paints,
    pub stroke_paints: Paints,
}

impl BooleanOperationNode {
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>, op: BooleanOperation) -> Self {
        Self {
            system: SystemTrait::new(id, name),
            layer: LayerTrait::default(),
            op,
            corner_radius: 0.0,
            corner_smoothing: 0.0,
            stroke_width: 0.0,
            stroke_style: StrokeStyle::default(),
            fill_paints: Vec::new(),
            stroke_paints: Vec::new(),
        }
    }
}

// =============================================================================
// GROUPING
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct GroupNode {
    pub system: SystemTrait,
    pub layer: LayerTrait,
}

impl GroupNode {
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>) -> Self {
        Self {
            system: SystemTrait::new(id, name),
            layer: LayerTrait::default(),
        }
    }
}

/// Placeholder for a node kind this version cannot represent.
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownNode {
    pub system: SystemTrait,
}

// =============================================================================
// NODE
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Scene(SceneNode),
    BasicShape(BasicShapeNode),
    Container(ContainerNode),
    Text(TextNode),
    Line(LineNode),
    Vector(VectorNode),
    BooleanOperation(BooleanOperationNode),
    Group(GroupNode),
    Unknown(UnknownNode),
}

impl Node {
    pub fn system(&self) -> &SystemTrait {
        match self {
            Node::Scene(n) => &n.system,
            Node::BasicShape(n) => &n.system,
            Node::Container(n) => &n.system,
            Node::Text(n) => &n.system,
            Node::Line(n) => &n.system,
            Node::Vector(n) => &n.system,
            Node::BooleanOperation(n) => &n.system,
            Node::Group(n) => &n.system,
            Node::Unknown(n) => &n.system,
        }
    }

    pub fn id(&self) -> &NodeId {
        &self.system().id
    }

    /// Returns the layer trait, or `None` for scenes and unknown nodes.
    pub fn layer(&self) -> Option<&LayerTrait> {
        match self {
            Node::Scene(_) | Node::Unknown(_) => None,
            Node::BasicShape(n) => Some(&n.layer),
            Node::Container(n) => Some(&n.layer),
            Node::Text(n) => Some(&n.layer),
            Node::Line(n) => Some(&n.layer),
            Node::Vector(n) => Some(&n.layer),
            Node::BooleanOperation(n) => Some(&n.layer),
            Node::Group(n) => Some(&n.layer),
        }
    }

    pub fn layer_mut(&mut self) -> Option<&mut LayerTrait> {
        match self {
            Node::Scene(_) | Node::Unknown(_) => None,
            Node::BasicShape(n) => Some(&mut n.layer),
            Node::Container(n) => Some(&mut n.layer),
            Node::Text(n) => Some(&mut n.layer),
            Node::Line(n) => Some(&mut n.layer),
            Node::Vector(n) => Some(&mut n.layer),
            Node::BooleanOperation(n) => Some(&mut n.layer),
            Node::Group(n) => Some(&mut n.layer),
        }
    }

    pub fn is_scene(&self) -> bool {
        matches!(self, Node::Scene(_))
    }

    /// Short kind name for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Scene(_) => "scene",
            Node::BasicShape(n) => match n.shape {
                BasicShape::Rectangle { .. } => "rectangle",
                BasicShape::Ellipse { .. } => "ellipse",
                BasicShape::RegularPolygon { .. } => "polygon",
                BasicShape::RegularStarPolygon { .. } => "star",
            },
            Node::Container(_) => "container",
            Node::Text(_) => "text",
            Node::Line(_) => "line",
            Node::Vector(_) => "vector",
            Node::BooleanOperation(_) => "boolean",
            Node::Group(_) => "group",
            Node::Unknown(_) => "unknown",
        }
    }
}

macro_rules! impl_from_variant {
    ($($variant:ident($ty:ty)),+ $(,)?) => {
        $(
            impl From<$ty> for Node {
                fn from(node: $ty) -> Self {
                    Node::$variant(node)
                }
            }
        )+
    };
}

impl_from_variant!(
    Scene(SceneNode),
    BasicShape(BasicShapeNode),
    Container(ContainerNode),
    Text(TextNode),
    Line(LineNode),
    Vector(VectorNode),
    BooleanOperation(BooleanOperationNode),
    Group(GroupNode),
    Unknown(UnknownNode),
);
