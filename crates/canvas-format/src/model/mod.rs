//! In-memory document model.

pub mod builder;
pub mod document;
pub mod effects;
pub mod geometry;
pub mod id;
pub mod layout;
pub mod node;
pub mod order_key;
pub mod paint;
pub mod style;
pub mod text;
pub mod vector;

pub use builder::{ChildrenBuilder, DocumentBuilder};
pub use document::{Bitmap, CanvasFile, Document, ImageResource, NodeId, PropertyDefinition};
pub use effects::{FeBlur, FeBlurEffect, FeLiquidGlass, FeNoise, FeShadow, LayerEffects, NoiseColoring};
pub use geometry::{Alignment, CornerRadii, EdgeInsets, Point2D, Rgba32F, StrokeWidths, Transform2D};
pub use id::{derived_node_id, new_node_id};
pub use layout::{ContainerStyle, Layout, Length, PositionBasis};
pub use node::{
    BasicShape, BasicShapeNode, BooleanOperationNode, ContainerNode, Edge, EdgePoint, GroupNode,
    Guide, LayerTrait, LineNode, Node, SceneNode, SystemTrait, TextNode, UnknownNode, VectorNode,
};
pub use paint::{
    GradientPaint, GradientStop, ImageFilters, ImagePaint, ImagePaintFit, Paint, PaintColor,
    Paints, SolidPaint,
};
pub use style::{
    Axis, BlendMode, BooleanOperation, BoxFit, CrossAxisAlignment, ImageMaskType, ImageRepeat,
    LayerBlendMode, LayerMaskType, LayoutMode, LayoutPositioning, LayoutWrap, MainAxisAlignment,
    SceneChildren, StrokeAlign, StrokeCap, StrokeJoin, StrokeStyle, TextAlign, TextAlignVertical,
    TextDecorationLine, TextDecorationStyle,
};
pub use text::{FontFeatureTag, TextDecoration, TextStyle};
pub use vector::{VectorNetwork, VectorSegment};
