//! Node positioning, sizing and container layout.

use crate::codec::enums::wire_enum;
use crate::model::geometry::EdgeInsets;
use crate::model::style::{
    Axis, CrossAxisAlignment, LayoutMode, LayoutPositioning, LayoutWrap, MainAxisAlignment,
};

wire_enum! {
    /// Which coordinates anchor a node inside its parent.
    pub enum PositionBasis {
        /// `left`/`top` offsets.
        Cartesian = 0 => "cartesian",
        /// Any subset of the four edge insets.
        Inset = 1 => "inset",
    }
    default = Cartesian;
}

/// A size along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Length {
    #[default]
    Auto,
    Px(f32),
    /// Percentage of the parent, where 100 is the full size.
    Percent(f32),
}

/// Flex/flow settings of a node that lays out its children.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContainerStyle {
    pub mode: LayoutMode,
    pub direction: Axis,
    pub wrap: Option<LayoutWrap>,
    pub main_axis_alignment: Option<MainAxisAlignment>,
    pub cross_axis_alignment: Option<CrossAxisAlignment>,
    pub main_axis_gap: f32,
    pub cross_axis_gap: f32,
    pub padding: EdgeInsets,
}

/// Position and size of a node.
///
/// Each inset is optional: an absent inset is distinct from a zero inset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Layout {
    pub positioning: LayoutPositioning,
    pub left: Option<f32>,
    pub top: Option<f32>,
    pub right: Option<f32>,
    pub bottom: Option<f32>,
    pub width: Length,
    pub height: Length,
    /// Degrees, clockwise.
    pub rotation: f32,
    pub container: Option<ContainerStyle>,
}

impl Layout {
    /// Absolutely positioned at `(left, top)` with a fixed size.
    pub fn fixed(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            positioning: LayoutPositioning::Absolute,
            left: Some(left),
            top: Some(top),
            width: Length::Px(width),
            height: Length::Px(height),
            ..Self::default()
        }
    }

    /// Inset basis is used whenever `right` or `bottom` is set.
    pub fn position_basis(&self) -> PositionBasis {
        if self.right.is_some() || self.bottom.is_some() {
            PositionBasis::Inset
        } else {
            PositionBasis::Cartesian
        }
    }
}
