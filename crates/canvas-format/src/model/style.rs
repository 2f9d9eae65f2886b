//! Closed style enums shared across node kinds.

use crate::codec::enums::{WireEnum, wire_enum};

wire_enum! {
    /// Horizontal text alignment.
    pub enum TextAlign {
        Left = 0 => "left",
        Right = 1 => "right",
        Center = 2 => "center",
        Justify = 3 => "justify",
    }
    default = Left;
}

wire_enum! {
    /// Vertical text alignment inside the text box.
    pub enum TextAlignVertical {
        Top = 0 => "top",
        Center = 1 => "center",
        Bottom = 2 => "bottom",
    }
    default = Top;
}

wire_enum! {
    /// Text decoration line.
    pub enum TextDecorationLine {
        None = 0 => "none",
        Underline = 1 => "underline",
        Overline = 2 => "overline",
        LineThrough = 3 => "line-through",
    }
    default = None;
}

wire_enum! {
    /// Text decoration stroke style.
    pub enum TextDecorationStyle {
        Solid = 0 => "solid",
        Double = 1 => "double",
        Dotted = 2 => "dotted",
        Dashed = 3 => "dashed",
        Wavy = 4 => "wavy",
    }
    default = Solid;
}

wire_enum! {
    /// Stroke end cap.
    pub enum StrokeCap {
        Butt = 0 => "butt",
        Round = 1 => "round",
        Square = 2 => "square",
    }
    default = Butt;
}

wire_enum! {
    /// Stroke corner join.
    pub enum StrokeJoin {
        Miter = 0 => "miter",
        Round = 1 => "round",
        Bevel = 2 => "bevel",
    }
    default = Miter;
}

wire_enum! {
    /// Stroke placement relative to the geometry outline.
    pub enum StrokeAlign {
        Inside = 0 => "inside",
        Center = 1 => "center",
        Outside = 2 => "outside",
    }
    default = Inside;
}

wire_enum! {
    /// Separable and non-separable blend modes.
    pub enum BlendMode {
        Normal = 0 => "normal",
        Multiply = 1 => "multiply",
        Screen = 2 => "screen",
        Overlay = 3 => "overlay",
        Darken = 4 => "darken",
        Lighten = 5 => "lighten",
        ColorDodge = 6 => "color-dodge",
        ColorBurn = 7 => "color-burn",
        HardLight = 8 => "hard-light",
        SoftLight = 9 => "soft-light",
        Difference = 10 => "difference",
        Exclusion = 11 => "exclusion",
        Hue = 12 => "hue",
        Saturation = 13 => "saturation",
        Color = 14 => "color",
        Luminosity = 15 => "luminosity",
    }
    default = Normal;
}

wire_enum! {
    /// Channel used when a layer acts as an image mask.
    pub enum ImageMaskType {
        Alpha = 0 => "alpha",
        Luminance = 1 => "luminance",
    }
    default = Alpha;
}

wire_enum! {
    /// Layout axis.
    pub enum Axis {
        Horizontal = 0 => "horizontal",
        Vertical = 1 => "vertical",
    }
    default = Horizontal;
}

wire_enum! {
    /// Distribution of children along the main axis.
    ///
    /// Codes start at 1; code 0 means "not set".
    pub enum MainAxisAlignment {
        Start = 1 => "start",
        End = 2 => "end",
        Center = 3 => "center",
        SpaceBetween = 4 => "space-between",
        SpaceAround = 5 => "space-around",
        SpaceEvenly = 6 => "space-evenly",
        Stretch = 7 => "stretch",
    }
    default = Start;
}

wire_enum! {
    /// Placement of children along the cross axis.
    ///
    /// Codes start at 1; code 0 means "not set".
    pub enum CrossAxisAlignment {
        Start = 1 => "start",
        End = 2 => "end",
        Center = 3 => "center",
        Stretch = 4 => "stretch",
    }
    default = Start;
}

wire_enum! {
    /// Flex wrapping. Codes start at 1; code 0 means "not set".
    pub enum LayoutWrap {
        Wrap = 1 => "wrap",
        NoWrap = 2 => "nowrap",
    }
    default = NoWrap;
}

wire_enum! {
    /// Container layout mode.
    pub enum LayoutMode {
        Flow = 0 => "flow",
        Flex = 1 => "flex",
    }
    default = Flow;
}

wire_enum! {
    /// Whether a child participates in its parent's layout.
    pub enum LayoutPositioning {
        Relative = 0 => "relative",
        Absolute = 1 => "absolute",
    }
    default = Relative;
}

wire_enum! {
    /// How an image is scaled into its box.
    pub enum BoxFit {
        Contain = 0 => "contain",
        Cover = 1 => "cover",
        Fill = 2 => "fill",
        None = 3 => "none",
    }
    default = Cover;
}

wire_enum! {
    /// Tiling direction of an image paint.
    pub enum ImageRepeat {
        Repeat = 0 => "repeat",
        RepeatX = 1 => "repeat-x",
        RepeatY = 2 => "repeat-y",
    }
    default = Repeat;
}

wire_enum! {
    /// Path boolean operation.
    pub enum BooleanOperation {
        Union = 0 => "union",
        Intersection = 1 => "intersection",
        Difference = 2 => "difference",
        Xor = 3 => "xor",
    }
    default = Union;
}

wire_enum! {
    /// How many direct children a scene accepts.
    pub enum SceneChildren {
        Multiple = 0 => "multiple",
        Single = 1 => "single",
    }
    default = Multiple;
}

/// Blend mode of a whole layer; `PassThrough` composites children directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LayerBlendMode {
    #[default]
    PassThrough,
    Blend(BlendMode),
}

impl WireEnum for LayerBlendMode {
    fn code(self) -> u8 {
        match self {
            LayerBlendMode::PassThrough => 0,
            LayerBlendMode::Blend(mode) => mode.code() + 1,
        }
    }

    fn try_from_code(code: u64) -> Option<Self> {
        match code {
            0 => Some(LayerBlendMode::PassThrough),
            n => BlendMode::try_from_code(n - 1).map(LayerBlendMode::Blend),
        }
    }
}

/// What a layer contributes when used as a mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerMaskType {
    Image(ImageMaskType),
    Geometry,
}

impl Default for LayerMaskType {
    fn default() -> Self {
        LayerMaskType::Image(ImageMaskType::Alpha)
    }
}

/// Stroke appearance shared by every stroked node.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeStyle {
    pub cap: StrokeCap,
    pub join: StrokeJoin,
    pub align: StrokeAlign,
    pub miter_limit: f32,
    pub dash_array: Vec<f32>,
}

impl StrokeStyle {
    pub const DEFAULT_MITER_LIMIT: f32 = 4.0;
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            cap: StrokeCap::default(),
            join: StrokeJoin::default(),
            align: StrokeAlign::default(),
            miter_limit: Self::DEFAULT_MITER_LIMIT,
            dash_array: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_blend_mode_codes() {
        assert_eq!(LayerBlendMode::PassThrough.code(), 0);
        for mode in BlendMode::ALL {
            let layer = LayerBlendMode::Blend(*mode);
            assert_eq!(LayerBlendMode::from_code(layer.code() as u64), layer);
        }
        assert_eq!(LayerBlendMode::from_code(200), LayerBlendMode::PassThrough);
    }
}
