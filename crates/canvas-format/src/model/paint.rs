//! Paints: the fill and stroke layers of a node.
//!
//! A node holds an ordered stack of paints. Later entries are composited
//! on top of earlier ones and each entry can be disabled individually.

use crate::model::geometry::{Rgba32F, Transform2D};
use crate::model::style::{BlendMode, BoxFit, ImageRepeat};

/// An ordered paint stack.
pub type Paints = Vec<Paint>;

/// A solid paint color, either concrete or still bound to a design token.
#[derive(Debug, Clone, PartialEq)]
pub enum PaintColor {
    Rgba(Rgba32F),
    /// Unresolved token reference. Not persisted.
    Token(String),
}

impl PaintColor {
    /// Returns the concrete color, if resolved.
    pub fn resolved(&self) -> Option<Rgba32F> {
        match self {
            PaintColor::Rgba(c) => Some(*c),
            PaintColor::Token(_) => None,
        }
    }
}

impl From<Rgba32F> for PaintColor {
    fn from(c: Rgba32F) -> Self {
        PaintColor::Rgba(c)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolidPaint {
    pub color: PaintColor,
    pub blend_mode: BlendMode,
    pub active: bool,
}

impl SolidPaint {
    pub fn new(color: Rgba32F) -> Self {
        Self {
            color: PaintColor::Rgba(color),
            blend_mode: BlendMode::Normal,
            active: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    /// Position along the gradient in [0, 1].
    pub offset: f32,
    pub color: Rgba32F,
}

/// Shared payload of all gradient kinds.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientPaint {
    pub transform: Transform2D,
    pub stops: Vec<GradientStop>,
    pub opacity: f32,
    pub blend_mode: BlendMode,
    pub active: bool,
}

impl GradientPaint {
    pub fn new(stops: Vec<GradientStop>) -> Self {
        Self {
            transform: Transform2D::IDENTITY,
            stops,
            opacity: 1.0,
            blend_mode: BlendMode::Normal,
            active: true,
        }
    }
}

/// How an image is placed inside its node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImagePaintFit {
    Box(BoxFit),
    Transform(Transform2D),
    Tile { scale: f32, repeat: ImageRepeat },
}

impl Default for ImagePaintFit {
    fn default() -> Self {
        ImagePaintFit::Box(BoxFit::default())
    }
}

/// Color adjustments applied to an image paint. All zero is neutral.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ImageFilters {
    pub exposure: f32,
    pub contrast: f32,
    pub saturation: f32,
    pub temperature: f32,
    pub tint: f32,
    pub highlights: f32,
    pub shadows: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImagePaint {
    /// Resource reference of the image.
    pub src: String,
    pub fit: ImagePaintFit,
    /// Clockwise rotation in 90 degree steps.
    pub quarter_turns: u8,
    pub opacity: f32,
    pub blend_mode: BlendMode,
    pub active: bool,
    pub filters: ImageFilters,
}

impl ImagePaint {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            fit: ImagePaintFit::default(),
            quarter_turns: 0,
            opacity: 1.0,
            blend_mode: BlendMode::Normal,
            active: true,
            filters: ImageFilters::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(SolidPaint),
    LinearGradient(GradientPaint),
    RadialGradient(GradientPaint),
    SweepGradient(GradientPaint),
    DiamondGradient(GradientPaint),
    Image(ImagePaint),
}

impl Paint {
    /// Shorthand for an active, normal-blended solid paint.
    pub fn solid(color: Rgba32F) -> Self {
        Paint::Solid(SolidPaint::new(color))
    }

    pub fn is_active(&self) -> bool {
        match self {
            Paint::Solid(p) => p.active,
            Paint::LinearGradient(g)
            | Paint::RadialGradient(g)
            | Paint::SweepGradient(g)
            | Paint::DiamondGradient(g) => g.active,
            Paint::Image(i) => i.active,
        }
    }
}
