//! Layer effects: blurs, shadows, liquid glass and noise.

use crate::model::geometry::{Alignment, Rgba32F};
use crate::model::style::BlendMode;

/// Blur kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeBlur {
    Gaussian {
        radius: f32,
    },
    /// Radius ramps from `radius` at `start` to `radius2` at `end`.
    Progressive {
        start: Alignment,
        end: Alignment,
        radius: f32,
        radius2: f32,
    },
}

impl Default for FeBlur {
    fn default() -> Self {
        FeBlur::Gaussian { radius: 0.0 }
    }
}

/// A layer or backdrop blur.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeBlurEffect {
    pub blur: FeBlur,
    pub active: bool,
}

impl FeBlurEffect {
    pub fn gaussian(radius: f32) -> Self {
        Self {
            blur: FeBlur::Gaussian { radius },
            active: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeShadow {
    /// Inner shadow when true, drop shadow otherwise.
    pub inset: bool,
    pub dx: f32,
    pub dy: f32,
    pub blur: f32,
    pub spread: f32,
    pub color: Rgba32F,
    pub active: bool,
}

impl Default for FeShadow {
    fn default() -> Self {
        Self {
            inset: false,
            dx: 0.0,
            dy: 0.0,
            blur: 0.0,
            spread: 0.0,
            color: Rgba32F::new(0.0, 0.0, 0.0, 0.25),
            active: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeLiquidGlass {
    pub light_intensity: f32,
    /// Degrees.
    pub light_angle: f32,
    pub refraction: f32,
    pub depth: f32,
    pub dispersion: f32,
    pub blur_radius: f32,
    pub active: bool,
}

impl Default for FeLiquidGlass {
    fn default() -> Self {
        Self {
            light_intensity: 0.7,
            light_angle: 45.0,
            refraction: 0.8,
            depth: 20.0,
            dispersion: 0.5,
            blur_radius: 4.0,
            active: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoiseColoring {
    Mono { color: Rgba32F },
    Duo { color1: Rgba32F, color2: Rgba32F },
    Multi { opacity: f32 },
}

impl Default for NoiseColoring {
    fn default() -> Self {
        NoiseColoring::Mono {
            color: Rgba32F::new(0.0, 0.0, 0.0, 0.15),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeNoise {
    pub noise_size: f32,
    pub density: f32,
    pub num_octaves: u32,
    pub seed: f32,
    pub coloring: NoiseColoring,
    pub active: bool,
    pub blend_mode: BlendMode,
}

impl FeNoise {
    pub const DEFAULT_OCTAVES: u32 = 3;
}

impl Default for FeNoise {
    fn default() -> Self {
        Self {
            noise_size: 0.5,
            density: 0.5,
            num_octaves: Self::DEFAULT_OCTAVES,
            seed: 0.0,
            coloring: NoiseColoring::default(),
            active: true,
            blend_mode: BlendMode::Normal,
        }
    }
}

/// The effect stack of a layer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayerEffects {
    pub blur: Option<FeBlurEffect>,
    pub backdrop_blur: Option<FeBlurEffect>,
    pub shadows: Vec<FeShadow>,
    pub liquid_glass: Option<FeLiquidGlass>,
    pub noises: Vec<FeNoise>,
}

impl LayerEffects {
    pub fn is_empty(&self) -> bool {
        self.blur.is_none()
            && self.backdrop_blur.is_none()
            && self.shadows.is_empty()
            && self.liquid_glass.is_none()
            && self.noises.is_empty()
    }
}
