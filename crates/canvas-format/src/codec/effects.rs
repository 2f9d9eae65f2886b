//! Layer effect tables.

use crate::codec::table::{BuiltTable, BuiltVector, Table, TableBuilder};
use crate::error::DecodeError;
use crate::model::{
    Alignment, FeBlur, FeBlurEffect, FeLiquidGlass, FeNoise, FeShadow, LayerEffects,
    NoiseColoring, Rgba32F,
};

const EFFECTS_BLUR: u32 = 1;
const EFFECTS_BACKDROP_BLUR: u32 = 2;
const EFFECTS_SHADOWS: u32 = 3;
const EFFECTS_LIQUID_GLASS: u32 = 4;
const EFFECTS_NOISES: u32 = 5;

const BLUR_ACTIVE: u32 = 1;
const BLUR_TYPE: u32 = 2;
const BLUR_PAYLOAD: u32 = 3;

const BLUR_GAUSSIAN: u64 = 1;
const BLUR_PROGRESSIVE: u64 = 2;

const GAUSSIAN_RADIUS: u32 = 1;

const PROGRESSIVE_RADIUS: u32 = 1;
const PROGRESSIVE_RADIUS2: u32 = 2;
const PROGRESSIVE_START: u32 = 3;
const PROGRESSIVE_END: u32 = 4;

const SHADOW_KIND: u32 = 1;
const SHADOW_DX: u32 = 2;
const SHADOW_DY: u32 = 3;
const SHADOW_BLUR: u32 = 4;
const SHADOW_SPREAD: u32 = 5;
const SHADOW_ACTIVE: u32 = 6;
const SHADOW_COLOR: u32 = 7;

const SHADOW_DROP: u64 = 0;
const SHADOW_INNER: u64 = 1;

const GLASS_LIGHT_INTENSITY: u32 = 1;
const GLASS_LIGHT_ANGLE: u32 = 2;
const GLASS_REFRACTION: u32 = 3;
const GLASS_DEPTH: u32 = 4;
const GLASS_DISPERSION: u32 = 5;
const GLASS_BLUR_RADIUS: u32 = 6;
const GLASS_ACTIVE: u32 = 7;

const NOISE_SIZE: u32 = 1;
const NOISE_DENSITY: u32 = 2;
const NOISE_OCTAVES: u32 = 3;
const NOISE_SEED: u32 = 4;
const NOISE_ACTIVE: u32 = 5;
const NOISE_BLEND_MODE: u32 = 6;
const NOISE_COLORING_TYPE: u32 = 7;
const NOISE_COLORING: u32 = 8;

const COLORING_MONO: u64 = 1;
const COLORING_DUO: u64 = 2;
const COLORING_MULTI: u64 = 3;

// =============================================================================
// ENCODING
// =============================================================================

/// Encodes the effects of a layer; returns `None` when there are none.
pub fn encode_effects(effects: &LayerEffects) -> Option<BuiltTable> {
    if effects.is_empty() {
        return None;
    }
    let blur = effects.blur.as_ref().map(encode_blur);
    let backdrop_blur = effects.backdrop_blur.as_ref().map(encode_blur);
    let shadows = BuiltVector::tables(effects.shadows.iter().map(encode_shadow));
    let liquid_glass = effects.liquid_glass.as_ref().map(encode_liquid_glass);
    let noises = BuiltVector::tables(effects.noises.iter().map(encode_noise));

    let mut t = TableBuilder::new();
    if let Some(blur) = &blur {
        t.table(EFFECTS_BLUR, blur);
    }
    if let Some(blur) = &backdrop_blur {
        t.table(EFFECTS_BACKDROP_BLUR, blur);
    }
    if !effects.shadows.is_empty() {
        t.vector(EFFECTS_SHADOWS, &shadows);
    }
    if let Some(glass) = &liquid_glass {
        t.table(EFFECTS_LIQUID_GLASS, glass);
    }
    if !effects.noises.is_empty() {
        t.vector(EFFECTS_NOISES, &noises);
    }
    Some(t.finish())
}

fn encode_blur(effect: &FeBlurEffect) -> BuiltTable {
    let mut payload = TableBuilder::new();
    let kind = match effect.blur {
        FeBlur::Gaussian { radius } => {
            payload.f32(GAUSSIAN_RADIUS, radius);
            BLUR_GAUSSIAN
        }
        FeBlur::Progressive {
            start,
            end,
            radius,
            radius2,
        } => {
            payload.f32(PROGRESSIVE_RADIUS, radius);
            payload.f32(PROGRESSIVE_RADIUS2, radius2);
            payload.inline(PROGRESSIVE_START, &start);
            payload.inline(PROGRESSIVE_END, &end);
            BLUR_PROGRESSIVE
        }
    };
    let payload = payload.finish();

    let mut t = TableBuilder::new();
    t.bool(BLUR_ACTIVE, effect.active);
    t.varint(BLUR_TYPE, kind);
    t.table(BLUR_PAYLOAD, &payload);
    t.finish()
}

fn encode_shadow(shadow: &FeShadow) -> BuiltTable {
    let mut t = TableBuilder::new();
    t.varint(SHADOW_KIND, if shadow.inset { SHADOW_INNER } else { SHADOW_DROP });
    t.f32(SHADOW_DX, shadow.dx);
    t.f32(SHADOW_DY, shadow.dy);
    t.f32(SHADOW_BLUR, shadow.blur);
    t.f32(SHADOW_SPREAD, shadow.spread);
    t.bool(SHADOW_ACTIVE, shadow.active);
    t.inline(SHADOW_COLOR, &shadow.color);
    t.finish()
}

fn encode_liquid_glass(glass: &FeLiquidGlass) -> BuiltTable {
    let mut t = TableBuilder::new();
    t.f32(GLASS_LIGHT_INTENSITY, glass.light_intensity);
    t.f32(GLASS_LIGHT_ANGLE, glass.light_angle);
    t.f32(GLASS_REFRACTION, glass.refraction);
    t.f32(GLASS_DEPTH, glass.depth);
    t.f32(GLASS_DISPERSION, glass.dispersion);
    t.f32(GLASS_BLUR_RADIUS, glass.blur_radius);
    t.bool(GLASS_ACTIVE, glass.active);
    t.finish()
}

fn encode_noise(noise: &FeNoise) -> BuiltTable {
    let mut coloring = TableBuilder::new();
    let coloring_type = match noise.coloring {
        NoiseColoring::Mono { color } => {
            coloring.inline(1, &color);
            COLORING_MONO
        }
        NoiseColoring::Duo { color1, color2 } => {
            coloring.inline(1, &color1);
            coloring.inline(2, &color2);
            COLORING_DUO
        }
        NoiseColoring::Multi { opacity } => {
            coloring.f32(1, opacity);
            COLORING_MULTI
        }
    };
    let coloring = coloring.finish();

    let mut t = TableBuilder::new();
    t.f32(NOISE_SIZE, noise.noise_size);
    t.f32(NOISE_DENSITY, noise.density);
    t.varint(NOISE_OCTAVES, noise.num_octaves as u64);
    t.f32(NOISE_SEED, noise.seed);
    t.bool(NOISE_ACTIVE, noise.active);
    t.code(NOISE_BLEND_MODE, noise.blend_mode);
    t.varint(NOISE_COLORING_TYPE, coloring_type);
    t.table(NOISE_COLORING, &coloring);
    t.finish()
}

// =============================================================================
// DECODING
// =============================================================================

/// Decodes a layer's effects; an absent table means no effects.
pub fn decode_effects(table: Option<&Table<'_>>) -> Result<LayerEffects, DecodeError> {
    let Some(t) = table else {
        return Ok(LayerEffects::default());
    };
    let shadows = match t.vector(EFFECTS_SHADOWS, "shadows")? {
        Some(v) => v
            .tables("shadow")?
            .iter()
            .map(decode_shadow)
            .collect::<Result<_, _>>()?,
        None => Vec::new(),
    };
    let noises = match t.vector(EFFECTS_NOISES, "noises")? {
        Some(v) => v
            .tables("noise")?
            .iter()
            .map(decode_noise)
            .collect::<Result<_, _>>()?,
        None => Vec::new(),
    };
    Ok(LayerEffects {
        blur: t
            .table(EFFECTS_BLUR, "blur")?
            .map(|b| decode_blur(&b))
            .transpose()?,
        backdrop_blur: t
            .table(EFFECTS_BACKDROP_BLUR, "backdrop blur")?
            .map(|b| decode_blur(&b))
            .transpose()?,
        shadows,
        liquid_glass: t
            .table(EFFECTS_LIQUID_GLASS, "liquid glass")?
            .map(|g| decode_liquid_glass(&g)),
        noises,
    })
}

fn decode_blur(t: &Table<'_>) -> Result<FeBlurEffect, DecodeError> {
    let payload = t.table(BLUR_PAYLOAD, "blur payload")?;
    let blur = match (t.varint(BLUR_TYPE), &payload) {
        (Some(BLUR_PROGRESSIVE), Some(p)) => FeBlur::Progressive {
            start: p.inline(PROGRESSIVE_START)?.unwrap_or(Alignment::TOP_CENTER),
            end: p.inline(PROGRESSIVE_END)?.unwrap_or(Alignment::BOTTOM_CENTER),
            radius: p.f32(PROGRESSIVE_RADIUS).unwrap_or(0.0),
            radius2: p.f32(PROGRESSIVE_RADIUS2).unwrap_or(0.0),
        },
        (Some(BLUR_GAUSSIAN), Some(p)) => FeBlur::Gaussian {
            radius: p.f32(GAUSSIAN_RADIUS).unwrap_or(0.0),
        },
        (kind, _) => {
            tracing::debug!(?kind, "blur without recognised payload, using default");
            FeBlur::default()
        }
    };
    Ok(FeBlurEffect {
        blur,
        active: t.bool(BLUR_ACTIVE).unwrap_or(true),
    })
}

fn decode_shadow(t: &Table<'_>) -> Result<FeShadow, DecodeError> {
    let defaults = FeShadow::default();
    Ok(FeShadow {
        inset: t.varint(SHADOW_KIND) == Some(SHADOW_INNER),
        dx: t.f32(SHADOW_DX).unwrap_or(defaults.dx),
        dy: t.f32(SHADOW_DY).unwrap_or(defaults.dy),
        blur: t.f32(SHADOW_BLUR).unwrap_or(defaults.blur),
        spread: t.f32(SHADOW_SPREAD).unwrap_or(defaults.spread),
        color: t.inline(SHADOW_COLOR)?.unwrap_or(defaults.color),
        active: t.bool(SHADOW_ACTIVE).unwrap_or(true),
    })
}

fn decode_liquid_glass(t: &Table<'_>) -> FeLiquidGlass {
    let d = FeLiquidGlass::default();
    FeLiquidGlass {
        light_intensity: t.f32(GLASS_LIGHT_INTENSITY).unwrap_or(d.light_intensity),
        light_angle: t.f32(GLASS_LIGHT_ANGLE).unwrap_or(d.light_angle),
        refraction: t.f32(GLASS_REFRACTION).unwrap_or(d.refraction),
        depth: t.f32(GLASS_DEPTH).unwrap_or(d.depth),
        dispersion: t.f32(GLASS_DISPERSION).unwrap_or(d.dispersion),
        blur_radius: t.f32(GLASS_BLUR_RADIUS).unwrap_or(d.blur_radius),
        active: t.bool(GLASS_ACTIVE).unwrap_or(true),
    }
}

fn decode_noise(t: &Table<'_>) -> Result<FeNoise, DecodeError> {
    let d = FeNoise::default();
    let coloring_table = t.table(NOISE_COLORING, "noise coloring")?;
    let coloring = match (t.varint(NOISE_COLORING_TYPE), &coloring_table) {
        (Some(COLORING_MONO), Some(c)) => NoiseColoring::Mono {
            color: c.inline(1)?.unwrap_or(Rgba32F::BLACK),
        },
        (Some(COLORING_DUO), Some(c)) => NoiseColoring::Duo {
            color1: c.inline(1)?.unwrap_or(Rgba32F::BLACK),
            color2: c.inline(2)?.unwrap_or(Rgba32F::WHITE),
        },
        (Some(COLORING_MULTI), Some(c)) => NoiseColoring::Multi {
            opacity: c.f32(1).unwrap_or(1.0),
        },
        _ => d.coloring,
    };
    Ok(FeNoise {
        noise_size: t.f32(NOISE_SIZE).unwrap_or(d.noise_size),
        density: t.f32(NOISE_DENSITY).unwrap_or(d.density),
        num_octaves: t.u32(NOISE_OCTAVES).unwrap_or(d.num_octaves),
        seed: t.f32(NOISE_SEED).unwrap_or(d.seed),
        coloring,
        active: t.bool(NOISE_ACTIVE).unwrap_or(true),
        blend_mode: t.code(NOISE_BLEND_MODE),
    })
}
