//! Paint stack encoding/decoding.
//!
//! A paint stack is a vector of items, each a `{kind, paint}` union. Solid
//! paints whose color is still a token are dropped on encode; items with
//! an unknown kind are skipped on decode.

use crate::codec::table::{BuiltTable, BuiltVector, Table, TableBuilder};
use crate::error::DecodeError;
use crate::model::{
    BlendMode, GradientPaint, GradientStop, ImageFilters, ImagePaint, ImagePaintFit, Paint,
    PaintColor, Paints, Rgba32F, SolidPaint, Transform2D,
};

const PAINT_SOLID: u64 = 1;
const PAINT_LINEAR_GRADIENT: u64 = 2;
const PAINT_RADIAL_GRADIENT: u64 = 3;
const PAINT_SWEEP_GRADIENT: u64 = 4;
const PAINT_DIAMOND_GRADIENT: u64 = 5;
const PAINT_IMAGE: u64 = 6;

// Stack item
const ITEM_KIND: u32 = 1;
const ITEM_PAINT: u32 = 2;

// Solid
const SOLID_ACTIVE: u32 = 1;
const SOLID_BLEND_MODE: u32 = 2;
const SOLID_COLOR: u32 = 3;

// Gradient
const GRADIENT_ACTIVE: u32 = 1;
const GRADIENT_STOPS: u32 = 2;
const GRADIENT_OPACITY: u32 = 3;
const GRADIENT_BLEND_MODE: u32 = 4;
const GRADIENT_TRANSFORM: u32 = 5;

// Image
const IMAGE_ACTIVE: u32 = 1;
const IMAGE_SRC: u32 = 2;
const IMAGE_FIT_TYPE: u32 = 3;
const IMAGE_FIT: u32 = 4;
const IMAGE_QUARTER_TURNS: u32 = 5;
const IMAGE_OPACITY: u32 = 6;
const IMAGE_BLEND_MODE: u32 = 7;
const IMAGE_FILTERS: u32 = 8;

const FIT_BOX: u64 = 1;
const FIT_TRANSFORM: u64 = 2;
const FIT_TILE: u64 = 3;

const FIT_BOX_MODE: u32 = 1;
const FIT_TRANSFORM_MATRIX: u32 = 1;
const FIT_TILE_SCALE: u32 = 1;
const FIT_TILE_REPEAT: u32 = 2;

// =============================================================================
// ENCODING
// =============================================================================

/// Encodes a paint stack, preserving order and dropping unresolved paints.
pub fn encode_paints(paints: &[Paint]) -> BuiltVector {
    BuiltVector::tables(paints.iter().filter_map(encode_paint_item))
}

fn encode_paint_item(paint: &Paint) -> Option<BuiltTable> {
    let (kind, payload) = match paint {
        Paint::Solid(solid) => {
            let Some(color) = solid.color.resolved() else {
                tracing::debug!("dropping solid paint with unresolved color");
                return None;
            };
            (PAINT_SOLID, encode_solid(solid, &color))
        }
        Paint::LinearGradient(g) => (PAINT_LINEAR_GRADIENT, encode_gradient(g)),
        Paint::RadialGradient(g) => (PAINT_RADIAL_GRADIENT, encode_gradient(g)),
        Paint::SweepGradient(g) => (PAINT_SWEEP_GRADIENT, encode_gradient(g)),
        Paint::DiamondGradient(g) => (PAINT_DIAMOND_GRADIENT, encode_gradient(g)),
        Paint::Image(image) => (PAINT_IMAGE, encode_image(image)),
    };

    let mut item = TableBuilder::new();
    item.varint(ITEM_KIND, kind);
    item.table(ITEM_PAINT, &payload);
    Some(item.finish())
}

fn encode_solid(solid: &SolidPaint, color: &Rgba32F) -> BuiltTable {
    let mut t = TableBuilder::new();
    t.bool(SOLID_ACTIVE, solid.active);
    t.code(SOLID_BLEND_MODE, solid.blend_mode);
    t.inline(SOLID_COLOR, color);
    t.finish()
}

fn encode_gradient(g: &GradientPaint) -> BuiltTable {
    let stops = BuiltVector::structs(&g.stops);

    let mut t = TableBuilder::new();
    t.bool(GRADIENT_ACTIVE, g.active);
    t.vector(GRADIENT_STOPS, &stops);
    t.f32(GRADIENT_OPACITY, g.opacity);
    t.code(GRADIENT_BLEND_MODE, g.blend_mode);
    t.inline(GRADIENT_TRANSFORM, &g.transform);
    t.finish()
}

fn encode_image(image: &ImagePaint) -> BuiltTable {
    let (fit_type, fit) = encode_image_fit(&image.fit);

    let mut t = TableBuilder::new();
    t.bool(IMAGE_ACTIVE, image.active);
    t.string(IMAGE_SRC, &image.src);
    t.varint(IMAGE_FIT_TYPE, fit_type);
    t.table(IMAGE_FIT, &fit);
    t.varint(IMAGE_QUARTER_TURNS, (image.quarter_turns % 4) as u64);
    t.f32(IMAGE_OPACITY, image.opacity);
    t.code(IMAGE_BLEND_MODE, image.blend_mode);
    t.inline(IMAGE_FILTERS, &image.filters);
    t.finish()
}

fn encode_image_fit(fit: &ImagePaintFit) -> (u64, BuiltTable) {
    let mut t = TableBuilder::new();
    let kind = match fit {
        ImagePaintFit::Box(mode) => {
            t.code(FIT_BOX_MODE, *mode);
            FIT_BOX
        }
        ImagePaintFit::Transform(transform) => {
            t.inline(FIT_TRANSFORM_MATRIX, transform);
            FIT_TRANSFORM
        }
        ImagePaintFit::Tile { scale, repeat } => {
            t.f32(FIT_TILE_SCALE, *scale);
            t.code(FIT_TILE_REPEAT, *repeat);
            FIT_TILE
        }
    };
    (kind, t.finish())
}

// =============================================================================
// DECODING
// =============================================================================

/// Decodes the paint stack stored in `field` of `table`.
///
/// An absent field yields an empty stack.
pub fn decode_paints(table: &Table<'_>, field: u32) -> Result<Paints, DecodeError> {
    let Some(vector) = table.vector(field, "paints")? else {
        return Ok(Vec::new());
    };
    let items = vector.tables("paint item")?;
    let mut paints = Vec::with_capacity(items.len());
    for item in &items {
        let (Some(kind), Some(payload)) = (item.varint(ITEM_KIND), item.table(ITEM_PAINT, "paint")?)
        else {
            tracing::debug!("skipping paint item without kind or payload");
            continue;
        };
        let paint = match kind {
            PAINT_SOLID => Paint::Solid(decode_solid(&payload)?),
            PAINT_LINEAR_GRADIENT => Paint::LinearGradient(decode_gradient(&payload)?),
            PAINT_RADIAL_GRADIENT => Paint::RadialGradient(decode_gradient(&payload)?),
            PAINT_SWEEP_GRADIENT => Paint::SweepGradient(decode_gradient(&payload)?),
            PAINT_DIAMOND_GRADIENT => Paint::DiamondGradient(decode_gradient(&payload)?),
            PAINT_IMAGE => Paint::Image(decode_image(&payload)?),
            other => {
                tracing::debug!(kind = other, "skipping paint with unknown kind");
                continue;
            }
        };
        paints.push(paint);
    }
    Ok(paints)
}

fn decode_solid(t: &Table<'_>) -> Result<SolidPaint, DecodeError> {
    Ok(SolidPaint {
        color: PaintColor::Rgba(t.inline(SOLID_COLOR)?.unwrap_or(Rgba32F::BLACK)),
        blend_mode: t.code::<BlendMode>(SOLID_BLEND_MODE),
        active: t.bool(SOLID_ACTIVE).unwrap_or(true),
    })
}

fn decode_gradient(t: &Table<'_>) -> Result<GradientPaint, DecodeError> {
    let stops = match t.vector(GRADIENT_STOPS, "gradient stops")? {
        Some(v) => v.structs::<GradientStop>()?,
        None => Vec::new(),
    };
    Ok(GradientPaint {
        transform: t.inline(GRADIENT_TRANSFORM)?.unwrap_or(Transform2D::IDENTITY),
        stops,
        opacity: t.f32(GRADIENT_OPACITY).unwrap_or(1.0),
        blend_mode: t.code(GRADIENT_BLEND_MODE),
        active: t.bool(GRADIENT_ACTIVE).unwrap_or(true),
    })
}

fn decode_image(t: &Table<'_>) -> Result<ImagePaint, DecodeError> {
    let fit_table = t.table(IMAGE_FIT, "image fit")?;
    let fit = match (t.varint(IMAGE_FIT_TYPE), &fit_table) {
        (Some(FIT_BOX), Some(f)) => ImagePaintFit::Box(f.code(FIT_BOX_MODE)),
        (Some(FIT_TRANSFORM), Some(f)) => {
            ImagePaintFit::Transform(f.inline(FIT_TRANSFORM_MATRIX)?.unwrap_or_default())
        }
        (Some(FIT_TILE), Some(f)) => ImagePaintFit::Tile {
            scale: f.f32(FIT_TILE_SCALE).unwrap_or(1.0),
            repeat: f.code(FIT_TILE_REPEAT),
        },
        _ => ImagePaintFit::default(),
    };
    let quarter_turns = t.varint(IMAGE_QUARTER_TURNS).map_or(0, |q| (q % 4) as u8);
    Ok(ImagePaint {
        src: t.string(IMAGE_SRC)?.unwrap_or_default(),
        fit,
        quarter_turns,
        opacity: t.f32(IMAGE_OPACITY).unwrap_or(1.0),
        blend_mode: t.code(IMAGE_BLEND_MODE),
        active: t.bool(IMAGE_ACTIVE).unwrap_or(true),
        filters: t.inline::<ImageFilters>(IMAGE_FILTERS)?.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoxFit, ImageRepeat};

    fn roundtrip(paints: &[Paint]) -> Paints {
        let vector = encode_paints(paints);
        let mut holder = TableBuilder::new();
        holder.vector(1, &vector);
        let built = holder.finish();
        let table = Table::parse(built.as_bytes(), "holder").unwrap();
        decode_paints(&table, 1).unwrap()
    }

    fn stops() -> Vec<GradientStop> {
        vec![
            GradientStop {
                offset: 0.0,
                color: Rgba32F::new(1.0, 0.0, 0.0, 1.0),
            },
            GradientStop {
                offset: 1.0,
                color: Rgba32F::new(0.0, 0.0, 1.0, 1.0),
            },
        ]
    }

    #[test]
    fn test_every_paint_kind_roundtrips_in_order() {
        let mut radial = GradientPaint::new(stops());
        radial.transform = Transform2D::translate(0.5, 0.5);
        radial.opacity = 0.5;
        radial.blend_mode = BlendMode::Screen;

        let mut image = ImagePaint::new("res://image/1");
        image.fit = ImagePaintFit::Tile {
            scale: 2.0,
            repeat: ImageRepeat::RepeatX,
        };
        image.quarter_turns = 3;
        image.filters.exposure = 0.25;

        let paints = vec![
            Paint::solid(Rgba32F::new(0.2, 0.4, 0.6, 0.8)),
            Paint::LinearGradient(GradientPaint::new(stops())),
            Paint::RadialGradient(radial),
            Paint::SweepGradient(GradientPaint::new(stops())),
            Paint::DiamondGradient(GradientPaint::new(stops())),
            Paint::Image(image),
        ];
        assert_eq!(roundtrip(&paints), paints);
    }

    #[test]
    fn test_inactive_paint_is_kept() {
        let mut solid = SolidPaint::new(Rgba32F::WHITE);
        solid.active = false;
        let paints = vec![Paint::Solid(solid)];
        assert_eq!(roundtrip(&paints), paints);
    }

    #[test]
    fn test_unresolved_solid_is_dropped() {
        let token = Paint::Solid(SolidPaint {
            color: PaintColor::Token("--brand".into()),
            blend_mode: BlendMode::Normal,
            active: true,
        });
        let kept = Paint::solid(Rgba32F::BLACK);
        assert_eq!(roundtrip(&[token, kept.clone()]), vec![kept]);
    }

    #[test]
    fn test_image_fit_variants() {
        for fit in [
            ImagePaintFit::Box(BoxFit::Contain),
            ImagePaintFit::Transform(Transform2D::translate(3.0, 4.0)),
            ImagePaintFit::Tile {
                scale: 0.5,
                repeat: ImageRepeat::RepeatY,
            },
        ] {
            let mut image = ImagePaint::new("res://a");
            image.fit = fit;
            let paints = vec![Paint::Image(image)];
            assert_eq!(roundtrip(&paints), paints);
        }
    }

    #[test]
    fn test_unknown_paint_kind_is_skipped() {
        let mut unknown = TableBuilder::new();
        unknown.varint(ITEM_KIND, 99);
        unknown.table(ITEM_PAINT, &TableBuilder::new().finish());
        let known = encode_paint_item(&Paint::solid(Rgba32F::WHITE)).unwrap();

        let mut holder = TableBuilder::new();
        holder.vector(1, &BuiltVector::tables([unknown.finish(), known]));
        let built = holder.finish();
        let table = Table::parse(built.as_bytes(), "holder").unwrap();
        assert_eq!(
            decode_paints(&table, 1).unwrap(),
            vec![Paint::solid(Rgba32F::WHITE)]
        );
    }

    #[test]
    fn test_empty_payload_uses_defaults() {
        let mut item = TableBuilder::new();
        item.varint(ITEM_KIND, PAINT_LINEAR_GRADIENT);
        item.table(ITEM_PAINT, &TableBuilder::new().finish());

        let mut holder = TableBuilder::new();
        holder.vector(1, &BuiltVector::tables([item.finish()]));
        let built = holder.finish();
        let table = Table::parse(built.as_bytes(), "holder").unwrap();
        let paints = decode_paints(&table, 1).unwrap();
        assert_eq!(paints, vec![Paint::LinearGradient(GradientPaint::new(Vec::new()))]);
    }

    #[test]
    fn test_empty_solid_payload_is_opaque_black_normal() {
        let mut item = TableBuilder::new();
        item.varint(ITEM_KIND, PAINT_SOLID);
        item.table(ITEM_PAINT, &TableBuilder::new().finish());

        let mut holder = TableBuilder::new();
        holder.vector(1, &BuiltVector::tables([item.finish()]));
        let built = holder.finish();
        let table = Table::parse(built.as_bytes(), "holder").unwrap();
        let paints = decode_paints(&table, 1).unwrap();
        let [Paint::Solid(solid)] = paints.as_slice() else {
            panic!("expected one solid paint");
        };
        assert_eq!(solid.blend_mode, BlendMode::Normal);
        assert!(solid.active);
        assert_eq!(solid.color, PaintColor::Rgba(Rgba32F::BLACK));
    }
}
