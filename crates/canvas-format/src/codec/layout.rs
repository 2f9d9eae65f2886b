//! Layout tables.
//!
//! Positions are stored either as a cartesian point (left/top) or as edge
//! insets. A presence mask records which of the four offsets are set, so
//! an explicit zero survives a round-trip. Buffers written without the
//! mask fall back to treating zero insets as unset.

use crate::codec::enums::optional_code;
use crate::codec::table::{BuiltTable, Table, TableBuilder};
use crate::error::DecodeError;
use crate::model::{ContainerStyle, EdgeInsets, Layout, Length, Point2D, PositionBasis};

const LAYOUT_POSITIONING: u32 = 1;
const LAYOUT_POSITION_BASIS: u32 = 2;
const LAYOUT_PRESENCE: u32 = 3;
const LAYOUT_DIMENSIONS: u32 = 4;
const LAYOUT_ROTATION: u32 = 5;
const LAYOUT_CONTAINER: u32 = 6;
const LAYOUT_POSITION: u32 = 7;
const LAYOUT_INSET: u32 = 8;

const DIMENSION_WIDTH_TYPE: u32 = 1;
const DIMENSION_WIDTH: u32 = 2;
const DIMENSION_HEIGHT_TYPE: u32 = 3;
const DIMENSION_HEIGHT: u32 = 4;

const LENGTH_AUTO: u64 = 1;
const LENGTH_PX: u64 = 2;
const LENGTH_PERCENT: u64 = 3;
const LENGTH_VALUE: u32 = 1;

const CONTAINER_MODE: u32 = 1;
const CONTAINER_DIRECTION: u32 = 2;
const CONTAINER_WRAP: u32 = 3;
const CONTAINER_MAIN_ALIGNMENT: u32 = 4;
const CONTAINER_CROSS_ALIGNMENT: u32 = 5;
const CONTAINER_MAIN_GAP: u32 = 6;
const CONTAINER_CROSS_GAP: u32 = 7;
const CONTAINER_PADDING: u32 = 8;

const PRESENT_TOP: u64 = 1 << 0;
const PRESENT_RIGHT: u64 = 1 << 1;
const PRESENT_BOTTOM: u64 = 1 << 2;
const PRESENT_LEFT: u64 = 1 << 3;

// =============================================================================
// ENCODING
// =============================================================================

pub fn encode_layout(layout: &Layout) -> BuiltTable {
    let dimensions = encode_dimensions(layout.width, layout.height);
    let container = layout.container.as_ref().map(encode_container_style);

    let presence = [
        (layout.top, PRESENT_TOP),
        (layout.right, PRESENT_RIGHT),
        (layout.bottom, PRESENT_BOTTOM),
        (layout.left, PRESENT_LEFT),
    ]
    .iter()
    .filter(|(value, _)| value.is_some())
    .fold(0, |mask, (_, bit)| mask | bit);

    let basis = layout.position_basis();
    let mut t = TableBuilder::new();
    t.code(LAYOUT_POSITIONING, layout.positioning);
    t.code(LAYOUT_POSITION_BASIS, basis);
    t.varint(LAYOUT_PRESENCE, presence);
    t.table(LAYOUT_DIMENSIONS, &dimensions);
    t.f32(LAYOUT_ROTATION, layout.rotation);
    if let Some(container) = &container {
        t.table(LAYOUT_CONTAINER, container);
    }
    match basis {
        PositionBasis::Cartesian => t.inline(
            LAYOUT_POSITION,
            &Point2D::new(layout.left.unwrap_or(0.0), layout.top.unwrap_or(0.0)),
        ),
        PositionBasis::Inset => t.inline(
            LAYOUT_INSET,
            &EdgeInsets {
                top: layout.top.unwrap_or(0.0),
                right: layout.right.unwrap_or(0.0),
                bottom: layout.bottom.unwrap_or(0.0),
                left: layout.left.unwrap_or(0.0),
            },
        ),
    }
    t.finish()
}

fn encode_dimensions(width: Length, height: Length) -> BuiltTable {
    let (width_type, width) = encode_length(width);
    let (height_type, height) = encode_length(height);

    let mut t = TableBuilder::new();
    t.varint(DIMENSION_WIDTH_TYPE, width_type);
    if let Some(width) = &width {
        t.table(DIMENSION_WIDTH, width);
    }
    t.varint(DIMENSION_HEIGHT_TYPE, height_type);
    if let Some(height) = &height {
        t.table(DIMENSION_HEIGHT, height);
    }
    t.finish()
}

fn encode_length(length: Length) -> (u64, Option<BuiltTable>) {
    let (kind, value) = match length {
        Length::Auto => return (LENGTH_AUTO, None),
        Length::Px(v) => (LENGTH_PX, v),
        Length::Percent(v) => (LENGTH_PERCENT, v),
    };
    let mut t = TableBuilder::new();
    t.f32(LENGTH_VALUE, value);
    (kind, Some(t.finish()))
}

fn encode_container_style(style: &ContainerStyle) -> BuiltTable {
    let mut t = TableBuilder::new();
    t.code(CONTAINER_MODE, style.mode);
    t.code(CONTAINER_DIRECTION, style.direction);
    t.varint(CONTAINER_WRAP, optional_code(style.wrap) as u64);
    t.varint(CONTAINER_MAIN_ALIGNMENT, optional_code(style.main_axis_alignment) as u64);
    t.varint(CONTAINER_CROSS_ALIGNMENT, optional_code(style.cross_axis_alignment) as u64);
    t.f32(CONTAINER_MAIN_GAP, style.main_axis_gap);
    t.f32(CONTAINER_CROSS_GAP, style.cross_axis_gap);
    t.inline(CONTAINER_PADDING, &style.padding);
    t.finish()
}

// =============================================================================
// DECODING
// =============================================================================

/// Decodes a layout table; an absent table yields the default layout.
pub fn decode_layout(table: Option<&Table<'_>>) -> Result<Layout, DecodeError> {
    let Some(t) = table else {
        return Ok(Layout::default());
    };
    let presence = t.varint(LAYOUT_PRESENCE);
    let [top, right, bottom, left] = match t.code::<PositionBasis>(LAYOUT_POSITION_BASIS) {
        PositionBasis::Cartesian => {
            let p = t.inline::<Point2D>(LAYOUT_POSITION)?.unwrap_or_default();
            match presence {
                Some(mask) => [
                    present(mask, PRESENT_TOP, p.y),
                    None,
                    None,
                    present(mask, PRESENT_LEFT, p.x),
                ],
                None => [Some(p.y), None, None, Some(p.x)],
            }
        }
        PositionBasis::Inset => {
            let e = t.inline::<EdgeInsets>(LAYOUT_INSET)?.unwrap_or_default();
            match presence {
                Some(mask) => [
                    present(mask, PRESENT_TOP, e.top),
                    present(mask, PRESENT_RIGHT, e.right),
                    present(mask, PRESENT_BOTTOM, e.bottom),
                    present(mask, PRESENT_LEFT, e.left),
                ],
                None => legacy_insets(e),
            }
        }
    };

    let (width, height) = match t.table(LAYOUT_DIMENSIONS, "dimensions")? {
        Some(d) => (
            decode_length(&d, DIMENSION_WIDTH_TYPE, DIMENSION_WIDTH)?,
            decode_length(&d, DIMENSION_HEIGHT_TYPE, DIMENSION_HEIGHT)?,
        ),
        None => (Length::Auto, Length::Auto),
    };

    Ok(Layout {
        positioning: t.code(LAYOUT_POSITIONING),
        left,
        top,
        right,
        bottom,
        width,
        height,
        rotation: t.f32(LAYOUT_ROTATION).unwrap_or(0.0),
        container: t
            .table(LAYOUT_CONTAINER, "container style")?
            .map(|c| decode_container_style(&c))
            .transpose()?,
    })
}

fn present(mask: u64, bit: u64, value: f32) -> Option<f32> {
    (mask & bit != 0).then_some(value)
}

/// Insets without a presence mask: if any side is non-zero, zero sides
/// are unset; if all are zero, all four are set to zero.
fn legacy_insets(e: EdgeInsets) -> [Option<f32>; 4] {
    let sides = [e.top, e.right, e.bottom, e.left];
    if sides.iter().all(|v| *v == 0.0) {
        return [Some(0.0); 4];
    }
    sides.map(|v| (v != 0.0).then_some(v))
}

fn decode_length(t: &Table<'_>, type_field: u32, value_field: u32) -> Result<Length, DecodeError> {
    let value = || -> Result<f32, DecodeError> {
        Ok(t
            .table(value_field, "length")?
            .and_then(|v| v.f32(LENGTH_VALUE))
            .unwrap_or(0.0))
    };
    Ok(match t.varint(type_field) {
        Some(LENGTH_PX) => Length::Px(value()?),
        Some(LENGTH_PERCENT) => Length::Percent(value()?),
        _ => Length::Auto,
    })
}

fn decode_container_style(t: &Table<'_>) -> Result<ContainerStyle, DecodeError> {
    Ok(ContainerStyle {
        mode: t.code(CONTAINER_MODE),
        direction: t.code(CONTAINER_DIRECTION),
        wrap: t.code_opt(CONTAINER_WRAP),
        main_axis_alignment: t.code_opt(CONTAINER_MAIN_ALIGNMENT),
        cross_axis_alignment: t.code_opt(CONTAINER_CROSS_ALIGNMENT),
        main_axis_gap: t.f32(CONTAINER_MAIN_GAP).unwrap_or(0.0),
        cross_axis_gap: t.f32(CONTAINER_CROSS_GAP).unwrap_or(0.0),
        padding: t.inline(CONTAINER_PADDING)?.unwrap_or_default(),
    })
}
