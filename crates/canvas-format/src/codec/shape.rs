//! Basic shape records: rectangles, ellipses, polygons and stars.
//!
//! The record stores both an inner shape kind and a payload union. The
//! inner kind decides which shape is decoded; a payload of the wrong type
//! is ignored and the shape's defaults apply.

use crate::codec::geometry::{decode_stroke_style, encode_stroke_style};
use crate::codec::node::{ParentReference, layer_record};
use crate::codec::paint::{decode_paints, encode_paints};
use crate::codec::table::{BuiltTable, Table, TableBuilder};
use crate::error::DecodeError;
use crate::model::{
    BasicShape, BasicShapeNode, CornerRadii, LayerTrait, StrokeWidths, SystemTrait,
};

const SHAPE_KIND: u32 = 3;
const SHAPE_TYPE: u32 = 4;
const SHAPE_PAYLOAD: u32 = 5;
const SHAPE_CORNER_RADIUS: u32 = 6;
const SHAPE_CORNER_SMOOTHING: u32 = 7;
const SHAPE_FILLS: u32 = 8;
const SHAPE_STROKE_STYLE: u32 = 9;
const SHAPE_STROKE_WIDTH: u32 = 10;
const SHAPE_STROKES: u32 = 11;
const SHAPE_CORNER_RADII: u32 = 12;
const SHAPE_STROKE_WIDTHS: u32 = 13;

// Inner kind
const KIND_RECTANGLE: u64 = 0;
const KIND_ELLIPSE: u64 = 1;
const KIND_POLYGON: u64 = 2;
const KIND_STAR: u64 = 3;

// Payload union tags
const PAYLOAD_RECTANGULAR: u64 = 1;
const PAYLOAD_ELLIPTICAL: u64 = 2;
const PAYLOAD_POLYGON: u64 = 3;
const PAYLOAD_STAR: u64 = 4;

const ELLIPSE_INNER_RADIUS: u32 = 1;
const ELLIPSE_START_ANGLE: u32 = 2;
const ELLIPSE_ANGLE: u32 = 3;

const POLYGON_POINT_COUNT: u32 = 1;
const STAR_INNER_RADIUS: u32 = 2;

pub(crate) fn encode_basic_shape(
    n: &BasicShapeNode,
    parent: Option<&ParentReference>,
) -> BuiltTable {
    let stroke_style = encode_stroke_style(&n.stroke_style);
    let fills = encode_paints(&n.fill_paints);
    let strokes = encode_paints(&n.stroke_paints);

    let mut payload = TableBuilder::new();
    let (kind, payload_type, corner_radius) = match n.shape {
        BasicShape::Rectangle { corner_radii, .. } => {
            (KIND_RECTANGLE, PAYLOAD_RECTANGULAR, corner_radii.top_left)
        }
        BasicShape::Ellipse {
            inner_radius,
            start_angle,
            angle,
        } => {
            payload.f32(ELLIPSE_INNER_RADIUS, inner_radius);
            payload.f32(ELLIPSE_START_ANGLE, start_angle);
            payload.f32(ELLIPSE_ANGLE, angle);
            (KIND_ELLIPSE, PAYLOAD_ELLIPTICAL, 0.0)
        }
        BasicShape::RegularPolygon {
            point_count,
            corner_radius,
        } => {
            payload.varint(POLYGON_POINT_COUNT, point_count as u64);
            (KIND_POLYGON, PAYLOAD_POLYGON, corner_radius)
        }
        BasicShape::RegularStarPolygon {
            point_count,
            inner_radius,
            corner_radius,
        } => {
            payload.varint(POLYGON_POINT_COUNT, point_count as u64);
            payload.f32(STAR_INNER_RADIUS, inner_radius);
            (KIND_STAR, PAYLOAD_STAR, corner_radius)
        }
    };
    let payload = payload.finish();

    let mut t = layer_record(&n.system, &n.layer, parent);
    t.varint(SHAPE_KIND, kind);
    t.varint(SHAPE_TYPE, payload_type);
    t.table(SHAPE_PAYLOAD, &payload);
    t.f32(SHAPE_CORNER_RADIUS, corner_radius);
    t.f32(SHAPE_CORNER_SMOOTHING, n.corner_smoothing);
    t.vector(SHAPE_FILLS, &fills);
    t.table(SHAPE_STROKE_STYLE, &stroke_style);
    t.f32(SHAPE_STROKE_WIDTH, n.stroke_width);
    t.vector(SHAPE_STROKES, &strokes);
    if let BasicShape::Rectangle {
        corner_radii,
        stroke_widths,
    } = &n.shape
    {
        t.inline(SHAPE_CORNER_RADII, corner_radii);
        t.inline(SHAPE_STROKE_WIDTHS, stroke_widths);
    }
    t.finish()
}

pub(crate) fn decode_basic_shape(
    system: SystemTrait,
    layer: LayerTrait,
    record: &Table<'_>,
) -> Result<BasicShapeNode, DecodeError> {
    let corner_radius = record.f32(SHAPE_CORNER_RADIUS).unwrap_or(0.0);
    let stroke_width = record.f32(SHAPE_STROKE_WIDTH).unwrap_or(0.0);

    let payload_table = record.table(SHAPE_PAYLOAD, "shape payload")?;
    let payload = |expected: u64| {
        (record.varint(SHAPE_TYPE) == Some(expected))
            .then_some(payload_table.as_ref())
            .flatten()
    };

    let kind = record.varint(SHAPE_KIND).unwrap_or(KIND_RECTANGLE);
    let shape = match kind {
        KIND_ELLIPSE => {
            let p = payload(PAYLOAD_ELLIPTICAL);
            BasicShape::Ellipse {
                inner_radius: p.and_then(|p| p.f32(ELLIPSE_INNER_RADIUS)).unwrap_or(0.0),
                start_angle: p.and_then(|p| p.f32(ELLIPSE_START_ANGLE)).unwrap_or(0.0),
                angle: p.and_then(|p| p.f32(ELLIPSE_ANGLE)).unwrap_or(360.0),
            }
        }
        KIND_POLYGON => BasicShape::RegularPolygon {
            point_count: payload(PAYLOAD_POLYGON)
                .and_then(|p| p.u32(POLYGON_POINT_COUNT))
                .unwrap_or(3),
            corner_radius,
        },
        KIND_STAR => {
            let p = payload(PAYLOAD_STAR);
            BasicShape::RegularStarPolygon {
                point_count: p.and_then(|p| p.u32(POLYGON_POINT_COUNT)).unwrap_or(5),
                inner_radius: p.and_then(|p| p.f32(STAR_INNER_RADIUS)).unwrap_or(0.5),
                corner_radius,
            }
        }
        other => {
            if other != KIND_RECTANGLE {
                tracing::debug!(kind = other, "unknown basic shape kind, decoding as rectangle");
            }
            BasicShape::Rectangle {
                corner_radii: record
                    .inline(SHAPE_CORNER_RADII)?
                    .unwrap_or(CornerRadii::uniform(corner_radius)),
                stroke_widths: record
                    .inline(SHAPE_STROKE_WIDTHS)?
                    .unwrap_or(StrokeWidths::uniform(stroke_width)),
            }
        }
    };

    Ok(BasicShapeNode {
        system,
        layer,
        shape,
        corner_smoothing: record.f32(SHAPE_CORNER_SMOOTHING).unwrap_or(0.0),
        fill_paints: decode_paints(record, SHAPE_FILLS)?,
        stroke_paints: decode_paints(record, SHAPE_STROKES)?,
        stroke_width,
        stroke_style: decode_stroke_style(
            record.table(SHAPE_STROKE_STYLE, "stroke style")?.as_ref(),
        )?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::node::{NODE_LAYER, NODE_SYSTEM, encode_system};
    use crate::model::{Paint, Rgba32F};

    fn roundtrip(node: &BasicShapeNode) -> BasicShapeNode {
        let built = encode_basic_shape(node, None);
        let table = Table::parse(built.as_bytes(), "node").unwrap();
        decode_basic_shape(node.system.clone(), node.layer.clone(), &table).unwrap()
    }

    #[test]
    fn test_every_shape_roundtrips() {
        let shapes = [
            BasicShape::Rectangle {
                corner_radii: CornerRadii {
                    top_left: 4.0,
                    top_right: 8.0,
                    bottom_right: 0.0,
                    bottom_left: 2.0,
                },
                stroke_widths: StrokeWidths {
                    top: 1.0,
                    right: 2.0,
                    bottom: 3.0,
                    left: 4.0,
                },
            },
            BasicShape::Ellipse {
                inner_radius: 0.25,
                start_angle: 90.0,
                angle: 180.0,
            },
            BasicShape::RegularPolygon {
                point_count: 6,
                corner_radius: 3.0,
            },
            BasicShape::RegularStarPolygon {
                point_count: 7,
                inner_radius: 0.4,
                corner_radius: 1.0,
            },
        ];
        for shape in shapes {
            let mut node = BasicShapeNode::new("s", "Shape", shape);
            node.fill_paints.push(Paint::solid(Rgba32F::new(1.0, 0.0, 0.0, 1.0)));
            node.stroke_width = 2.0;
            node.corner_smoothing = 0.6;
            assert_eq!(roundtrip(&node), node);
        }
    }

    fn bare_record(kind: u64, extra: impl FnOnce(&mut TableBuilder)) -> BuiltTable {
        let system = encode_system(&SystemTrait::new("s", "Shape"));
        let layer = TableBuilder::new().finish();
        let mut t = TableBuilder::new();
        t.table(NODE_SYSTEM, &system);
        t.table(NODE_LAYER, &layer);
        t.varint(SHAPE_KIND, kind);
        extra(&mut t);
        t.finish()
    }

    fn decode_bare(built: &BuiltTable) -> BasicShape {
        let table = Table::parse(built.as_bytes(), "node").unwrap();
        decode_basic_shape(SystemTrait::new("s", "Shape"), LayerTrait::default(), &table)
            .unwrap()
            .shape
    }

    #[test]
    fn test_rectangle_falls_back_to_uniform_values() {
        let built = bare_record(KIND_RECTANGLE, |t| {
            t.f32(SHAPE_CORNER_RADIUS, 6.0);
            t.f32(SHAPE_STROKE_WIDTH, 2.0);
        });
        assert_eq!(
            decode_bare(&built),
            BasicShape::Rectangle {
                corner_radii: CornerRadii::uniform(6.0),
                stroke_widths: StrokeWidths::uniform(2.0),
            }
        );
    }

    #[test]
    fn test_unknown_kind_decodes_as_rectangle() {
        let built = bare_record(42, |_| {});
        assert_eq!(decode_bare(&built), BasicShape::rectangle());
    }

    #[test]
    fn test_mismatched_payload_uses_defaults() {
        let built = bare_record(KIND_ELLIPSE, |t| {
            let mut payload = TableBuilder::new();
            payload.varint(POLYGON_POINT_COUNT, 9);
            t.varint(SHAPE_TYPE, PAYLOAD_POLYGON);
            t.table(SHAPE_PAYLOAD, &payload.finish());
        });
        assert_eq!(decode_bare(&built), BasicShape::ellipse());
    }
}
