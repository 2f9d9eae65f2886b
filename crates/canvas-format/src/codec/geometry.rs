//! Stroke style tables.

use crate::codec::table::{BuiltTable, BuiltVector, Table, TableBuilder};
use crate::error::DecodeError;
use crate::model::StrokeStyle;

const STROKE_CAP: u32 = 1;
const STROKE_JOIN: u32 = 2;
const STROKE_ALIGN: u32 = 3;
const STROKE_MITER_LIMIT: u32 = 4;
const STROKE_DASH_ARRAY: u32 = 5;

pub fn encode_stroke_style(style: &StrokeStyle) -> BuiltTable {
    let dash_array = (!style.dash_array.is_empty()).then(|| BuiltVector::f32s(&style.dash_array));

    let mut t = TableBuilder::new();
    t.code(STROKE_CAP, style.cap);
    t.code(STROKE_JOIN, style.join);
    t.code(STROKE_ALIGN, style.align);
    t.f32(STROKE_MITER_LIMIT, style.miter_limit);
    if let Some(dash_array) = &dash_array {
        t.vector(STROKE_DASH_ARRAY, dash_array);
    }
    t.finish()
}

/// Decodes a stroke style; an absent table yields the default style.
pub fn decode_stroke_style(table: Option<&Table<'_>>) -> Result<StrokeStyle, DecodeError> {
    let Some(t) = table else {
        return Ok(StrokeStyle::default());
    };
    let dash_array = match t.vector(STROKE_DASH_ARRAY, "dash array")? {
        Some(v) => v.f32s()?,
        None => Vec::new(),
    };
    Ok(StrokeStyle {
        cap: t.code(STROKE_CAP),
        join: t.code(STROKE_JOIN),
        align: t.code(STROKE_ALIGN),
        miter_limit: t
            .f32(STROKE_MITER_LIMIT)
            .unwrap_or(StrokeStyle::DEFAULT_MITER_LIMIT),
        dash_array,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{StrokeAlign, StrokeCap, StrokeJoin};

    #[test]
    fn test_stroke_style_roundtrip() {
        let style = StrokeStyle {
            cap: StrokeCap::Round,
            join: StrokeJoin::Bevel,
            align: StrokeAlign::Outside,
            miter_limit: 10.0,
            dash_array: vec![4.0, 2.0],
        };
        let built = encode_stroke_style(&style);
        let table = Table::parse(built.as_bytes(), "stroke").unwrap();
        assert_eq!(decode_stroke_style(Some(&table)).unwrap(), style);
    }

    #[test]
    fn test_absent_stroke_style_defaults() {
        let style = decode_stroke_style(None).unwrap();
        assert_eq!(style.cap, StrokeCap::Butt);
        assert_eq!(style.join, StrokeJoin::Miter);
        assert_eq!(style.miter_limit, 4.0);

        let empty = TableBuilder::new().finish();
        let table = Table::parse(empty.as_bytes(), "stroke").unwrap();
        assert_eq!(decode_stroke_style(Some(&table)).unwrap(), StrokeStyle::default());
    }
}
