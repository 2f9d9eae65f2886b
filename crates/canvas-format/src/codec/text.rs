//! Text span records and typography.

use std::collections::BTreeMap;

use crate::codec::geometry::{decode_stroke_style, encode_stroke_style};
use crate::codec::node::{ParentReference, layer_record};
use crate::codec::paint::{decode_paints, encode_paints};
use crate::codec::table::{BuiltTable, BuiltVector, Table, TableBuilder};
use crate::error::DecodeError;
use crate::model::{
    FontFeatureTag, LayerTrait, SystemTrait, TextDecoration, TextNode, TextStyle,
};

const TEXT_CONTENT: u32 = 3;
const TEXT_STYLE: u32 = 4;
const TEXT_ALIGN: u32 = 5;
const TEXT_ALIGN_VERTICAL: u32 = 6;
const TEXT_MAX_LINES: u32 = 7;
const TEXT_ELLIPSIS: u32 = 8;
const TEXT_STROKE_WIDTH: u32 = 9;
const TEXT_STROKE_STYLE: u32 = 10;
const TEXT_FILLS: u32 = 11;
const TEXT_STROKES: u32 = 12;

const STYLE_FONT_FAMILY: u32 = 1;
const STYLE_FONT_SIZE: u32 = 2;
const STYLE_FONT_WEIGHT: u32 = 3;
const STYLE_FONT_KERNING: u32 = 4;
const STYLE_FONT_FEATURES: u32 = 5;
const STYLE_LETTER_SPACING: u32 = 6;
const STYLE_WORD_SPACING: u32 = 7;
const STYLE_LINE_HEIGHT: u32 = 8;
const STYLE_DECORATION: u32 = 9;

const FEATURE_VALUE: u32 = 1;
const FEATURE_TAG: u32 = 2;

const DECORATION_LINE: u32 = 1;
const DECORATION_STYLE: u32 = 2;
const DECORATION_SKIP_INK: u32 = 3;
const DECORATION_THICKNESS: u32 = 4;
const DECORATION_COLOR: u32 = 5;

pub(crate) fn encode_text(n: &TextNode, parent: Option<&ParentReference>) -> BuiltTable {
    let style = encode_text_style(&n.style);
    let stroke_style = encode_stroke_style(&n.stroke_style);
    let fills = encode_paints(&n.fill_paints);
    let strokes = encode_paints(&n.stroke_paints);

    let mut t = layer_record(&n.system, &n.layer, parent);
    t.string_opt(TEXT_CONTENT, n.text.as_deref());
    t.table(TEXT_STYLE, &style);
    t.code(TEXT_ALIGN, n.text_align);
    t.code(TEXT_ALIGN_VERTICAL, n.text_align_vertical);
    if let Some(max_lines) = n.max_lines {
        t.varint(TEXT_MAX_LINES, max_lines as u64);
    }
    t.string_opt(TEXT_ELLIPSIS, n.ellipsis.as_deref());
    t.f32(TEXT_STROKE_WIDTH, n.stroke_width);
    t.table(TEXT_STROKE_STYLE, &stroke_style);
    t.vector(TEXT_FILLS, &fills);
    t.vector(TEXT_STROKES, &strokes);
    t.finish()
}

fn encode_text_style(style: &TextStyle) -> BuiltTable {
    let features = BuiltVector::tables(style.font_features.iter().map(|(tag, on)| {
        let mut f = TableBuilder::new();
        f.bool(FEATURE_VALUE, *on);
        f.inline(FEATURE_TAG, tag);
        f.finish()
    }));
    let decoration = encode_decoration(&style.decoration);

    let mut t = TableBuilder::new();
    t.string(STYLE_FONT_FAMILY, &style.font_family);
    t.f32(STYLE_FONT_SIZE, style.font_size);
    t.varint(STYLE_FONT_WEIGHT, style.font_weight as u64);
    t.bool(STYLE_FONT_KERNING, style.font_kerning);
    if !style.font_features.is_empty() {
        t.vector(STYLE_FONT_FEATURES, &features);
    }
    t.f32_opt(STYLE_LETTER_SPACING, style.letter_spacing);
    t.f32_opt(STYLE_WORD_SPACING, style.word_spacing);
    t.f32_opt(STYLE_LINE_HEIGHT, style.line_height);
    t.table(STYLE_DECORATION, &decoration);
    t.finish()
}

fn encode_decoration(decoration: &TextDecoration) -> BuiltTable {
    let mut t = TableBuilder::new();
    t.code(DECORATION_LINE, decoration.line);
    t.code(DECORATION_STYLE, decoration.style);
    t.bool(DECORATION_SKIP_INK, decoration.skip_ink);
    t.f32(DECORATION_THICKNESS, decoration.thickness);
    if let Some(color) = &decoration.color {
        t.inline(DECORATION_COLOR, color);
    }
    t.finish()
}

pub(crate) fn decode_text(
    system: SystemTrait,
    layer: LayerTrait,
    record: &Table<'_>,
) -> Result<TextNode, DecodeError> {
    let style = match record.table(TEXT_STYLE, "text style")? {
        Some(s) => decode_text_style(&s)?,
        None => TextStyle::default(),
    };
    Ok(TextNode {
        system,
        layer,
        text: record.string(TEXT_CONTENT)?,
        style,
        text_align: record.code(TEXT_ALIGN),
        text_align_vertical: record.code(TEXT_ALIGN_VERTICAL),
        max_lines: record.u32(TEXT_MAX_LINES),
        ellipsis: record.string(TEXT_ELLIPSIS)?,
        stroke_width: record.f32(TEXT_STROKE_WIDTH).unwrap_or(0.0),
        stroke_style: decode_stroke_style(
            record.table(TEXT_STROKE_STYLE, "stroke style")?.as_ref(),
        )?,
        fill_paints: decode_paints(record, TEXT_FILLS)?,
        stroke_paints: decode_paints(record, TEXT_STROKES)?,
    })
}

fn decode_text_style(t: &Table<'_>) -> Result<TextStyle, DecodeError> {
    let mut font_features = BTreeMap::new();
    if let Some(v) = t.vector(STYLE_FONT_FEATURES, "font features")? {
        for f in v.tables("font feature")? {
            match f.inline::<FontFeatureTag>(FEATURE_TAG)? {
                Some(tag) if tag.is_ascii() => {
                    font_features.insert(tag, f.bool(FEATURE_VALUE).unwrap_or(true));
                }
                _ => tracing::debug!("skipping font feature with unreadable tag"),
            }
        }
    }
    let decoration = match t.table(STYLE_DECORATION, "text decoration")? {
        Some(d) => TextDecoration {
            line: d.code(DECORATION_LINE),
            style: d.code(DECORATION_STYLE),
            color: d.inline(DECORATION_COLOR)?,
            skip_ink: d.bool(DECORATION_SKIP_INK).unwrap_or(true),
            thickness: d.f32(DECORATION_THICKNESS).unwrap_or(1.0),
        },
        None => TextDecoration::default(),
    };
    Ok(TextStyle {
        font_family: t.string(STYLE_FONT_FAMILY)?.unwrap_or_default(),
        font_size: t
            .f32(STYLE_FONT_SIZE)
            .filter(|size| *size > 0.0)
            .unwrap_or(TextStyle::DEFAULT_FONT_SIZE),
        font_weight: t
            .u32(STYLE_FONT_WEIGHT)
            .filter(|weight| *weight > 0)
            .unwrap_or(TextStyle::DEFAULT_FONT_WEIGHT),
        font_kerning: t.bool(STYLE_FONT_KERNING).unwrap_or(true),
        font_features,
        letter_spacing: t.f32(STYLE_LETTER_SPACING),
        word_spacing: t.f32(STYLE_WORD_SPACING),
        line_height: t.f32(STYLE_LINE_HEIGHT),
        decoration,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Paint, Rgba32F, TextAlign, TextAlignVertical, TextDecorationLine, TextDecorationStyle,
    };

    fn roundtrip(node: &TextNode) -> TextNode {
        let built = encode_text(node, None);
        let table = Table::parse(built.as_bytes(), "node").unwrap();
        decode_text(node.system.clone(), node.layer.clone(), &table).unwrap()
    }

    #[test]
    fn test_styled_text_roundtrip() {
        let mut node = TextNode::new("t", "Title", "Hello, world");
        node.style.font_family = "Inter".into();
        node.style.font_size = 32.0;
        node.style.font_weight = 700;
        node.style.font_kerning = false;
        node.style.letter_spacing = Some(-0.5);
        node.style.line_height = Some(1.2);
        node.style
            .font_features
            .insert(FontFeatureTag::new("liga").unwrap(), false);
        node.style
            .font_features
            .insert(FontFeatureTag::new("ss01").unwrap(), true);
        node.style.decoration = TextDecoration {
            line: TextDecorationLine::Underline,
            style: TextDecorationStyle::Wavy,
            color: Some(Rgba32F::new(1.0, 0.0, 0.0, 1.0)),
            skip_ink: false,
            thickness: 2.0,
        };
        node.text_align = TextAlign::Center;
        node.text_align_vertical = TextAlignVertical::Bottom;
        node.max_lines = Some(2);
        node.ellipsis = Some("...".into());
        node.fill_paints.push(Paint::solid(Rgba32F::BLACK));

        assert_eq!(roundtrip(&node), node);
    }

    #[test]
    fn test_text_without_content() {
        let mut node = TextNode::new("t", "Empty", "");
        node.text = None;
        assert_eq!(roundtrip(&node), node);
    }

    #[test]
    fn test_zero_font_size_and_weight_use_defaults() {
        let mut style = TableBuilder::new();
        style.f32(STYLE_FONT_SIZE, 0.0);
        style.varint(STYLE_FONT_WEIGHT, 0);
        let built = style.finish();
        let table = Table::parse(built.as_bytes(), "text style").unwrap();

        let style = decode_text_style(&table).unwrap();
        assert_eq!(style.font_size, 14.0);
        assert_eq!(style.font_weight, 400);
        assert!(style.font_kerning);
        assert_eq!(style.letter_spacing, None);
        assert_eq!(style.line_height, None);
    }
}
