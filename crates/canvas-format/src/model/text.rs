//! Typography for text nodes.

use std::collections::BTreeMap;
use std::fmt;

use crate::model::geometry::Rgba32F;
use crate::model::style::{TextDecorationLine, TextDecorationStyle};

/// A four-character OpenType feature tag such as `liga` or `ss01`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FontFeatureTag(pub [u8; 4]);

impl FontFeatureTag {
    /// Parses a tag; returns `None` unless it is exactly 4 ASCII characters.
    pub fn new(tag: &str) -> Option<Self> {
        let bytes: [u8; 4] = tag.as_bytes().try_into().ok()?;
        Self(bytes).is_ascii().then_some(Self(bytes))
    }

    pub fn is_ascii(&self) -> bool {
        self.0.iter().all(|b| b.is_ascii_graphic() || *b == b' ')
    }
}

impl fmt::Display for FontFeatureTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0 {
            write!(f, "{}", char::from(b))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextDecoration {
    pub line: TextDecorationLine,
    pub style: TextDecorationStyle,
    /// Falls back to the text fill when absent.
    pub color: Option<Rgba32F>,
    pub skip_ink: bool,
    pub thickness: f32,
}

impl Default for TextDecoration {
    fn default() -> Self {
        Self {
            line: TextDecorationLine::None,
            style: TextDecorationStyle::Solid,
            color: None,
            skip_ink: true,
            thickness: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: f32,
    pub font_weight: u32,
    pub font_kerning: bool,
    pub font_features: BTreeMap<FontFeatureTag, bool>,
    pub letter_spacing: Option<f32>,
    pub word_spacing: Option<f32>,
    /// Multiplier of the font size.
    pub line_height: Option<f32>,
    pub decoration: TextDecoration,
}

impl TextStyle {
    pub const DEFAULT_FONT_SIZE: f32 = 14.0;
    pub const DEFAULT_FONT_WEIGHT: u32 = 400;
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: String::new(),
            font_size: Self::DEFAULT_FONT_SIZE,
            font_weight: Self::DEFAULT_FONT_WEIGHT,
            font_kerning: true,
            font_features: BTreeMap::new(),
            letter_spacing: None,
            word_spacing: None,
            line_height: None,
            decoration: TextDecoration::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_tag() {
        let tag = FontFeatureTag::new("liga").unwrap();
        assert_eq!(tag.to_string(), "liga");
        assert!(FontFeatureTag::new("lig").is_none());
        assert!(FontFeatureTag::new("ligat").is_none());
        assert!(!FontFeatureTag([0xFF, b'a', b'b', b'c']).is_ascii());
    }
}
