//! Fixed-layout structs of the wire format.
//!
//! All fields are little-endian `f32` unless noted. Sizes:
//!
//! | struct          | bytes |
//! |-----------------|-------|
//! | Point2D         | 8     |
//! | Alignment       | 8     |
//! | Rgba32F         | 16    |
//! | EdgeInsets      | 16    |
//! | CornerRadii     | 16    |
//! | StrokeWidths    | 16    |
//! | GradientStop    | 20    |
//! | Transform2D     | 24    |
//! | VectorSegment   | 24    |
//! | ImageFilters    | 28    |
//! | FontFeatureTag  | 4     |

use crate::codec::primitives::{Reader, Writer};
use crate::codec::table::WireStruct;
use crate::error::DecodeError;
use crate::model::{
    Alignment, CornerRadii, EdgeInsets, FontFeatureTag, GradientStop, ImageFilters, Point2D,
    Rgba32F, StrokeWidths, Transform2D, VectorSegment,
};

impl WireStruct for Point2D {
    const SIZE: usize = 8;

    fn write(&self, w: &mut Writer) {
        w.write_f32(self.x);
        w.write_f32(self.y);
    }

    fn read(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Point2D {
            x: r.read_f32("point.x")?,
            y: r.read_f32("point.y")?,
        })
    }
}

impl WireStruct for Alignment {
    const SIZE: usize = 8;

    fn write(&self, w: &mut Writer) {
        w.write_f32(self.x);
        w.write_f32(self.y);
    }

    fn read(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Alignment {
            x: r.read_f32("alignment.x")?,
            y: r.read_f32("alignment.y")?,
        })
    }
}

impl WireStruct for Rgba32F {
    const SIZE: usize = 16;

    fn write(&self, w: &mut Writer) {
        w.write_f32(self.r);
        w.write_f32(self.g);
        w.write_f32(self.b);
        w.write_f32(self.a);
    }

    fn read(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Rgba32F {
            r: r.read_f32("color")?,
            g: r.read_f32("color")?,
            b: r.read_f32("color")?,
            a: r.read_f32("color")?,
        })
    }
}

impl WireStruct for EdgeInsets {
    const SIZE: usize = 16;

    fn write(&self, w: &mut Writer) {
        w.write_f32(self.top);
        w.write_f32(self.right);
        w.write_f32(self.bottom);
        w.write_f32(self.left);
    }

    fn read(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(EdgeInsets {
            top: r.read_f32("insets")?,
            right: r.read_f32("insets")?,
            bottom: r.read_f32("insets")?,
            left: r.read_f32("insets")?,
        })
    }
}

impl WireStruct for CornerRadii {
    const SIZE: usize = 16;

    fn write(&self, w: &mut Writer) {
        w.write_f32(self.top_left);
        w.write_f32(self.top_right);
        w.write_f32(self.bottom_right);
        w.write_f32(self.bottom_left);
    }

    fn read(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(CornerRadii {
            top_left: r.read_f32("corner radii")?,
            top_right: r.read_f32("corner radii")?,
            bottom_right: r.read_f32("corner radii")?,
            bottom_left: r.read_f32("corner radii")?,
        })
    }
}

impl WireStruct for StrokeWidths {
    const SIZE: usize = 16;

    fn write(&self, w: &mut Writer) {
        w.write_f32(self.top);
        w.write_f32(self.right);
        w.write_f32(self.bottom);
        w.write_f32(self.left);
    }

    fn read(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(StrokeWidths {
            top: r.read_f32("stroke widths")?,
            right: r.read_f32("stroke widths")?,
            bottom: r.read_f32("stroke widths")?,
            left: r.read_f32("stroke widths")?,
        })
    }
}

impl WireStruct for GradientStop {
    const SIZE: usize = 20;

    fn write(&self, w: &mut Writer) {
        w.write_f32(self.offset);
        self.color.write(w);
    }

    fn read(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(GradientStop {
            offset: r.read_f32("gradient stop")?,
            color: Rgba32F::read(r)?,
        })
    }
}

impl WireStruct for Transform2D {
    const SIZE: usize = 24;

    fn write(&self, w: &mut Writer) {
        for row in &self.matrix {
            for v in row {
                w.write_f32(*v);
            }
        }
    }

    fn read(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let mut matrix = [[0.0f32; 3]; 2];
        for row in &mut matrix {
            for v in row.iter_mut() {
                *v = r.read_f32("transform")?;
            }
        }
        Ok(Transform2D { matrix })
    }
}

/// `a: u32, b: u32, ta: Point2D, tb: Point2D`
impl WireStruct for VectorSegment {
    const SIZE: usize = 24;

    fn write(&self, w: &mut Writer) {
        w.write_u32(self.a);
        w.write_u32(self.b);
        self.ta.write(w);
        self.tb.write(w);
    }

    fn read(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(VectorSegment {
            a: r.read_u32("segment.a")?,
            b: r.read_u32("segment.b")?,
            ta: Point2D::read(r)?,
            tb: Point2D::read(r)?,
        })
    }
}

impl WireStruct for ImageFilters {
    const SIZE: usize = 28;

    fn write(&self, w: &mut Writer) {
        w.write_f32(self.exposure);
        w.write_f32(self.contrast);
        w.write_f32(self.saturation);
        w.write_f32(self.temperature);
        w.write_f32(self.tint);
        w.write_f32(self.highlights);
        w.write_f32(self.shadows);
    }

    fn read(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(ImageFilters {
            exposure: r.read_f32("image filters")?,
            contrast: r.read_f32("image filters")?,
            saturation: r.read_f32("image filters")?,
            temperature: r.read_f32("image filters")?,
            tint: r.read_f32("image filters")?,
            highlights: r.read_f32("image filters")?,
            shadows: r.read_f32("image filters")?,
        })
    }
}

/// Four raw tag bytes.
impl WireStruct for FontFeatureTag {
    const SIZE: usize = 4;

    fn write(&self, w: &mut Writer) {
        w.write_bytes(&self.0);
    }

    fn read(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(FontFeatureTag(r.read_array("font feature tag")?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size_of_written<S: WireStruct>(value: &S) -> usize {
        let mut w = Writer::new();
        value.write(&mut w);
        w.len()
    }

    #[test]
    fn test_declared_sizes_match_written_sizes() {
        assert_eq!(size_of_written(&Point2D::ZERO), Point2D::SIZE);
        assert_eq!(size_of_written(&Alignment::CENTER), Alignment::SIZE);
        assert_eq!(size_of_written(&Rgba32F::BLACK), Rgba32F::SIZE);
        assert_eq!(size_of_written(&EdgeInsets::default()), EdgeInsets::SIZE);
        assert_eq!(size_of_written(&CornerRadii::default()), CornerRadii::SIZE);
        assert_eq!(size_of_written(&StrokeWidths::default()), StrokeWidths::SIZE);
        assert_eq!(
            size_of_written(&GradientStop { offset: 0.0, color: Rgba32F::WHITE }),
            GradientStop::SIZE
        );
        assert_eq!(size_of_written(&Transform2D::IDENTITY), Transform2D::SIZE);
        assert_eq!(size_of_written(&VectorSegment::line(0, 1)), VectorSegment::SIZE);
        assert_eq!(size_of_written(&ImageFilters::default()), ImageFilters::SIZE);
        assert_eq!(size_of_written(&FontFeatureTag(*b"liga")), FontFeatureTag::SIZE);
    }

    #[test]
    fn test_transform_is_row_major() {
        let t = Transform2D::translate(10.0, 20.0);
        let mut w = Writer::new();
        t.write(&mut w);
        let mut r = Reader::new(w.as_bytes());
        let values: Vec<f32> = (0..6).map(|_| r.read_f32("t").unwrap()).collect();
        assert_eq!(values, vec![1.0, 0.0, 10.0, 0.0, 1.0, 20.0]);
    }

    #[test]
    fn test_segment_layout() {
        let seg = VectorSegment {
            a: 1,
            b: 2,
            ta: Point2D::new(3.0, 4.0),
            tb: Point2D::new(5.0, 6.0),
        };
        let mut w = Writer::new();
        seg.write(&mut w);
        assert_eq!(&w.as_bytes()[..8], &[1, 0, 0, 0, 2, 0, 0, 0]);
        let decoded = VectorSegment::read(&mut Reader::new(w.as_bytes())).unwrap();
        assert_eq!(decoded, seg);
    }
}
