//! Vector networks: vertices joined by cubic segments.

use crate::model::geometry::Point2D;

/// A cubic segment between two vertices.
///
/// `ta` and `tb` are tangent handles relative to `a` and `b`; zero
/// tangents make a straight segment.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VectorSegment {
    pub a: u32,
    pub b: u32,
    pub ta: Point2D,
    pub tb: Point2D,
}

impl VectorSegment {
    /// A straight segment.
    pub const fn line(a: u32, b: u32) -> Self {
        Self {
            a,
            b,
            ta: Point2D::ZERO,
            tb: Point2D::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct VectorNetwork {
    pub vertices: Vec<Point2D>,
    pub segments: Vec<VectorSegment>,
}

impl VectorNetwork {
    /// A closed polygon through `points` with straight segments.
    pub fn polygon(points: &[Point2D]) -> Self {
        let n = points.len() as u32;
        let segments = (0..n).map(|i| VectorSegment::line(i, (i + 1) % n)).collect();
        Self {
            vertices: points.to_vec(),
            segments,
        }
    }

    /// Yields `(segment index, vertex index)` for every endpoint that is
    /// not a valid index into `vertices`.
    pub fn out_of_range(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        let len = self.vertices.len();
        self.segments.iter().enumerate().flat_map(move |(i, s)| {
            [s.a, s.b]
                .into_iter()
                .filter(move |v| *v as usize >= len)
                .map(move |v| (i, v))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polygon_closes() {
        let square = VectorNetwork::polygon(&[
            Point2D::new(0.0, 0.0),
            Point2D::new(100.0, 0.0),
            Point2D::new(100.0, 100.0),
            Point2D::new(0.0, 100.0),
        ]);
        assert_eq!(square.segments.len(), 4);
        assert_eq!(square.segments[3], VectorSegment::line(3, 0));
        assert_eq!(square.out_of_range().count(), 0);
    }

    #[test]
    fn test_out_of_range() {
        let network = VectorNetwork {
            vertices: vec![Point2D::ZERO, Point2D::new(1.0, 1.0)],
            segments: vec![VectorSegment::line(0, 1), VectorSegment::line(1, 5)],
        };
        assert_eq!(network.out_of_range().collect::<Vec<_>>(), vec![(1, 5)]);
    }
}
