//! Vector network tables.

use crate::codec::table::{BuiltTable, BuiltVector, Table, TableBuilder};
use crate::error::DecodeError;
use crate::model::{Point2D, VectorNetwork, VectorSegment};

const NETWORK_VERTICES: u32 = 1;
const NETWORK_SEGMENTS: u32 = 2;

/// What the decoder does with a segment that references a vertex index
/// outside the vertex list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SegmentPolicy {
    /// Remove the segment.
    #[default]
    Drop,
    /// Clamp the index to the last vertex. Segments of an empty vertex
    /// list are removed.
    Clamp,
    /// Fail the decode with [`DecodeError::SegmentOutOfRange`].
    Reject,
}

pub fn encode_vector_network(network: &VectorNetwork) -> BuiltTable {
    let vertices = BuiltVector::structs(&network.vertices);
    let segments = BuiltVector::structs(&network.segments);

    let mut t = TableBuilder::new();
    t.vector(NETWORK_VERTICES, &vertices);
    t.vector(NETWORK_SEGMENTS, &segments);
    t.finish()
}

/// Decodes a vector network, applying `policy` to dangling segments.
pub fn decode_vector_network(
    table: Option<&Table<'_>>,
    policy: SegmentPolicy,
) -> Result<VectorNetwork, DecodeError> {
    let Some(t) = table else {
        return Ok(VectorNetwork::default());
    };
    let vertices = match t.vector(NETWORK_VERTICES, "vertices")? {
        Some(v) => v.structs::<Point2D>()?,
        None => Vec::new(),
    };
    let raw = match t.vector(NETWORK_SEGMENTS, "segments")? {
        Some(v) => v.structs::<VectorSegment>()?,
        None => Vec::new(),
    };

    let count = vertices.len();
    let mut segments = Vec::with_capacity(raw.len());
    for (index, segment) in raw.into_iter().enumerate() {
        let Some(bad) = [segment.a, segment.b]
            .into_iter()
            .find(|v| *v as usize >= count)
        else {
            segments.push(segment);
            continue;
        };
        match policy {
            SegmentPolicy::Reject => {
                return Err(DecodeError::SegmentOutOfRange {
                    segment: index,
                    vertex: bad,
                    vertices: count,
                });
            }
            SegmentPolicy::Clamp if count > 0 => {
                tracing::warn!(segment = index, vertex = bad, vertices = count, "clamping segment");
                let last = (count - 1) as u32;
                segments.push(VectorSegment {
                    a: segment.a.min(last),
                    b: segment.b.min(last),
                    ..segment
                });
            }
            SegmentPolicy::Clamp | SegmentPolicy::Drop => {
                tracing::warn!(segment = index, vertex = bad, vertices = count, "dropping segment");
            }
        }
    }
    Ok(VectorNetwork { vertices, segments })
}
