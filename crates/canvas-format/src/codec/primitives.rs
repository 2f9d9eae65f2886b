//! Byte-level reading and writing.
//!
//! Everything above this layer is built from four shapes: LEB128 varints,
//! little-endian 32-bit words, length-prefixed byte runs and field keys.
//! A field key is the varint `field << 3 | kind`.

use crate::error::DecodeError;
use crate::limits::MAX_VARINT_BYTES;

/// Bits of a field key that hold the wire kind.
pub const KIND_BITS: u32 = 3;
const KIND_MASK: u64 = (1 << KIND_BITS) - 1;

// =============================================================================
// DECODING
// =============================================================================

/// Bounds-checked cursor over an input buffer.
///
/// Every read names what it was reading so truncation errors point at
/// the table or struct that ran out of bytes.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Offset of the next unread byte.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining_len(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    #[inline]
    pub fn read_byte(&mut self, context: &'static str) -> Result<u8, DecodeError> {
        let byte = *self
            .data
            .get(self.pos)
            .ok_or(DecodeError::UnexpectedEof { context })?;
        self.pos += 1;
        Ok(byte)
    }

    #[inline]
    pub fn read_bytes(&mut self, n: usize, context: &'static str) -> Result<&'a [u8], DecodeError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.data.len())
            .ok_or(DecodeError::UnexpectedEof { context })?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    #[inline]
    pub fn read_array<const N: usize>(
        &mut self,
        context: &'static str,
    ) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N, context)?);
        Ok(out)
    }

    /// Reads an unsigned LEB128 varint of at most ten bytes.
    #[inline]
    pub fn read_varint(&mut self, context: &'static str) -> Result<u64, DecodeError> {
        let mut result: u64 = 0;
        for i in 0..MAX_VARINT_BYTES {
            let byte = self.read_byte(context)?;
            let shift = 7 * i as u32;
            let low = u64::from(byte & 0x7F);
            // The tenth byte may only carry the top bit of a u64.
            if shift == 63 && low > 1 {
                return Err(DecodeError::VarintOverflow);
            }
            result |= low << shift;
            if byte & 0x80 == 0 {
                return Ok(result);
            }
        }
        Err(DecodeError::VarintTooLong)
    }

    /// Reads a varint length and rejects it if it exceeds `max_len`.
    #[inline]
    pub fn read_length(&mut self, max_len: usize, field: &'static str) -> Result<usize, DecodeError> {
        let len = self.read_varint(field)?;
        match usize::try_from(len) {
            Ok(len) if len <= max_len => Ok(len),
            _ => Err(DecodeError::LengthExceedsLimit {
                field,
                len: usize::try_from(len).unwrap_or(usize::MAX),
                max: max_len,
            }),
        }
    }

    /// Reads a varint length followed by that many bytes.
    pub fn read_bytes_prefixed(
        &mut self,
        max_len: usize,
        field: &'static str,
    ) -> Result<&'a [u8], DecodeError> {
        let len = self.read_length(max_len, field)?;
        self.read_bytes(len, field)
    }

    /// Reads a field key, returning `(field id, raw kind bits)`.
    ///
    /// The kind is returned unchecked; the table layer decides which kinds
    /// it understands.
    pub fn read_field_key(&mut self, table: &'static str) -> Result<(u32, u8), DecodeError> {
        let key = self.read_varint(table)?;
        let field = u32::try_from(key >> KIND_BITS)
            .map_err(|_| DecodeError::MalformedEncoding { context: "field id" })?;
        Ok((field, (key & KIND_MASK) as u8))
    }

    #[inline]
    pub fn read_u32(&mut self, context: &'static str) -> Result<u32, DecodeError> {
        Ok(u32::from_le_bytes(self.read_array(context)?))
    }

    #[inline]
    pub fn read_f32(&mut self, context: &'static str) -> Result<f32, DecodeError> {
        Ok(f32::from_le_bytes(self.read_array(context)?))
    }
}

// =============================================================================
// ENCODING
// =============================================================================

/// Growable output buffer.
#[derive(Debug, Clone, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[inline]
    pub fn write_byte(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Writes an unsigned LEB128 varint.
    #[inline]
    pub fn write_varint(&mut self, mut value: u64) {
        while value >= 0x80 {
            self.buf.push((value as u8) | 0x80);
            value >>= 7;
        }
        self.buf.push(value as u8);
    }

    /// Writes a field key for `field` with wire kind `kind` (low three bits).
    #[inline]
    pub fn write_field_key(&mut self, field: u32, kind: u8) {
        debug_assert!(u64::from(kind) <= KIND_MASK, "wire kind {kind} out of range");
        self.write_varint((u64::from(field) << KIND_BITS) | (u64::from(kind) & KIND_MASK));
    }

    /// Writes a varint length followed by `bytes`.
    pub fn write_bytes_prefixed(&mut self, bytes: &[u8]) {
        self.write_varint(bytes.len() as u64);
        self.buf.extend_from_slice(bytes);
    }

    #[inline]
    pub fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    #[inline]
    pub fn write_f32(&mut self, value: f32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }
}
