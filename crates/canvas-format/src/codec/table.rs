//! Tables, structs and vectors: the object layer of the wire format.
//!
//! A **table** is a length-prefixed run of keyed fields. Each key packs a
//! field id and a wire kind (`field << 3 | kind`), so readers can skip
//! fields they do not know and fall back to defaults for fields that are
//! absent. A **struct** is a fixed-layout record written inline at the
//! point it is attached. A **vector** is a counted run of tables, structs
//! or scalars.
//!
//! Builders only accept children that are already finished
//! ([`BuiltTable`], [`BuiltVector`]), so every table is assembled
//! bottom-up. Inline structs close a table: once a struct field has been
//! written no further offset-style field may follow.

use crate::codec::enums::WireEnum;
use crate::codec::primitives::{Reader, Writer};
use crate::error::DecodeError;
use crate::limits::{MAX_DOCUMENT_SIZE, MAX_STRING_LEN, MAX_TABLE_FIELDS, MAX_VECTOR_LEN};

/// Wire kind stored in the low three bits of a field key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WireKind {
    Varint = 0,
    Fixed32 = 1,
    Bytes = 2,
    Struct = 3,
}

impl WireKind {
    fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0 => Some(WireKind::Varint),
            1 => Some(WireKind::Fixed32),
            2 => Some(WireKind::Bytes),
            3 => Some(WireKind::Struct),
            _ => None,
        }
    }
}

/// A fixed-layout record written inline into its parent.
pub trait WireStruct: Sized {
    /// Encoded size in bytes.
    const SIZE: usize;

    /// Writes exactly `SIZE` bytes.
    fn write(&self, w: &mut Writer);

    /// Reads exactly `SIZE` bytes.
    fn read(r: &mut Reader<'_>) -> Result<Self, DecodeError>;
}

// =============================================================================
// ENCODING
// =============================================================================

/// A finished table, ready to be attached to a parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltTable(Vec<u8>);

impl BuiltTable {
    /// Returns the encoded field bytes (without length prefix).
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// A finished vector, ready to be attached to a parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltVector(Vec<u8>);

impl BuiltVector {
    /// Builds a vector of tables.
    pub fn tables<I>(items: I) -> Self
    where
        I: IntoIterator<Item = BuiltTable>,
    {
        let mut body = Writer::new();
        let mut count = 0u64;
        for table in items {
            body.write_bytes_prefixed(table.as_bytes());
            count += 1;
        }
        Self::with_count(count, None, body)
    }

    /// Builds a vector of inline structs.
    pub fn structs<S: WireStruct>(items: &[S]) -> Self {
        let mut body = Writer::with_capacity(items.len() * S::SIZE);
        for item in items {
            item.write(&mut body);
        }
        Self::with_count(items.len() as u64, Some(S::SIZE as u8), body)
    }

    /// Builds a vector of varints (enum codes, union tags).
    pub fn varints<I>(items: I) -> Self
    where
        I: IntoIterator<Item = u64>,
    {
        let mut body = Writer::new();
        let mut count = 0u64;
        for value in items {
            body.write_varint(value);
            count += 1;
        }
        Self::with_count(count, None, body)
    }

    /// Builds a vector of little-endian floats.
    pub fn f32s(items: &[f32]) -> Self {
        let mut body = Writer::with_capacity(items.len() * 4);
        for value in items {
            body.write_f32(*value);
        }
        Self::with_count(items.len() as u64, None, body)
    }

    fn with_count(count: u64, element_size: Option<u8>, body: Writer) -> Self {
        let mut w = Writer::with_capacity(body.len() + 6);
        w.write_varint(count);
        if let Some(size) = element_size {
            w.write_byte(size);
        }
        w.write_bytes(body.as_bytes());
        BuiltVector(w.into_bytes())
    }
}

/// Builder for one table.
#[derive(Debug, Default)]
pub struct TableBuilder {
    w: Writer,
    structs_started: bool,
}

impl TableBuilder {
    /// Opens a new table.
    pub fn new() -> Self {
        Self::default()
    }

    fn key(&mut self, field: u32, kind: WireKind) {
        debug_assert!(
            kind == WireKind::Struct || !self.structs_started,
            "field {field} added after an inline struct"
        );
        if kind == WireKind::Struct {
            self.structs_started = true;
        }
        self.w.write_field_key(field, kind as u8);
    }

    /// Adds an unsigned integer field.
    pub fn varint(&mut self, field: u32, value: u64) {
        self.key(field, WireKind::Varint);
        self.w.write_varint(value);
    }

    /// Adds a boolean field.
    pub fn bool(&mut self, field: u32, value: bool) {
        self.varint(field, value as u64);
    }

    /// Adds an enum field by its wire code.
    pub fn code<E: WireEnum>(&mut self, field: u32, value: E) {
        self.varint(field, value.code() as u64);
    }

    /// Adds a float field.
    pub fn f32(&mut self, field: u32, value: f32) {
        self.key(field, WireKind::Fixed32);
        self.w.write_f32(value);
    }

    /// Adds a float field only when present.
    pub fn f32_opt(&mut self, field: u32, value: Option<f32>) {
        if let Some(value) = value {
            self.f32(field, value);
        }
    }

    /// Adds a string field.
    pub fn string(&mut self, field: u32, value: &str) {
        self.key(field, WireKind::Bytes);
        self.w.write_bytes_prefixed(value.as_bytes());
    }

    /// Adds a string field only when present.
    pub fn string_opt(&mut self, field: u32, value: Option<&str>) {
        if let Some(value) = value {
            self.string(field, value);
        }
    }

    /// Attaches a finished child table.
    pub fn table(&mut self, field: u32, table: &BuiltTable) {
        self.key(field, WireKind::Bytes);
        self.w.write_bytes_prefixed(table.as_bytes());
    }

    /// Attaches a finished vector.
    pub fn vector(&mut self, field: u32, vector: &BuiltVector) {
        self.key(field, WireKind::Bytes);
        self.w.write_bytes_prefixed(&vector.0);
    }

    /// Writes a struct inline at this point of the table.
    pub fn inline<S: WireStruct>(&mut self, field: u32, value: &S) {
        self.key(field, WireKind::Struct);
        self.w.write_byte(S::SIZE as u8);
        value.write(&mut self.w);
    }

    /// Closes the table.
    pub fn finish(self) -> BuiltTable {
        BuiltTable(self.w.into_bytes())
    }
}

// =============================================================================
// DECODING
// =============================================================================

#[derive(Debug, Clone, Copy)]
enum FieldValue<'a> {
    Varint(u64),
    Fixed32(f32),
    Bytes(&'a [u8]),
    Struct(&'a [u8]),
}

impl FieldValue<'_> {
    fn kind(&self) -> WireKind {
        match self {
            FieldValue::Varint(_) => WireKind::Varint,
            FieldValue::Fixed32(_) => WireKind::Fixed32,
            FieldValue::Bytes(_) => WireKind::Bytes,
            FieldValue::Struct(_) => WireKind::Struct,
        }
    }
}

/// A parsed table, borrowing field payloads from the input buffer.
///
/// Accessors return `None` for absent fields and for fields whose wire
/// kind does not match what the caller expects; callers substitute
/// defaults. Only framing errors are fatal.
#[derive(Debug, Clone)]
pub struct Table<'a> {
    name: &'static str,
    fields: Vec<(u32, FieldValue<'a>)>,
}

impl<'a> Table<'a> {
    /// Reads a length-prefixed table.
    pub fn read(r: &mut Reader<'a>, name: &'static str) -> Result<Self, DecodeError> {
        let bytes = r.read_bytes_prefixed(MAX_DOCUMENT_SIZE, name)?;
        Self::parse(bytes, name)
    }

    /// Parses table content (the bytes after the length prefix).
    pub fn parse(bytes: &'a [u8], name: &'static str) -> Result<Self, DecodeError> {
        let mut r = Reader::new(bytes);
        let mut fields = Vec::new();
        while !r.is_empty() {
            if fields.len() >= MAX_TABLE_FIELDS {
                return Err(DecodeError::LengthExceedsLimit {
                    field: name,
                    len: fields.len() + 1,
                    max: MAX_TABLE_FIELDS,
                });
            }
            let (field, bits) = r.read_field_key(name)?;
            let kind = WireKind::from_bits(bits)
                .ok_or(DecodeError::InvalidWireKind { kind: bits, table: name })?;
            let value = match kind {
                WireKind::Varint => FieldValue::Varint(r.read_varint(name)?),
                WireKind::Fixed32 => FieldValue::Fixed32(r.read_f32(name)?),
                WireKind::Bytes => {
                    FieldValue::Bytes(r.read_bytes_prefixed(MAX_DOCUMENT_SIZE, name)?)
                }
                WireKind::Struct => {
                    let size = r.read_byte(name)? as usize;
                    FieldValue::Struct(r.read_bytes(size, name)?)
                }
            };
            fields.push((field, value));
        }
        Ok(Self { name, fields })
    }

    /// Returns the table name used in diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns true if the field is present with any wire kind.
    pub fn has(&self, field: u32) -> bool {
        self.fields.iter().any(|(id, _)| *id == field)
    }

    fn get(&self, field: u32, expected: WireKind) -> Option<FieldValue<'a>> {
        // Last occurrence wins.
        let (_, value) = self.fields.iter().rev().find(|(id, _)| *id == field)?;
        if value.kind() != expected {
            tracing::debug!(
                table = self.name,
                field,
                expected = ?expected,
                found = ?value.kind(),
                "field has unexpected wire kind, using default"
            );
            return None;
        }
        Some(*value)
    }

    /// Reads an unsigned integer field.
    pub fn varint(&self, field: u32) -> Option<u64> {
        match self.get(field, WireKind::Varint)? {
            FieldValue::Varint(v) => Some(v),
            _ => None,
        }
    }

    /// Reads an unsigned integer field that must fit in 32 bits.
    pub fn u32(&self, field: u32) -> Option<u32> {
        self.varint(field).and_then(|v| u32::try_from(v).ok())
    }

    /// Reads a boolean field.
    pub fn bool(&self, field: u32) -> Option<bool> {
        self.varint(field).map(|v| v != 0)
    }

    /// Reads an enum field, falling back to the enum's default.
    pub fn code<E: WireEnum>(&self, field: u32) -> E {
        self.varint(field).map(E::from_code).unwrap_or_default()
    }

    /// Reads an optional enum field, where absent or unmapped codes yield `None`.
    pub fn code_opt<E: WireEnum>(&self, field: u32) -> Option<E> {
        self.varint(field).and_then(E::try_from_code)
    }

    /// Reads a float field.
    pub fn f32(&self, field: u32) -> Option<f32> {
        match self.get(field, WireKind::Fixed32)? {
            FieldValue::Fixed32(v) => Some(v),
            _ => None,
        }
    }

    fn bytes(&self, field: u32) -> Option<&'a [u8]> {
        match self.get(field, WireKind::Bytes)? {
            FieldValue::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Reads a string field, borrowing from the input.
    pub fn str(&self, field: u32) -> Result<Option<&'a str>, DecodeError> {
        let Some(bytes) = self.bytes(field) else {
            return Ok(None);
        };
        if bytes.len() > MAX_STRING_LEN {
            return Err(DecodeError::LengthExceedsLimit {
                field: self.name,
                len: bytes.len(),
                max: MAX_STRING_LEN,
            });
        }
        std::str::from_utf8(bytes)
            .map(Some)
            .map_err(|_| DecodeError::InvalidUtf8 { field: self.name })
    }

    /// Reads a string field into an owned `String`.
    pub fn string(&self, field: u32) -> Result<Option<String>, DecodeError> {
        Ok(self.str(field)?.map(str::to_owned))
    }

    /// Reads a nested table.
    pub fn table(&self, field: u32, name: &'static str) -> Result<Option<Table<'a>>, DecodeError> {
        self.bytes(field).map(|b| Table::parse(b, name)).transpose()
    }

    /// Reads a vector.
    pub fn vector(
        &self,
        field: u32,
        name: &'static str,
    ) -> Result<Option<VectorReader<'a>>, DecodeError> {
        self.bytes(field).map(|b| VectorReader::new(b, name)).transpose()
    }

    /// Reads an inline struct. A size mismatch is treated as absent.
    pub fn inline<S: WireStruct>(&self, field: u32) -> Result<Option<S>, DecodeError> {
        let bytes = match self.get(field, WireKind::Struct) {
            Some(FieldValue::Struct(b)) => b,
            _ => return Ok(None),
        };
        if bytes.len() != S::SIZE {
            tracing::debug!(
                table = self.name,
                field,
                expected = S::SIZE,
                found = bytes.len(),
                "struct size mismatch, using default"
            );
            return Ok(None);
        }
        S::read(&mut Reader::new(bytes)).map(Some)
    }
}

/// A counted vector whose element type is chosen by the caller.
#[derive(Debug, Clone)]
pub struct VectorReader<'a> {
    name: &'static str,
    count: usize,
    reader: Reader<'a>,
}

impl<'a> VectorReader<'a> {
    fn new(bytes: &'a [u8], name: &'static str) -> Result<Self, DecodeError> {
        let mut reader = Reader::new(bytes);
        let count = reader.read_length(MAX_VECTOR_LEN, name)?;
        // Every element occupies at least one byte.
        if count > reader.remaining_len() {
            return Err(DecodeError::UnexpectedEof { context: name });
        }
        Ok(Self {
            name,
            count,
            reader,
        })
    }

    /// Returns the element count.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns true if the vector has no elements.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Reads all elements as tables.
    pub fn tables(mut self, name: &'static str) -> Result<Vec<Table<'a>>, DecodeError> {
        let mut out = Vec::with_capacity(self.count);
        for _ in 0..self.count {
            out.push(Table::read(&mut self.reader, name)?);
        }
        Ok(out)
    }

    /// Reads all elements as inline structs.
    ///
    /// A vector whose declared element size differs from `S::SIZE` decodes
    /// as empty.
    pub fn structs<S: WireStruct>(mut self) -> Result<Vec<S>, DecodeError> {
        let size = self.reader.read_byte(self.name)? as usize;
        if size != S::SIZE {
            tracing::debug!(
                vector = self.name,
                expected = S::SIZE,
                found = size,
                "struct vector element size mismatch, using empty vector"
            );
            return Ok(Vec::new());
        }
        if self.count.saturating_mul(size) > self.reader.remaining_len() {
            return Err(DecodeError::UnexpectedEof { context: self.name });
        }
        let mut out = Vec::with_capacity(self.count);
        for _ in 0..self.count {
            out.push(S::read(&mut self.reader)?);
        }
        Ok(out)
    }

    /// Reads all elements as varints.
    pub fn varints(mut self) -> Result<Vec<u64>, DecodeError> {
        let mut out = Vec::with_capacity(self.count);
        for _ in 0..self.count {
            out.push(self.reader.read_varint(self.name)?);
        }
        Ok(out)
    }

    /// Reads all elements as floats.
    pub fn f32s(mut self) -> Result<Vec<f32>, DecodeError> {
        let mut out = Vec::with_capacity(self.count);
        for _ in 0..self.count {
            out.push(self.reader.read_f32(self.name)?);
        }
        Ok(out)
    }
}
