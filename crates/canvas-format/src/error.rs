//! Error types for document encoding, decoding and validation.

use thiserror::Error;

/// Error codes grouping decode failures by cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// E001: Invalid magic/version
    InvalidMagicOrVersion,
    /// E002: Node type tag cannot be dispatched
    InvalidNodeType,
    /// E003: Required field missing
    MissingField,
    /// E004: Invalid UTF-8 encoding
    InvalidUtf8,
    /// E005: Malformed varint/length/structure
    MalformedEncoding,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "E001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::InvalidMagicOrVersion => "E001",
            ErrorCode::InvalidNodeType => "E002",
            ErrorCode::MissingField => "E003",
            ErrorCode::InvalidUtf8 => "E004",
            ErrorCode::MalformedEncoding => "E005",
        }
    }
}

/// Error during binary decoding.
///
/// Every variant is fatal: the decoder never returns a partial document.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    // === E001: Invalid magic/version ===
    #[error("[E001] invalid magic bytes: expected CNVS, found {found:?}")]
    InvalidMagic { found: [u8; 4] },

    #[error("[E001] unsupported format version: {version}")]
    UnsupportedVersion { version: u8 },

    // === E002: Node type dispatch ===
    #[error("[E002] invalid node type tag {tag} at record {index}")]
    InvalidNodeType { tag: u64, index: usize },

    #[error("[E002] {nodes} node records but {tags} node type tags")]
    NodeTypeCountMismatch { nodes: usize, tags: usize },

    // === E003: Missing required field ===
    #[error("[E003] missing required field {field} in {table}")]
    MissingField {
        table: &'static str,
        field: &'static str,
    },

    // === E004: Invalid UTF-8 ===
    #[error("[E004] invalid UTF-8 in {field}")]
    InvalidUtf8 { field: &'static str },

    // === E005: Malformed encoding ===
    #[error("[E005] unexpected end of input while reading {context}")]
    UnexpectedEof { context: &'static str },

    #[error("[E005] varint exceeds maximum length (10 bytes)")]
    VarintTooLong,

    #[error("[E005] varint overflow (value exceeds u64)")]
    VarintOverflow,

    #[error("[E005] {field} length {len} exceeds maximum {max}")]
    LengthExceedsLimit {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("[E005] invalid wire kind {kind} in {table}")]
    InvalidWireKind { kind: u8, table: &'static str },

    #[error("[E005] duplicate node id {id:?}")]
    DuplicateNodeId { id: String },

    #[error("[E005] segment {segment} references vertex {vertex} but network has {vertices} vertices")]
    SegmentOutOfRange {
        segment: usize,
        vertex: u32,
        vertices: usize,
    },

    #[error("[E005] malformed encoding: {context}")]
    MalformedEncoding { context: &'static str },
}

impl DecodeError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            DecodeError::InvalidMagic { .. } | DecodeError::UnsupportedVersion { .. } => {
                ErrorCode::InvalidMagicOrVersion
            }
            DecodeError::InvalidNodeType { .. } | DecodeError::NodeTypeCountMismatch { .. } => {
                ErrorCode::InvalidNodeType
            }
            DecodeError::MissingField { .. } => ErrorCode::MissingField,
            DecodeError::InvalidUtf8 { .. } => ErrorCode::InvalidUtf8,
            _ => ErrorCode::MalformedEncoding,
        }
    }
}

/// Error during binary encoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    #[error("{field} length {len} exceeds maximum {max}")]
    LengthExceedsLimit {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("node {child:?} is listed as a child of both {first:?} and {second:?}")]
    MultipleParents {
        child: String,
        first: String,
        second: String,
    },

    #[error("cannot assign order keys: {0}")]
    OrderKey(#[from] OrderKeyError),
}

/// Error produced by the fractional order key generator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderKeyError {
    #[error("invalid order key {key:?}: {reason}")]
    InvalidKey { key: String, reason: &'static str },

    #[error("order key bounds out of order: {lower:?} >= {upper:?}")]
    BoundsOutOfOrder { lower: String, upper: String },

    #[error("order key space exhausted")]
    Exhausted,
}

/// Error during semantic validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("scene {id:?} is listed but not present")]
    MissingScene { id: String },

    #[error("scene entry {id:?} is not a scene node")]
    NotAScene { id: String },

    #[error("links reference missing node {id:?}")]
    DanglingLink { id: String },

    #[error("node {child:?} has more than one parent ({first:?}, {second:?})")]
    MultipleParents {
        child: String,
        first: String,
        second: String,
    },

    #[error("scene {id:?} is listed as a child of {parent:?}")]
    SceneHasParent { id: String, parent: String },

    #[error("unsupported node {id:?} is listed as a child of {parent:?}")]
    UnknownHasParent { id: String, parent: String },

    #[error("node {id:?} is its own ancestor")]
    Cycle { id: String },

    #[error("vector node {node:?} segment {segment} references vertex {vertex} out of {vertices}")]
    SegmentOutOfRange {
        node: String,
        segment: usize,
        vertex: u32,
        vertices: usize,
    },

    #[error("node {node:?} has opacity {opacity} outside [0, 1]")]
    OpacityOutOfRange { node: String, opacity: f32 },

    #[error("node {node:?} has a font feature tag that is not 4 ASCII characters")]
    InvalidFontFeature { node: String },
}
