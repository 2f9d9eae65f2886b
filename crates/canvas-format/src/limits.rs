//! Format constants and security limits for decoding.
//!
//! Every allocation the decoder makes on behalf of untrusted input is
//! bounded by one of these values.

/// Magic bytes at the start of every document buffer.
pub const MAGIC: &[u8; 4] = b"CNVS";

/// Current format version written by the encoder.
pub const FORMAT_VERSION: u8 = 1;

/// Oldest format version the decoder accepts.
pub const MIN_FORMAT_VERSION: u8 = 1;

/// Maximum bytes in a LEB128 varint (64-bit value).
pub const MAX_VARINT_BYTES: usize = 10;

/// Maximum size of an encoded document buffer.
pub const MAX_DOCUMENT_SIZE: usize = 256 * 1024 * 1024;

/// Maximum number of node records in one document.
pub const MAX_NODES: usize = 1_000_000;

/// Maximum length of any string field in bytes.
pub const MAX_STRING_LEN: usize = 16 * 1024 * 1024;

/// Maximum element count of any vector field.
pub const MAX_VECTOR_LEN: usize = 4_000_000;

/// Maximum length of an order key.
pub const MAX_ORDER_KEY_LEN: usize = 4096;

/// Maximum number of fields parsed from a single table.
pub const MAX_TABLE_FIELDS: usize = 256;
