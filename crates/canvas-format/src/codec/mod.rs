//! Binary encoding/decoding for canvas documents.
//!
//! The wire form is a tree of tag-keyed tables. See [`table`] for the
//! field framing and [`document`] for the envelope.

pub(crate) mod effects;
pub(crate) mod enums;
pub(crate) mod geometry;
pub(crate) mod layout;
pub mod document;
pub mod node;
pub(crate) mod paint;
pub mod primitives;
pub(crate) mod shape;
pub(crate) mod structs;
pub mod table;
pub(crate) mod text;
pub mod vector;

pub use document::{
    DecodeOptions, EncodeOptions, KNOWN_GAPS, SCHEMA_VERSION, assign_order_keys, decode_document,
    decode_document_with_options, decode_file, decode_file_with_options, document_fingerprint,
    encode_document, encode_document_with_options, fingerprint, rebuild_links,
    validate_encode_inputs,
};
pub use enums::{UnknownEnumLabel, WireEnum};
pub use node::{DecodedNode, NodeTypeTag, ParentReference, decode_node, encode_node};
pub use primitives::{Reader, Writer};
pub use table::{BuiltTable, BuiltVector, Table, TableBuilder, VectorReader, WireKind, WireStruct};
pub use vector::SegmentPolicy;
