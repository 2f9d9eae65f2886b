//! Binary interchange format for vector canvas documents.
//!
//! This crate provides the document model, a deterministic binary codec,
//! and semantic validation for canvas scene graphs: scenes, shapes, text,
//! vector paths, containers, groups, and the paints, effects and layout
//! attached to them.
//!
//! # Overview
//!
//! - **Flat, ordered tree**: nodes are stored in one record vector. Each
//!   child records its parent and a fractional order key, which is the only
//!   source of sibling order.
//! - **Deterministic**: equal documents encode to identical bytes.
//! - **Tolerant of optional data**: absent or unrecognised optional fields
//!   decode to documented defaults; structural corruption is fatal.
//!
//! # Quick Start
//!
//! ```rust
//! use canvas_format::codec::{decode_document, encode_document};
//! use canvas_format::model::{
//!     BasicShape, BasicShapeNode, DocumentBuilder, Paint, Rgba32F, SceneNode, TextNode,
//! };
//!
//! let mut card = BasicShapeNode::new("card", "Card", BasicShape::rectangle());
//! card.fill_paints.push(Paint::solid(Rgba32F::WHITE));
//!
//! let doc = DocumentBuilder::new()
//!     .scene(SceneNode::new("page", "Page 1"), |s| s
//!         .child(card)
//!         .child(TextNode::new("title", "Title", "Hello")))
//!     .build();
//!
//! let bytes = encode_document(&doc).unwrap();
//! let decoded = decode_document(&bytes).unwrap();
//!
//! assert_eq!(decoded, doc);
//! assert_eq!(decoded.children("page"), ["card", "title"]);
//! ```
//!
//! # Modules
//!
//! - [`model`]: Document, nodes, paints, effects, layout, order keys
//! - [`codec`]: Binary encoding/decoding
//! - [`validate`]: Structural checks on in-memory documents
//! - [`error`]: Decode, encode, order key and validation errors
//! - [`limits`]: Size caps applied while decoding
//!
//! # Untrusted Input
//!
//! Decoding never trusts a length it has not checked. Vector counts,
//! byte runs, table field counts and node counts are capped by
//! [`limits`], varints stop at ten bytes, and any structural fault
//! aborts the whole decode.
//!
//! # Wire Format
//!
//! `CNVS` magic, a version byte, then a length-prefixed table tree. Each
//! table field is keyed by `field << 3 | wire kind`, so readers skip
//! fields they do not know.

pub mod codec;
pub mod error;
pub mod limits;
pub mod model;
pub mod validate;

// Re-export commonly used types at crate root
pub use codec::{
    DecodeOptions, EncodeOptions, KNOWN_GAPS, SCHEMA_VERSION, SegmentPolicy, decode_document,
    decode_file, document_fingerprint, encode_document,
};
pub use error::{DecodeError, EncodeError, ErrorCode, OrderKeyError, ValidationError};
pub use model::{CanvasFile, Document, DocumentBuilder, Node, NodeId};
pub use model::id::{derived_node_id, new_node_id};
pub use validate::validate_document;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Highest binary format version this crate reads and the one it writes.
pub const FORMAT_VERSION: u8 = limits::FORMAT_VERSION;
