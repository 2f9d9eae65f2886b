//! Document envelope and tree linearization.
//!
//! A buffer is `MAGIC`, one version byte, then the length-prefixed file
//! table. The file table holds the document table, which stores every
//! node as a flat record vector plus a positionally aligned vector of
//! type tags. Sibling order lives only in each child's order key.

use rustc_hash::FxHashMap;
use sha2::{Digest, Sha256};

use crate::codec::node::{
    DecodedNode, NodeTypeTag, ParentReference, decode_identifier, decode_node,
    encode_identifier, encode_node,
};
use crate::codec::primitives::{Reader, Writer};
use crate::codec::table::{BuiltVector, Table, TableBuilder};
use crate::codec::vector::SegmentPolicy;
use crate::error::{DecodeError, EncodeError};
use crate::limits::{
    FORMAT_VERSION, MAGIC, MAX_DOCUMENT_SIZE, MAX_NODES, MAX_ORDER_KEY_LEN, MAX_STRING_LEN,
    MAX_VECTOR_LEN, MIN_FORMAT_VERSION,
};
use crate::model::order_key::{n_keys_between, validate_order_key};
use crate::model::{CanvasFile, Document, EdgePoint, LayerTrait, Node, NodeId, Paint, StrokeStyle};

/// Schema version written by default.
pub const SCHEMA_VERSION: &str = "0.89.0-beta+20251219";

/// Parts of the in-memory document that the binary form does not carry.
pub const KNOWN_GAPS: &[(&str, &str)] = &[
    ("K1", "image, bitmap and property maps are not persisted"),
    ("K2", "variable-width stroke profiles are not persisted"),
    ("K3", "vector network regions are not persisted"),
    ("K4", "per-span rich text attributes are not persisted"),
];

const FILE_DOCUMENT: u32 = 1;

const DOCUMENT_SCHEMA_VERSION: u32 = 1;
const DOCUMENT_NODES: u32 = 2;
const DOCUMENT_NODES_TYPE: u32 = 3;
const DOCUMENT_SCENES: u32 = 4;

// =============================================================================
// OPTIONS
// =============================================================================

/// Options for encoding documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Schema version recorded in the document table.
    pub schema_version: String,
}

impl EncodeOptions {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_owned(),
        }
    }
}

/// Options for decoding documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Upper bound on node records; larger documents fail to decode.
    pub max_nodes: usize,
    /// Handling of vector segments that reference missing vertices.
    pub segment_policy: SegmentPolicy,
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options that reject out-of-range segments instead of repairing them.
    pub fn strict() -> Self {
        Self {
            segment_policy: SegmentPolicy::Reject,
            ..Self::default()
        }
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_nodes: MAX_NODES,
            segment_policy: SegmentPolicy::default(),
        }
    }
}

// =============================================================================
// ENCODING
// =============================================================================

/// Checks that every length the decoder bounds is within its limit.
///
/// Catches documents that would encode but could never be read back.
pub fn validate_encode_inputs(
    document: &Document,
    options: &EncodeOptions,
) -> Result<(), EncodeError> {
    check_len("nodes", document.nodes.len(), MAX_NODES)?;
    check_len("scenes", document.scenes.len(), MAX_VECTOR_LEN)?;
    check_str("schema_version", &options.schema_version)?;
    for id in &document.scenes {
        check_str("scene id", id)?;
    }
    for node in document.nodes.values() {
        check_node(node)?;
    }
    Ok(())
}

fn check_len(field: &'static str, len: usize, max: usize) -> Result<(), EncodeError> {
    if len > max {
        return Err(EncodeError::LengthExceedsLimit { field, len, max });
    }
    Ok(())
}

fn check_str(field: &'static str, value: &str) -> Result<(), EncodeError> {
    check_len(field, value.len(), MAX_STRING_LEN)
}

fn check_paints(field: &'static str, paints: &[Paint]) -> Result<(), EncodeError> {
    check_len(field, paints.len(), MAX_VECTOR_LEN)?;
    for paint in paints {
        match paint {
            Paint::Solid(_) => {}
            Paint::LinearGradient(g)
            | Paint::RadialGradient(g)
            | Paint::SweepGradient(g)
            | Paint::DiamondGradient(g) => {
                check_len("gradient stops", g.stops.len(), MAX_VECTOR_LEN)?
            }
            Paint::Image(image) => check_str("image src", &image.src)?,
        }
    }
    Ok(())
}

fn check_strokes(style: &StrokeStyle, strokes: &[Paint]) -> Result<(), EncodeError> {
    check_len("dash_array", style.dash_array.len(), MAX_VECTOR_LEN)?;
    check_paints("stroke_paints", strokes)
}

fn check_layer(layer: &LayerTrait) -> Result<(), EncodeError> {
    check_len("shadows", layer.effects.shadows.len(), MAX_VECTOR_LEN)?;
    check_len("noises", layer.effects.noises.len(), MAX_VECTOR_LEN)
}

fn check_node(node: &Node) -> Result<(), EncodeError> {
    let system = node.system();
    check_str("id", &system.id)?;
    check_str("name", &system.name)?;
    if let Some(layer) = node.layer() {
        check_layer(layer)?;
    }

    match node {
        Node::Scene(n) => {
            if let Some(position) = &n.position {
                check_str("position", position)?;
            }
            check_len("guides", n.guides.len(), MAX_VECTOR_LEN)?;
            check_len("edges", n.edges.len(), MAX_VECTOR_LEN)?;
            for edge in &n.edges {
                check_str("edge id", &edge.id)?;
                for point in [&edge.a, &edge.b] {
                    if let EdgePoint::Anchor { target } = point {
                        check_str("edge target", target)?;
                    }
                }
            }
        }
        Node::BasicShape(n) => {
            check_paints("fill_paints", &n.fill_paints)?;
            check_strokes(&n.stroke_style, &n.stroke_paints)?;
        }
        Node::Container(n) => {
            check_paints("fill_paints", &n.fill_paints)?;
            check_strokes(&n.stroke_style, &n.stroke_paints)?;
        }
        Node::Text(n) => {
            if let Some(text) = &n.text {
                check_str("text", text)?;
            }
            if let Some(ellipsis) = &n.ellipsis {
                check_str("ellipsis", ellipsis)?;
            }
            check_str("font_family", &n.style.font_family)?;
            check_len("font_features", n.style.font_features.len(), MAX_VECTOR_LEN)?;
            check_paints("fill_paints", &n.fill_paints)?;
            check_strokes(&n.stroke_style, &n.stroke_paints)?;
        }
        Node::Line(n) => check_strokes(&n.stroke_style, &n.stroke_paints)?,
        Node::Vector(n) => {
            check_len("vertices", n.network.vertices.len(), MAX_VECTOR_LEN)?;
            check_len("segments", n.network.segments.len(), MAX_VECTOR_LEN)?;
            check_paints("fill_paints", &n.fill_paints)?;
            check_strokes(&n.stroke_style, &n.stroke_paints)?;
        }
        Node::BooleanOperation(n) => {
            check_paints("fill_paints", &n.fill_paints)?;
            check_strokes(&n.stroke_style, &n.stroke_paints)?;
        }
        Node::Group(_) | Node::Unknown(_) => {}
    }
    Ok(())
}

/// Assigns a fresh order key to every linked child.
///
/// Children of each parent get keys spread between the unbounded ends of
/// the key space, in their current render order. Links to nodes that are
/// not in the document, and to scene or unknown nodes, are skipped.
pub fn assign_order_keys(
    document: &Document,
) -> Result<FxHashMap<&str, ParentReference>, EncodeError> {
    let mut parents: Vec<&NodeId> = document.links.keys().collect();
    parents.sort();

    let mut refs: FxHashMap<&str, ParentReference> = FxHashMap::default();
    for parent in parents {
        let children: Vec<&NodeId> = document
            .children(parent)
            .iter()
            .filter(|child| match document.nodes.get(child.as_str()) {
                None => {
                    tracing::debug!(parent = %parent, child = %child, "skipping link to missing node");
                    false
                }
                // Scene and unknown records have no parent slot.
                Some(node) if node.layer().is_none() => {
                    tracing::debug!(
                        parent = %parent,
                        child = %child,
                        kind = node.kind(),
                        "dropping link to node that cannot record a parent"
                    );
                    false
                }
                Some(_) => true,
            })
            .collect();
        let keys = n_keys_between(None, None, children.len())?;
        for (child, order_key) in children.into_iter().zip(keys) {
            let reference = ParentReference {
                parent_id: parent.clone(),
                order_key,
            };
            if let Some(previous) = refs.insert(child.as_str(), reference) {
                return Err(EncodeError::MultipleParents {
                    child: child.clone(),
                    first: previous.parent_id,
                    second: parent.clone(),
                });
            }
        }
    }
    Ok(refs)
}

/// Encodes a document with default options.
pub fn encode_document(document: &Document) -> Result<Vec<u8>, EncodeError> {
    encode_document_with_options(document, &EncodeOptions::default())
}

/// Encodes a document.
///
/// Output is deterministic: nodes are written in ascending id order, so
/// equal documents produce identical bytes.
#[tracing::instrument(skip_all, fields(nodes = document.nodes.len()))]
pub fn encode_document_with_options(
    document: &Document,
    options: &EncodeOptions,
) -> Result<Vec<u8>, EncodeError> {
    validate_encode_inputs(document, options)?;
    let parents = assign_order_keys(document)?;

    let mut entries: Vec<(&NodeId, &Node)> = document.nodes.iter().collect();
    entries.sort_unstable_by(|a, b| a.0.cmp(b.0));

    let mut tags = Vec::with_capacity(entries.len());
    let mut records = Vec::with_capacity(entries.len());
    for (id, node) in entries {
        let parent = parents.get(id.as_str());
        if let Some(p) = parent {
            check_len("order_key", p.order_key.len(), MAX_ORDER_KEY_LEN)?;
        }
        let (tag, record) = encode_node(node, parent);
        tags.push(tag.code());
        records.push(record);
    }

    let nodes = BuiltVector::tables(records);
    let nodes_type = BuiltVector::varints(tags);
    let scenes = BuiltVector::tables(document.scenes.iter().map(|id| encode_identifier(id)));

    let mut doc = TableBuilder::new();
    doc.string(DOCUMENT_SCHEMA_VERSION, &options.schema_version);
    doc.vector(DOCUMENT_NODES, &nodes);
    doc.vector(DOCUMENT_NODES_TYPE, &nodes_type);
    doc.vector(DOCUMENT_SCENES, &scenes);
    let doc = doc.finish();

    let mut file = TableBuilder::new();
    file.table(FILE_DOCUMENT, &doc);
    let file = file.finish();

    let mut writer = Writer::with_capacity(file.as_bytes().len() + 16);
    writer.write_bytes(MAGIC);
    writer.write_byte(FORMAT_VERSION);
    writer.write_bytes_prefixed(file.as_bytes());
    let bytes = writer.into_bytes();

    if bytes.len() > MAX_DOCUMENT_SIZE {
        return Err(EncodeError::LengthExceedsLimit {
            field: "document",
            len: bytes.len(),
            max: MAX_DOCUMENT_SIZE,
        });
    }
    tracing::debug!(bytes = bytes.len(), "encoded document");
    Ok(bytes)
}

/// SHA-256 of an encoded buffer.
pub fn fingerprint(bytes: &[u8]) -> [u8; 32] {
    Sha256::digest(bytes).into()
}

/// SHA-256 of a document's encoding. Equal documents share a fingerprint.
pub fn document_fingerprint(document: &Document) -> Result<[u8; 32], EncodeError> {
    Ok(fingerprint(&encode_document(document)?))
}

// =============================================================================
// DECODING
// =============================================================================

/// Decodes only the document from a buffer.
pub fn decode_document(input: &[u8]) -> Result<Document, DecodeError> {
    decode_file(input).map(|file| file.document)
}

/// Decodes a document with custom options.
pub fn decode_document_with_options(
    input: &[u8],
    options: &DecodeOptions,
) -> Result<Document, DecodeError> {
    decode_file_with_options(input, options).map(|file| file.document)
}

/// Decodes a buffer with default options.
pub fn decode_file(input: &[u8]) -> Result<CanvasFile, DecodeError> {
    decode_file_with_options(input, &DecodeOptions::default())
}

/// Decodes a buffer.
///
/// Structural corruption is fatal and no partial document is returned.
/// Semantic damage (dangling parent references, duplicate order keys,
/// out-of-range segments under a repairing policy) is logged and repaired.
#[tracing::instrument(skip_all, fields(bytes = input.len()))]
pub fn decode_file_with_options(
    input: &[u8],
    options: &DecodeOptions,
) -> Result<CanvasFile, DecodeError> {
    if input.len() > MAX_DOCUMENT_SIZE {
        return Err(DecodeError::LengthExceedsLimit {
            field: "document",
            len: input.len(),
            max: MAX_DOCUMENT_SIZE,
        });
    }
    let mut reader = Reader::new(input);

    let magic: [u8; 4] = reader.read_array("magic")?;
    if &magic != MAGIC {
        return Err(DecodeError::InvalidMagic { found: magic });
    }
    let version = reader.read_byte("version")?;
    if !(MIN_FORMAT_VERSION..=FORMAT_VERSION).contains(&version) {
        return Err(DecodeError::UnsupportedVersion { version });
    }

    let file = Table::read(&mut reader, "file")?;
    if !reader.is_empty() {
        return Err(DecodeError::MalformedEncoding {
            context: "trailing bytes after file table",
        });
    }

    let doc = file
        .table(FILE_DOCUMENT, "document")?
        .ok_or(DecodeError::MissingField {
            table: "file",
            field: "document",
        })?;
    let schema_version =
        doc.string(DOCUMENT_SCHEMA_VERSION)?
            .ok_or(DecodeError::MissingField {
                table: "document",
                field: "schema_version",
            })?;

    let records = match doc.vector(DOCUMENT_NODES, "nodes")? {
        Some(v) => {
            if v.len() > options.max_nodes {
                return Err(DecodeError::LengthExceedsLimit {
                    field: "nodes",
                    len: v.len(),
                    max: options.max_nodes,
                });
            }
            v.tables("node")?
        }
        None => Vec::new(),
    };
    let tags = match doc.vector(DOCUMENT_NODES_TYPE, "nodes_type")? {
        Some(v) => v.varints()?,
        None => Vec::new(),
    };
    if records.len() != tags.len() {
        return Err(DecodeError::NodeTypeCountMismatch {
            nodes: records.len(),
            tags: tags.len(),
        });
    }

    let mut nodes: FxHashMap<NodeId, Node> =
        FxHashMap::with_capacity_and_hasher(records.len(), Default::default());
    let mut refs = Vec::with_capacity(records.len());
    for (index, (record, tag)) in records.iter().zip(tags).enumerate() {
        let tag = NodeTypeTag::from_code(tag).ok_or(DecodeError::InvalidNodeType { tag, index })?;
        let DecodedNode { node, parent } = decode_node(tag, record, options.segment_policy)?;
        let id = node.id().clone();
        if let Some(parent) = parent {
            if parent.order_key.len() > MAX_ORDER_KEY_LEN {
                return Err(DecodeError::LengthExceedsLimit {
                    field: "order_key",
                    len: parent.order_key.len(),
                    max: MAX_ORDER_KEY_LEN,
                });
            }
            refs.push((id.clone(), parent));
        }
        if nodes.contains_key(&id) {
            return Err(DecodeError::DuplicateNodeId { id });
        }
        nodes.insert(id, node);
    }

    let scenes = match doc.vector(DOCUMENT_SCENES, "scenes")? {
        Some(v) => v
            .tables("scene reference")?
            .iter()
            .map(|t| {
                decode_identifier(t)?.ok_or(DecodeError::MissingField {
                    table: "scene reference",
                    field: "id",
                })
            })
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };

    let links = rebuild_links(&nodes, refs);
    tracing::debug!(nodes = nodes.len(), scenes = scenes.len(), "decoded document");

    Ok(CanvasFile {
        schema_version,
        document: Document {
            nodes,
            links,
            scenes,
            ..Document::default()
        },
    })
}

/// Rebuilds parent-to-children adjacency from parent references.
///
/// Siblings are ordered by order key, ties broken by child id. Every node
/// gets an entry, empty for leaves.
pub fn rebuild_links(
    nodes: &FxHashMap<NodeId, Node>,
    refs: Vec<(NodeId, ParentReference)>,
) -> FxHashMap<NodeId, Vec<NodeId>> {
    let mut grouped: FxHashMap<NodeId, Vec<(String, NodeId)>> = FxHashMap::default();
    for (child, reference) in refs {
        if !nodes.contains_key(&reference.parent_id) {
            tracing::warn!(child = %child, parent = %reference.parent_id, "parent reference to missing node");
        }
        if let Err(e) = validate_order_key(&reference.order_key) {
            tracing::debug!(child = %child, error = %e, "non-canonical order key");
        }
        grouped
            .entry(reference.parent_id)
            .or_default()
            .push((reference.order_key, child));
    }

    let mut links: FxHashMap<NodeId, Vec<NodeId>> =
        FxHashMap::with_capacity_and_hasher(nodes.len(), Default::default());
    for (parent, mut children) in grouped {
        children.sort_unstable();
        for pair in children.windows(2) {
            if pair[0].0 == pair[1].0 {
                tracing::warn!(parent = %parent, key = %pair[0].0, "duplicate order key among siblings");
            }
        }
        links.insert(parent, children.into_iter().map(|(_, child)| child).collect());
    }
    for id in nodes.keys() {
        links.entry(id.clone()).or_default();
    }
    links
}
