//! Benchmark for canvas document serialization.
//!
//! Builds a document from a JSON page layout (or a synthetic one when no
//! file is given), then times encoding and decoding and writes the binary
//! next to the input.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use canvas_format::codec::{decode_document, encode_document, fingerprint};
use canvas_format::model::{
    BasicShape, BasicShapeNode, ContainerNode, ContainerStyle, CornerRadii, Document,
    DocumentBuilder, FeShadow, LayoutMode, Length, Node, Paint, Rgba32F, SceneNode, StrokeWidths,
    TextNode, derived_node_id,
};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

// =============================================================================
// JSON DATA STRUCTURES
// =============================================================================

#[derive(Debug, Deserialize)]
struct Layout {
    pages: Vec<Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    name: String,
    cards: Vec<Card>,
}

#[derive(Debug, Deserialize)]
struct Card {
    title: String,
    #[serde(default)]
    body: Option<String>,
    width: f32,
    height: f32,
    /// `#rrggbb`
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    radius: f32,
    #[serde(default)]
    shadow: bool,
}

#[derive(Debug, Serialize)]
struct Report {
    pages: usize,
    nodes: usize,
    json_bytes: usize,
    encoded_bytes: usize,
    encode_ms: f64,
    decode_ms: f64,
    encode_mb_per_s: f64,
    decode_mb_per_s: f64,
    fingerprint: String,
}

// =============================================================================
// CONVERSION
// =============================================================================

fn parse_color(hex: &str) -> Option<Rgba32F> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16)
            .ok()
            .map(|v| v as f32 / 255.0)
    };
    Some(Rgba32F::new(channel(0)?, channel(2)?, channel(4)?, 1.0))
}

fn card_nodes(page: usize, index: usize, card: &Card) -> (ContainerNode, Vec<Node>) {
    let key = |part: &str| derived_node_id(format!("{page}/{index}/{part}").as_bytes());

    let mut frame = ContainerNode::new(key("frame"), card.title.clone());
    frame.layer.layout.width = Length::Px(card.width);
    frame.layer.layout.height = Length::Px(card.height);
    frame.layer.layout.container = Some(ContainerStyle {
        mode: LayoutMode::Flex,
        main_axis_gap: 8.0,
        ..ContainerStyle::default()
    });
    frame.corner_radii = CornerRadii::uniform(card.radius);
    if card.shadow {
        frame.layer.effects.shadows.push(FeShadow {
            dy: 2.0,
            blur: 8.0,
            ..FeShadow::default()
        });
    }

    let mut background = BasicShapeNode::new(
        key("bg"),
        "Background",
        BasicShape::Rectangle {
            corner_radii: CornerRadii::uniform(card.radius),
            stroke_widths: StrokeWidths::uniform(0.0),
        },
    );
    let fill = card
        .color
        .as_deref()
        .and_then(parse_color)
        .unwrap_or(Rgba32F::WHITE);
    background.fill_paints.push(Paint::solid(fill));

    let mut children: Vec<Node> = vec![
        background.into(),
        TextNode::new(key("title"), "Title", card.title.clone()).into(),
    ];
    if let Some(body) = &card.body {
        children.push(TextNode::new(key("body"), "Body", body.clone()).into());
    }
    (frame, children)
}

fn convert_layout(layout: &Layout) -> Document {
    let mut builder = DocumentBuilder::new();
    for (p, page) in layout.pages.iter().enumerate() {
        let scene_id = derived_node_id(format!("page/{p}").as_bytes());
        builder = builder.scene(SceneNode::new(scene_id, page.name.clone()), |mut s| {
            for (i, card) in page.cards.iter().enumerate() {
                let (frame, children) = card_nodes(p, i, card);
                s = s.parent(frame, |c| children.into_iter().fold(c, |c, n| c.child(n)));
            }
            s
        });
    }
    builder.build()
}

fn synthetic_layout(pages: usize, cards: usize) -> Layout {
    Layout {
        pages: (0..pages)
            .map(|p| Page {
                name: format!("Page {}", p + 1),
                cards: (0..cards)
                    .map(|c| Card {
                        title: format!("Card {c}"),
                        body: (c % 3 != 0).then(|| format!("Body text for card {c} on page {p}")),
                        width: 200.0 + (c % 7) as f32 * 10.0,
                        height: 120.0,
                        color: Some(format!("#{:06x}", (c * 0x1f3d5b) & 0xffffff)),
                        radius: (c % 4) as f32 * 4.0,
                        shadow: c % 2 == 0,
                    })
                    .collect(),
            })
            .collect(),
    }
}

fn throughput(bytes: usize, elapsed: Duration) -> f64 {
    (bytes as f64 / 1_000_000.0) / elapsed.as_secs_f64()
}

fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let data_path = std::env::args().nth(1).map(PathBuf::from);

    let (layout, json_bytes) = match &data_path {
        Some(path) => {
            eprintln!("Loading layout from: {}", path.display());
            let json = fs::read_to_string(path)?;
            let layout: Layout = serde_json::from_str(&json)?;
            (layout, json.len())
        }
        None => {
            eprintln!("No layout given, using 20 synthetic pages of 500 cards");
            (synthetic_layout(20, 500), 0)
        }
    };

    let convert_start = Instant::now();
    let document = convert_layout(&layout);
    tracing::info!(
        nodes = document.nodes.len(),
        elapsed = ?convert_start.elapsed(),
        "converted layout"
    );

    let encode_start = Instant::now();
    let encoded = encode_document(&document)?;
    let encode_time = encode_start.elapsed();

    let again = encode_document(&document)?;
    if again != encoded {
        return Err("encoding is not deterministic".into());
    }

    const DECODE_ITERS: u32 = 10;

    // Warmup
    for _ in 0..3 {
        decode_document(&encoded)?;
    }

    let decode_start = Instant::now();
    let mut decoded = Document::default();
    for _ in 0..DECODE_ITERS {
        decoded = decode_document(&encoded)?;
    }
    let decode_time = decode_start.elapsed() / DECODE_ITERS;

    if decoded != document {
        return Err("decoded document differs from the input".into());
    }

    if let Some(path) = &data_path {
        let output = path.with_extension("cnvs");
        fs::write(&output, &encoded)?;
        eprintln!("Wrote {}", output.display());
    } else {
        let output = Path::new("synthetic.cnvs");
        fs::write(output, &encoded)?;
        eprintln!("Wrote {}", output.display());
    }

    let report = Report {
        pages: layout.pages.len(),
        nodes: document.nodes.len(),
        json_bytes,
        encoded_bytes: encoded.len(),
        encode_ms: encode_time.as_secs_f64() * 1000.0,
        decode_ms: decode_time.as_secs_f64() * 1000.0,
        encode_mb_per_s: throughput(encoded.len(), encode_time),
        decode_mb_per_s: throughput(encoded.len(), decode_time),
        fingerprint: fingerprint(&encoded)
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
