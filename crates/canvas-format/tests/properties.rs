//! Property tests over generated documents.

use canvas_format::codec::{decode_document, encode_document};
use canvas_format::model::order_key::{key_between, n_keys_between, validate_order_key};
use canvas_format::model::{
    Axis, BasicShape, BasicShapeNode, ContainerNode, CornerRadii, Document, DocumentBuilder, Edge,
    EdgePoint, FeBlurEffect, FeShadow, GradientPaint, GradientStop, GroupNode, Guide, ImagePaint,
    LayerTrait, Layout, LayoutPositioning, Length, LineNode, Node, Paint, Point2D, Rgba32F,
    SceneNode, StrokeWidths, TextNode, VectorNetwork, VectorNode, derived_node_id,
};
use canvas_format::validate_document;
use proptest::prelude::*;

type Rgb = (f32, f32, f32);

fn color((r, g, b): Rgb) -> Rgba32F {
    Rgba32F::new(r, g, b, 1.0)
}

#[derive(Debug, Clone)]
enum ShapeSeed {
    Rect { radius: f32 },
    Ellipse { inner_radius: f32, start_angle: f32, angle: f32 },
    Polygon { point_count: u32, corner_radius: f32 },
    Star { point_count: u32, inner_radius: f32, corner_radius: f32 },
}

impl ShapeSeed {
    fn into_shape(self) -> BasicShape {
        match self {
            ShapeSeed::Rect { radius } => BasicShape::Rectangle {
                corner_radii: CornerRadii::uniform(radius),
                stroke_widths: StrokeWidths::uniform(0.0),
            },
            ShapeSeed::Ellipse {
                inner_radius,
                start_angle,
                angle,
            } => BasicShape::Ellipse {
                inner_radius,
                start_angle,
                angle,
            },
            ShapeSeed::Polygon {
                point_count,
                corner_radius,
            } => BasicShape::RegularPolygon {
                point_count,
                corner_radius,
            },
            ShapeSeed::Star {
                point_count,
                inner_radius,
                corner_radius,
            } => BasicShape::RegularStarPolygon {
                point_count,
                inner_radius,
                corner_radius,
            },
        }
    }
}

#[derive(Debug, Clone)]
enum PaintSeed {
    Solid(Rgb),
    Linear(Vec<(f32, Rgb)>),
    Radial(Vec<(f32, Rgb)>),
    Image { src: String, opacity: f32 },
}

impl PaintSeed {
    fn into_paint(self) -> Paint {
        let stops = |stops: Vec<(f32, Rgb)>| {
            GradientPaint::new(
                stops
                    .into_iter()
                    .map(|(offset, rgb)| GradientStop {
                        offset,
                        color: color(rgb),
                    })
                    .collect(),
            )
        };
        match self {
            PaintSeed::Solid(rgb) => Paint::solid(color(rgb)),
            PaintSeed::Linear(s) => Paint::LinearGradient(stops(s)),
            PaintSeed::Radial(s) => Paint::RadialGradient(stops(s)),
            PaintSeed::Image { src, opacity } => {
                let mut image = ImagePaint::new(src);
                image.opacity = opacity;
                Paint::Image(image)
            }
        }
    }
}

/// Effects and placement shared by every layer node.
#[derive(Debug, Clone)]
struct LayerSeed {
    shadow: Option<(f32, f32, bool)>,
    blur: Option<f32>,
    /// Right and bottom insets of an absolutely positioned layer.
    inset: Option<(f32, f32)>,
}

impl LayerSeed {
    fn apply(self, layer: &mut LayerTrait) {
        if let Some((dy, blur, inset)) = self.shadow {
            layer.effects.shadows.push(FeShadow {
                inset,
                dy,
                blur,
                ..FeShadow::default()
            });
        }
        layer.effects.blur = self.blur.map(FeBlurEffect::gaussian);
        if let Some((right, bottom)) = self.inset {
            layer.layout = Layout {
                positioning: LayoutPositioning::Absolute,
                right: Some(right),
                bottom: Some(bottom),
                width: Length::Px(100.0),
                ..Layout::default()
            };
        }
    }
}

#[derive(Debug, Clone)]
enum NodeSeed {
    Shape {
        shape: ShapeSeed,
        fills: Vec<PaintSeed>,
        strokes: Vec<PaintSeed>,
        layer: LayerSeed,
    },
    Text(String),
    Group,
    Container { opacity: f32, layer: LayerSeed },
    Vector(Vec<(f32, f32)>),
    Line { width: f32 },
}

impl NodeSeed {
    fn can_parent(&self) -> bool {
        matches!(self, NodeSeed::Group | NodeSeed::Container { .. })
    }

    fn into_node(self, id: String) -> Node {
        match self {
            NodeSeed::Shape {
                shape,
                fills,
                strokes,
                layer,
            } => {
                let mut node = BasicShapeNode::new(id, "Shape", shape.into_shape());
                node.fill_paints = fills.into_iter().map(PaintSeed::into_paint).collect();
                node.stroke_paints = strokes.into_iter().map(PaintSeed::into_paint).collect();
                layer.apply(&mut node.layer);
                node.into()
            }
            NodeSeed::Text(text) => TextNode::new(id, "Text", text).into(),
            NodeSeed::Group => GroupNode::new(id, "Group").into(),
            NodeSeed::Container { opacity, layer } => {
                let mut frame = ContainerNode::new(id, "Frame");
                layer.apply(&mut frame.layer);
                frame.layer.opacity = opacity;
                frame.into()
            }
            NodeSeed::Vector(points) => {
                let points: Vec<Point2D> =
                    points.into_iter().map(|(x, y)| Point2D::new(x, y)).collect();
                VectorNode::new(id, "Path", VectorNetwork::polygon(&points)).into()
            }
            NodeSeed::Line { width } => {
                let mut line = LineNode::new(id, "Line");
                line.stroke_width = width;
                line.into()
            }
        }
    }
}

fn arb_rgb() -> impl Strategy<Value = Rgb> {
    (0.0f32..=1.0, 0.0f32..=1.0, 0.0f32..=1.0)
}

fn arb_shape() -> impl Strategy<Value = ShapeSeed> {
    prop_oneof![
        (0.0f32..64.0).prop_map(|radius| ShapeSeed::Rect { radius }),
        (0.0f32..1.0, 0.0f32..360.0, 0.0f32..=360.0).prop_map(
            |(inner_radius, start_angle, angle)| ShapeSeed::Ellipse {
                inner_radius,
                start_angle,
                angle,
            }
        ),
        (3u32..12, 0.0f32..16.0).prop_map(|(point_count, corner_radius)| ShapeSeed::Polygon {
            point_count,
            corner_radius,
        }),
        (3u32..12, 0.0f32..1.0, 0.0f32..16.0).prop_map(
            |(point_count, inner_radius, corner_radius)| ShapeSeed::Star {
                point_count,
                inner_radius,
                corner_radius,
            }
        ),
    ]
}

fn arb_paint() -> impl Strategy<Value = PaintSeed> {
    let stops = || prop::collection::vec((0.0f32..=1.0, arb_rgb()), 0..4);
    prop_oneof![
        arb_rgb().prop_map(PaintSeed::Solid),
        stops().prop_map(PaintSeed::Linear),
        stops().prop_map(PaintSeed::Radial),
        ("[a-z0-9]{1,12}", 0.0f32..=1.0).prop_map(|(name, opacity)| PaintSeed::Image {
            src: format!("res://images/{name}.png"),
            opacity,
        }),
    ]
}

fn arb_layer() -> impl Strategy<Value = LayerSeed> {
    (
        prop::option::of((-16.0f32..16.0, 0.0f32..32.0, any::<bool>())),
        prop::option::of(0.0f32..24.0),
        prop::option::of((-200.0f32..200.0, -200.0f32..200.0)),
    )
        .prop_map(|(shadow, blur, inset)| LayerSeed {
            shadow,
            blur,
            inset,
        })
}

fn arb_seed() -> impl Strategy<Value = NodeSeed> {
    prop_oneof![
        (
            arb_shape(),
            prop::collection::vec(arb_paint(), 0..3),
            prop::collection::vec(arb_paint(), 0..2),
            arb_layer(),
        )
            .prop_map(|(shape, fills, strokes, layer)| NodeSeed::Shape {
                shape,
                fills,
                strokes,
                layer,
            }),
        "[a-zA-Z0-9 ]{0,24}".prop_map(NodeSeed::Text),
        Just(NodeSeed::Group),
        (0.0f32..=1.0, arb_layer())
            .prop_map(|(opacity, layer)| NodeSeed::Container { opacity, layer }),
        prop::collection::vec((-500.0f32..500.0, -500.0f32..500.0), 0..6).prop_map(NodeSeed::Vector),
        (0.0f32..8.0).prop_map(|width| NodeSeed::Line { width }),
    ]
}

/// One end of a scene edge: a free point, or an anchor on a generated node.
#[derive(Debug, Clone)]
enum EndSeed {
    Point(f32, f32),
    Anchor(prop::sample::Index),
}

fn arb_end() -> impl Strategy<Value = EndSeed> {
    prop_oneof![
        (-500.0f32..500.0, -500.0f32..500.0).prop_map(|(x, y)| EndSeed::Point(x, y)),
        any::<prop::sample::Index>().prop_map(EndSeed::Anchor),
    ]
}

fn arb_scene() -> impl Strategy<Value = (Vec<(bool, f32)>, Vec<(EndSeed, EndSeed)>)> {
    (
        prop::collection::vec((any::<bool>(), -1000.0f32..1000.0), 0..4),
        prop::collection::vec((arb_end(), arb_end()), 0..4),
    )
}

/// A scene with guides and edges plus up to 40 nodes, each attached to the
/// scene or to an earlier group/container. Ids are hashed so lexical order
/// differs from render order.
fn arb_document() -> impl Strategy<Value = Document> {
    (
        arb_scene(),
        prop::collection::vec((arb_seed(), any::<prop::sample::Index>()), 0..40),
    )
        .prop_map(|((guides, edges), items)| {
            let scene_id = derived_node_id(b"scene");
            let ids: Vec<String> = (0..items.len())
                .map(|i| derived_node_id(format!("node-{i}").as_bytes()))
                .collect();

            let end = |seed: EndSeed| match seed {
                EndSeed::Point(x, y) => EdgePoint::Position(Point2D::new(x, y)),
                EndSeed::Anchor(pick) if !ids.is_empty() => EdgePoint::Anchor {
                    target: pick.get(&ids).clone(),
                },
                EndSeed::Anchor(_) => EdgePoint::Anchor {
                    target: scene_id.clone(),
                },
            };
            let mut scene = SceneNode::new(scene_id.clone(), "Page");
            scene.guides = guides
                .into_iter()
                .map(|(vertical, offset)| Guide {
                    axis: if vertical { Axis::Vertical } else { Axis::Horizontal },
                    offset,
                })
                .collect();
            scene.edges = edges
                .into_iter()
                .enumerate()
                .map(|(i, (a, b))| Edge {
                    id: format!("edge-{i}"),
                    a: end(a),
                    b: end(b),
                })
                .collect();

            let mut builder = DocumentBuilder::new().scene(scene, |s| s);
            let mut parents = vec![scene_id.clone()];
            for ((seed, pick), id) in items.into_iter().zip(ids.iter().cloned()) {
                let parent = pick.get(&parents).clone();
                if seed.can_parent() {
                    parents.push(id.clone());
                }
                builder = builder.child(&parent, seed.into_node(id));
            }
            builder.build()
        })
}

proptest! {
    #[test]
    fn prop_document_roundtrips(doc in arb_document()) {
        prop_assert_eq!(validate_document(&doc), Ok(()));
        let bytes = encode_document(&doc).unwrap();
        let decoded = decode_document(&bytes).unwrap();
        prop_assert_eq!(decoded, doc);
    }

    #[test]
    fn prop_sibling_order_survives(doc in arb_document()) {
        let decoded = decode_document(&encode_document(&doc).unwrap()).unwrap();
        for (parent, children) in &doc.links {
            prop_assert_eq!(decoded.children(parent), children.as_slice(), "children of {}", parent);
        }
    }

    #[test]
    fn prop_reencode_is_identical(doc in arb_document()) {
        let once = encode_document(&doc).unwrap();
        let twice = encode_document(&decode_document(&once).unwrap()).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_encoding_ignores_insertion_order(doc in arb_document()) {
        let mut shuffled = Document {
            scenes: doc.scenes.clone(),
            ..Document::default()
        };
        let mut nodes: Vec<_> = doc.nodes.clone().into_iter().collect();
        nodes.sort_by(|a, b| b.0.cmp(&a.0));
        shuffled.nodes.extend(nodes);
        let mut links: Vec<_> = doc.links.clone().into_iter().collect();
        links.sort_by(|a, b| b.0.cmp(&a.0));
        shuffled.links.extend(links);

        prop_assert_eq!(encode_document(&shuffled).unwrap(), encode_document(&doc).unwrap());
    }

    #[test]
    fn prop_arbitrary_input_never_panics(tail in prop::collection::vec(any::<u8>(), 0..256)) {
        let mut bytes = b"CNVS\x01".to_vec();
        bytes.extend(tail);
        let _ = decode_document(&bytes);
    }

    #[test]
    fn prop_generated_keys_ascend(n in 0usize..200) {
        let keys = n_keys_between(None, None, n).unwrap();
        prop_assert_eq!(keys.len(), n);
        for key in &keys {
            prop_assert!(validate_order_key(key).is_ok(), "invalid key {}", key);
        }
        for pair in keys.windows(2) {
            prop_assert!(pair[0] < pair[1], "{} !< {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn prop_repeated_insertion_stays_between(steps in prop::collection::vec(any::<bool>(), 1..60)) {
        // Keep bisecting toward one end to stress fractional digits.
        let mut lo = key_between(None, None).unwrap();
        let mut hi = key_between(Some(&lo), None).unwrap();
        for toward_lo in steps {
            let mid = key_between(Some(&lo), Some(&hi)).unwrap();
            prop_assert!(lo < mid && mid < hi, "{} not in ({}, {})", mid, lo, hi);
            if toward_lo {
                hi = mid;
            } else {
                lo = mid;
            }
        }
    }
}
