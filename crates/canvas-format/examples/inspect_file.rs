//! Prints the scene tree of a canvas file.

use std::collections::BTreeMap;
use std::fs;

use canvas_format::codec::decode_file;
use canvas_format::model::{Document, Node};

fn describe(node: &Node) -> String {
    let system = node.system();
    let mut line = format!("{} \"{}\" ({})", node.kind(), system.name, system.id);
    match node {
        Node::Text(text) => {
            let preview: String = text.text.as_deref().unwrap_or("").chars().take(40).collect();
            line.push_str(&format!(" text={preview:?}"));
        }
        Node::Vector(vector) => line.push_str(&format!(
            " vertices={} segments={}",
            vector.network.vertices.len(),
            vector.network.segments.len()
        )),
        Node::Unknown(_) => line.push_str(" [unsupported]"),
        _ => {}
    }
    if !system.active {
        line.push_str(" [hidden]");
    }
    line
}

fn print_tree(document: &Document, id: &str, depth: usize) {
    let Some(node) = document.node(id) else {
        println!("{:indent$}<missing {id}>", "", indent = depth * 2);
        return;
    };
    println!("{:indent$}{}", "", describe(node), indent = depth * 2);
    for child in document.children(id) {
        print_tree(document, child, depth + 1);
    }
}

fn main() {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "document.cnvs".to_string());

    println!("Reading: {}", path);

    let data = fs::read(&path).expect("Failed to read file");
    println!("File size: {} bytes", data.len());

    let file = decode_file(&data).expect("Failed to decode");
    let document = &file.document;

    println!("\n=== File Info ===");
    println!("Schema version: {}", file.schema_version);
    println!("Scenes: {}", document.scenes.len());

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for node in document.nodes.values() {
        *counts.entry(node.kind()).or_default() += 1;
    }
    println!("\n=== Nodes ({}) ===", document.nodes.len());
    for (kind, count) in &counts {
        println!("  {kind}: {count}");
    }

    println!("\n=== Tree ===");
    for scene in &document.scenes {
        print_tree(document, scene, 0);
    }
}
