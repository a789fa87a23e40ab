//! Subtree-width tree layout
//!
//! Every leaf gets one fixed horizontal unit; an internal node is as wide as
//! the sum of its children. Each node is centered over the band its subtree
//! occupies and children split that band left to right in input order.
//!
//! Both passes walk a flattened pre-order copy of the tree, so arbitrarily
//! deep roadmaps never recurse.

use std::collections::HashMap;

use super::models::{Band, Edge, EdgeStyle, NodeMastery, PositionedNode, RoadmapGraph, RoadmapNode};

/// Spacing used when positioning nodes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// Band width of a leaf
    pub unit_width: f64,
    /// Vertical distance between a parent and its children
    pub level_height: f64,
    /// Rendered width of a node box. Clamped to `unit_width` so boxes stay
    /// inside their band.
    pub node_width: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            unit_width: 250.0,
            level_height: 150.0,
            node_width: 200.0,
        }
    }
}

struct FlatNode<'a> {
    node: &'a RoadmapNode,
    parent: Option<usize>,
    depth: usize,
    children: Vec<usize>,
}

/// Lay out `root` with the default spacing
pub fn layout(root: &RoadmapNode, mastery: &[NodeMastery]) -> RoadmapGraph {
    layout_with(root, mastery, &LayoutConfig::default())
}

/// Lay out `root`, attaching mastery by node id (missing ids count as zero)
pub fn layout_with(root: &RoadmapNode, mastery: &[NodeMastery], config: &LayoutConfig) -> RoadmapGraph {
    let flat = flatten(root);
    let node_width = config.node_width.min(config.unit_width);

    // Width pass: children always follow their parent in pre-order
    let mut widths = vec![0.0_f64; flat.len()];
    for index in (0..flat.len()).rev() {
        widths[index] = if flat[index].children.is_empty() {
            config.unit_width
        } else {
            flat[index].children.iter().map(|&child| widths[child]).sum()
        };
    }

    // Band pass
    let mut bands = vec![Band { start: 0.0, width: 0.0 }; flat.len()];
    bands[0].width = widths[0];
    for index in 0..flat.len() {
        let mut cursor = bands[index].start;
        for &child in &flat[index].children {
            bands[child] = Band {
                start: cursor,
                width: widths[child],
            };
            cursor += widths[child];
        }
    }

    let table: HashMap<&str, &NodeMastery> = mastery
        .iter()
        .map(|m| (m.node_id.as_str(), m))
        .collect();

    let mut graph = RoadmapGraph {
        nodes: Vec::with_capacity(flat.len()),
        edges: Vec::with_capacity(flat.len().saturating_sub(1)),
    };

    for (index, entry) in flat.iter().enumerate() {
        let node = entry.node;
        let band = bands[index];
        let node_mastery = table
            .get(node.id.as_str())
            .map(|m| (*m).clone())
            .unwrap_or_else(|| NodeMastery::empty(node.id.as_str()));

        if let Some(parent) = entry.parent {
            let percentage = node_mastery.percentage;
            let source = &flat[parent].node.id;
            graph.edges.push(Edge {
                id: edge_id(source, &node.id),
                source: source.clone(),
                target: node.id.clone(),
                animated: percentage > 0.0,
                style: EdgeStyle::for_percentage(percentage),
            });
        }

        graph.nodes.push(PositionedNode {
            id: node.id.clone(),
            label: node.label.clone(),
            x: band.start + band.width / 2.0 - node_width / 2.0,
            y: entry.depth as f64 * config.level_height,
            depth: entry.depth,
            band,
            mastery: node_mastery,
        });
    }

    graph
}

/// `source-target`, with `\` and `-` inside either id backslash-escaped
fn edge_id(source: &str, target: &str) -> String {
    let escape = |id: &str| id.replace('\\', "\\\\").replace('-', "\\-");
    format!("{}-{}", escape(source), escape(target))
}

/// Pre-order copy of the tree with parent/child indices
fn flatten(root: &RoadmapNode) -> Vec<FlatNode<'_>> {
    let mut flat: Vec<FlatNode<'_>> = Vec::new();
    let mut stack: Vec<(&RoadmapNode, Option<usize>, usize)> = vec![(root, None, 0)];

    while let Some((node, parent, depth)) = stack.pop() {
        let index = flat.len();
        if let Some(parent) = parent {
            flat[parent].children.push(index);
        }
        flat.push(FlatNode {
            node,
            parent,
            depth,
            children: Vec::with_capacity(node.children.len()),
        });

        // Reversed so the first child is popped (and numbered) first
        for child in node.children.iter().rev() {
            stack.push((child, Some(index), depth + 1));
        }
    }

    flat
}
