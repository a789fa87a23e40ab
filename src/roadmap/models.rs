//! Data models for roadmap layout

use serde::{Deserialize, Serialize};

/// A topic in a learning roadmap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapNode {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RoadmapNode>,
    /// Another roadmap this topic expands into
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roadmap_ref: Option<String>,
}

impl RoadmapNode {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            description: String::new(),
            tags: Vec::new(),
            children: Vec::new(),
            roadmap_ref: None,
        }
    }

    pub fn with_children(mut self, children: Vec<RoadmapNode>) -> Self {
        self.children = children;
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// How much of a topic's cards have been learned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeMastery {
    pub node_id: String,
    /// 0-100
    pub percentage: f64,
    #[serde(default)]
    pub total_cards: u32,
    #[serde(default)]
    pub mastered_cards: u32,
}

impl NodeMastery {
    /// Mastery for a topic with no cards yet
    pub fn empty(node_id: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            percentage: 0.0,
            total_cards: 0,
            mastered_cards: 0,
        }
    }
}

/// Horizontal interval allocated to a node's subtree
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Band {
    pub start: f64,
    pub width: f64,
}

impl Band {
    pub fn end(&self) -> f64 {
        self.start + self.width
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedNode {
    pub id: String,
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub depth: usize,
    pub band: Band,
    pub mastery: NodeMastery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EdgeStyle {
    Pending,
    InProgress,
    Complete,
}

impl EdgeStyle {
    pub fn for_percentage(percentage: f64) -> Self {
        if percentage >= 100.0 {
            Self::Complete
        } else if percentage > 0.0 {
            Self::InProgress
        } else {
            Self::Pending
        }
    }
}

/// Directed parent -> child connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub animated: bool,
    pub style: EdgeStyle,
}

/// Render-ready roadmap: nodes in pre-order plus their edges
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapGraph {
    pub nodes: Vec<PositionedNode>,
    pub edges: Vec<Edge>,
}
