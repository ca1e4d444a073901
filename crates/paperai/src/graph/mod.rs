//! Paper relationship graphs.
//!
//! - [`builder`]: turns paper lists into node/edge collections
//! - [`layout`]: force-directed placement
//! - [`style`]: data → color/size/shape mapping
//! - [`render`]: renderer trait, positioned scenes and the stateful [`GraphView`]

pub mod builder;
pub mod layout;
pub mod render;
pub mod style;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub use builder::{build_connected_papers, build_knowledge_graph, normalize_key};
pub use layout::{ForceLayout, Layout, LayoutConfig, Position};
pub use render::{GraphRenderer, GraphView, PaperDetail, Scene, SceneEdge, SceneNode, SceneRenderer};
pub use style::{ColorScheme, NodeShape};

/// Kind of entity a node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeCategory {
    /// A paper.
    Paper,
    /// An author.
    Author,
    /// A research topic.
    Topic,
}

/// A graph vertex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Unique node id.
    pub id: String,

    /// Display label.
    pub label: String,

    /// Entity kind.
    pub category: NodeCategory,

    /// Diameter in pixels, within [30, 80].
    pub size: f64,

    /// Publication year (papers only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,

    /// Citation count the size was derived from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub citations: Option<u32>,
}

/// A directed graph edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Source node id.
    pub source: String,

    /// Target node id.
    pub target: String,

    /// Link weight, used for stroke thickness only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

/// Nodes and edges in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    index: HashMap<String, usize>,
}

impl Graph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node unless one with the same id exists. Returns true if added.
    pub fn add_node(&mut self, node: GraphNode) -> bool {
        if self.index.contains_key(&node.id) {
            return false;
        }
        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        true
    }

    /// Add an edge. Both endpoints must already be present; returns false otherwise.
    pub fn add_edge(&mut self, edge: GraphEdge) -> bool {
        if !self.contains(&edge.source) || !self.contains(&edge.target) {
            return false;
        }
        self.edges.push(edge);
        true
    }

    /// True if a node with `id` exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Look up a node by id.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// Position of a node in insertion order.
    #[must_use]
    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// All nodes in insertion order.
    #[must_use]
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    /// All edges in insertion order.
    #[must_use]
    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    /// Number of nodes of a category.
    #[must_use]
    pub fn count(&self, category: NodeCategory) -> usize {
        self.nodes.iter().filter(|n| n.category == category).count()
    }

    /// Drop every element.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.index.clear();
    }
}
