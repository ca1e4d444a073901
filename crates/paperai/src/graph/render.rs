//! Positioned scenes and the renderer seam.
//!
//! A [`Scene`] is plain data: every node carries its final position, color,
//! size and shape. Anything that can draw it implements [`GraphRenderer`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::layout::{ForceLayout, Layout};
use super::style::{self, ColorScheme, NodeShape};
use super::{Graph, NodeCategory, build_connected_papers, build_knowledge_graph};
use crate::error::LayoutError;
use crate::models::{AuthorStats, Connection, PaperRecord, TopicStats};

/// A styled, positioned node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    /// Node id.
    pub id: String,
    /// Display label.
    pub label: String,
    /// Entity kind.
    pub category: NodeCategory,
    /// Center x.
    pub x: f64,
    /// Center y.
    pub y: f64,
    /// Diameter in pixels.
    pub size: f64,
    /// CSS fill color.
    pub color: String,
    /// Outline shape.
    pub shape: NodeShape,
}

/// A styled edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneEdge {
    /// Source node id.
    pub source: String,
    /// Target node id.
    pub target: String,
    /// Stroke width.
    pub width: f64,
    /// CSS stroke color.
    pub color: String,
    /// Stroke opacity.
    pub opacity: f64,
}

/// Everything a renderer needs to draw one graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Canvas width.
    pub width: f64,
    /// Canvas height.
    pub height: f64,
    /// Nodes in insertion order.
    pub nodes: Vec<SceneNode>,
    /// Edges in insertion order.
    pub edges: Vec<SceneEdge>,
}

impl Scene {
    /// Combine a graph with its layout under a color scheme.
    #[must_use]
    pub fn compose(graph: &Graph, layout: &Layout, scheme: ColorScheme) -> Self {
        let nodes = graph
            .nodes()
            .iter()
            .zip(layout.positions())
            .map(|(node, pos)| SceneNode {
                id: node.id.clone(),
                label: node.label.clone(),
                category: node.category,
                x: pos.x,
                y: pos.y,
                size: node.size,
                color: scheme.fill(node),
                shape: node.category.into(),
            })
            .collect();

        let edges = graph
            .edges()
            .iter()
            .map(|edge| SceneEdge {
                source: edge.source.clone(),
                target: edge.target.clone(),
                width: style::edge_width(edge.weight),
                color: style::EDGE_COLOR.to_string(),
                opacity: style::EDGE_OPACITY,
            })
            .collect();

        Self { width: layout.width(), height: layout.height(), nodes, edges }
    }
}

/// Draws scenes. Implemented by whatever display binding is in use.
pub trait GraphRenderer {
    /// Replace whatever is currently drawn with `scene`.
    fn render(&mut self, scene: &Scene);
}

/// Renderer that keeps every scene it is given.
#[derive(Debug, Clone, Default)]
pub struct SceneRenderer {
    scenes: Vec<Scene>,
}

impl SceneRenderer {
    /// Most recently rendered scene.
    #[must_use]
    pub fn last(&self) -> Option<&Scene> {
        self.scenes.last()
    }

    /// Number of renders so far.
    #[must_use]
    pub fn render_count(&self) -> usize {
        self.scenes.len()
    }

    /// Take the most recent scene.
    pub fn into_last(mut self) -> Option<Scene> {
        self.scenes.pop()
    }
}

impl GraphRenderer for SceneRenderer {
    fn render(&mut self, scene: &Scene) {
        self.scenes.push(scene.clone());
    }
}

/// Side-panel detail for a selected paper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperDetail {
    /// Paper id.
    pub id: String,
    /// Title.
    pub title: String,
    /// Author names.
    pub authors: Vec<String>,
    /// Publication year.
    pub year: i32,
    /// Citation count.
    pub citations: u32,
    /// Abstract text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r#abstract: Option<String>,
}

impl From<&PaperRecord> for PaperDetail {
    fn from(paper: &PaperRecord) -> Self {
        Self {
            id: paper.id.clone(),
            title: paper.title.clone(),
            authors: paper.authors.clone(),
            year: paper.year,
            citations: paper.citations,
            r#abstract: paper.r#abstract.clone(),
        }
    }
}

/// A displayed graph: the records behind it, its scene and the renderer.
///
/// Every update discards the previous graph and lays the new one out from
/// scratch.
#[derive(Debug)]
pub struct GraphView<R: GraphRenderer> {
    renderer: R,
    engine: ForceLayout,
    scheme: ColorScheme,
    records: HashMap<String, PaperRecord>,
    graph: Graph,
    scene: Scene,
}

impl<R: GraphRenderer> GraphView<R> {
    /// Create an empty view.
    pub fn new(renderer: R, engine: ForceLayout, scheme: ColorScheme) -> Self {
        Self {
            renderer,
            engine,
            scheme,
            records: HashMap::new(),
            graph: Graph::new(),
            scene: Scene::default(),
        }
    }

    /// Replace the displayed graph, re-run layout and render.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError`] if `graph` contains a dangling edge; the view
    /// is left empty in that case.
    pub fn update(&mut self, papers: &[PaperRecord], graph: Graph) -> Result<&Scene, LayoutError> {
        self.records.clear();
        self.graph.clear();
        self.scene = Scene::default();

        let layout = self.engine.run(&graph)?;
        self.scene = Scene::compose(&graph, &layout, self.scheme);
        self.records = papers.iter().map(|p| (p.id.clone(), p.clone())).collect();
        self.graph = graph;

        self.renderer.render(&self.scene);
        Ok(&self.scene)
    }

    /// Show the connected-papers view.
    ///
    /// # Errors
    ///
    /// Propagates layout failures.
    pub fn show_connected(
        &mut self,
        papers: &[PaperRecord],
        connections: &[Connection],
    ) -> Result<&Scene, LayoutError> {
        let graph = build_connected_papers(papers, connections);
        self.update(papers, graph)
    }

    /// Show the knowledge-graph view.
    ///
    /// # Errors
    ///
    /// Propagates layout failures.
    pub fn show_knowledge(
        &mut self,
        papers: &[PaperRecord],
        authors: &[AuthorStats],
        topics: &[TopicStats],
    ) -> Result<&Scene, LayoutError> {
        let graph = build_knowledge_graph(papers, authors, topics);
        self.update(papers, graph)
    }

    /// Detail for a selected paper node; `None` for other nodes or unknown ids.
    #[must_use]
    pub fn select(&self, node_id: &str) -> Option<PaperDetail> {
        let node = self.graph.node(node_id)?;
        if node.category != NodeCategory::Paper {
            return None;
        }
        self.records
            .get(node_id)
            .or_else(|| node_id.strip_prefix("p-").and_then(|id| self.records.get(id)))
            .map(PaperDetail::from)
    }

    /// Current scene.
    #[must_use]
    pub const fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Current graph.
    #[must_use]
    pub const fn graph(&self) -> &Graph {
        &self.graph
    }

    /// The renderer.
    #[must_use]
    pub const fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Consume the view, returning its renderer.
    pub fn into_renderer(self) -> R {
        self.renderer
    }
}
