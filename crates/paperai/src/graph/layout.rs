//! Force-directed layout.
//!
//! A deterministic spring embedder:
//! - circular initial placement
//! - inverse-square repulsion between every pair of nodes
//! - Hooke's law springs on edges
//! - gravity toward the centroid
//! - per-iteration displacement capped by a geometrically cooling temperature

use std::collections::HashMap;
use std::f64::consts::TAU;

use euclid::default::{Point2D, Vector2D};
use serde::{Deserialize, Serialize};

use super::{Graph, GraphEdge, GraphNode};
use crate::error::LayoutError;

/// Layout tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Rest length of an edge spring.
    pub ideal_edge_length: f64,

    /// Repulsion constant between node pairs.
    pub node_repulsion: f64,

    /// Edge spring stiffness, in thousandths.
    pub edge_elasticity: f64,

    /// Pull toward the centroid, in thousandths.
    pub gravity: f64,

    /// Iteration cap.
    pub max_iterations: usize,

    /// Starting displacement cap.
    pub initial_temperature: f64,

    /// Temperature multiplier per iteration.
    pub cooling_factor: f64,

    /// Layout stops once the temperature drops below this.
    pub min_temperature: f64,

    /// Margin around the bounding box.
    pub padding: f64,

    /// Extra clearance kept between node outlines.
    pub node_overlap: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            ideal_edge_length: 100.0,
            node_repulsion: 400_000.0,
            edge_elasticity: 100.0,
            gravity: 80.0,
            max_iterations: 1000,
            initial_temperature: 200.0,
            cooling_factor: 0.95,
            min_temperature: 1.0,
            padding: 30.0,
            node_overlap: 20.0,
        }
    }
}

/// A node center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f64,

    /// Vertical coordinate.
    pub y: f64,
}

impl From<Point2D<f64>> for Position {
    fn from(p: Point2D<f64>) -> Self {
        Self { x: p.x, y: p.y }
    }
}

/// Positions for every node, in node order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    positions: Vec<Position>,
    width: f64,
    height: f64,
}

impl Layout {
    /// Position of the node at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Position> {
        self.positions.get(index).copied()
    }

    /// All positions in node order.
    #[must_use]
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Canvas width including padding on both sides.
    #[must_use]
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Canvas height including padding on both sides.
    #[must_use]
    pub const fn height(&self) -> f64 {
        self.height
    }

    /// True if there are no positions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Spring-embedder layout engine.
#[derive(Debug, Clone, Default)]
pub struct ForceLayout {
    config: LayoutConfig,
}

impl ForceLayout {
    /// Create a layout engine.
    #[must_use]
    pub const fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Current configuration.
    #[must_use]
    pub const fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay out a built graph.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::DanglingEdge`] if an edge references a missing node.
    pub fn run(&self, graph: &Graph) -> Result<Layout, LayoutError> {
        self.run_parts(graph.nodes(), graph.edges())
    }

    /// Lay out raw node and edge lists.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::DanglingEdge`] if an edge references a node not in `nodes`.
    pub fn run_parts(&self, nodes: &[GraphNode], edges: &[GraphEdge]) -> Result<Layout, LayoutError> {
        let index: HashMap<&str, usize> =
            nodes.iter().enumerate().map(|(i, n)| (n.id.as_str(), i)).collect();

        let mut springs = Vec::with_capacity(edges.len());
        for edge in edges {
            match (index.get(edge.source.as_str()), index.get(edge.target.as_str())) {
                (Some(&s), Some(&t)) => {
                    if s != t {
                        springs.push((s, t));
                    }
                }
                _ => {
                    return Err(LayoutError::DanglingEdge {
                        source_id: edge.source.clone(),
                        target_id: edge.target.clone(),
                    });
                }
            }
        }

        if nodes.is_empty() {
            return Ok(Layout::default());
        }

        let mut points = self.initial_positions(nodes.len());
        let radii: Vec<f64> = nodes.iter().map(|n| n.size / 2.0).collect();
        let mut temperature = self.config.initial_temperature;
        let mut iterations = 0;

        while iterations < self.config.max_iterations && temperature >= self.config.min_temperature {
            let forces = self.forces(&points, &radii, &springs);
            for (point, force) in points.iter_mut().zip(forces) {
                let length = force.length();
                if length.is_finite() && length > 0.0 {
                    *point += force * (length.min(temperature) / length);
                }
            }
            temperature *= self.config.cooling_factor;
            iterations += 1;
        }

        tracing::debug!(nodes = nodes.len(), edges = springs.len(), iterations, "Layout converged");

        Ok(self.fit(&points, &radii))
    }

    /// Nodes evenly spaced on a circle sized to the node count.
    fn initial_positions(&self, count: usize) -> Vec<Point2D<f64>> {
        if count == 1 {
            return vec![Point2D::origin()];
        }
        let radius = (self.config.ideal_edge_length * count as f64 / TAU).max(self.config.ideal_edge_length);
        (0..count)
            .map(|i| {
                let angle = TAU * i as f64 / count as f64;
                Point2D::new(radius * angle.cos(), radius * angle.sin())
            })
            .collect()
    }

    fn forces(&self, points: &[Point2D<f64>], radii: &[f64], springs: &[(usize, usize)]) -> Vec<Vector2D<f64>> {
        let n = points.len();
        let mut forces = vec![Vector2D::zero(); n];

        for i in 0..n {
            for j in (i + 1)..n {
                let delta = points[i] - points[j];
                let clearance = radii[i] + radii[j] + self.config.node_overlap;
                let distance = delta.length().max(1.0);
                let direction = unit_or_fallback(delta, i, j);

                let mut magnitude = self.config.node_repulsion / (distance * distance);
                if distance < clearance {
                    magnitude += clearance - distance;
                }
                forces[i] += direction * magnitude;
                forces[j] -= direction * magnitude;
            }
        }

        let stiffness = self.config.edge_elasticity / 1000.0;
        for &(s, t) in springs {
            let delta = points[t] - points[s];
            let distance = delta.length();
            if distance <= f64::EPSILON {
                continue;
            }
            let pull = delta / distance * (stiffness * (distance - self.config.ideal_edge_length));
            forces[s] += pull;
            forces[t] -= pull;
        }

        let centroid = points.iter().fold(Vector2D::zero(), |acc, p| acc + p.to_vector()) / n as f64;
        let gravity = self.config.gravity / 1000.0;
        for (force, point) in forces.iter_mut().zip(points) {
            *force += (centroid - point.to_vector()) * gravity;
        }

        forces
    }

    /// Translate so the outlines' bounding box starts at `padding`.
    fn fit(&self, points: &[Point2D<f64>], radii: &[f64]) -> Layout {
        let mut min = Point2D::new(f64::INFINITY, f64::INFINITY);
        let mut max = Point2D::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for (p, r) in points.iter().zip(radii) {
            min = min.min(Point2D::new(p.x - r, p.y - r));
            max = max.max(Point2D::new(p.x + r, p.y + r));
        }

        let pad = self.config.padding;
        let shift = Vector2D::new(pad - min.x, pad - min.y);
        let positions = points.iter().map(|p| Position::from(*p + shift)).collect();

        Layout {
            positions,
            width: max.x - min.x + 2.0 * pad,
            height: max.y - min.y + 2.0 * pad,
        }
    }
}

/// Unit vector along `delta`, or a fixed direction derived from the pair when
/// the two points coincide.
fn unit_or_fallback(delta: Vector2D<f64>, i: usize, j: usize) -> Vector2D<f64> {
    let length = delta.length();
    if length > f64::EPSILON {
        delta / length
    } else {
        let angle = TAU * ((i * 31 + j) % 360) as f64 / 360.0;
        Vector2D::new(angle.cos(), angle.sin())
    }
}
