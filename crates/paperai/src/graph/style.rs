//! Visual channels derived from node data.

use serde::{Deserialize, Serialize};

use super::{GraphNode, NodeCategory};

/// Smallest node diameter in pixels.
pub const MIN_NODE_SIZE: f64 = 30.0;

/// Largest node diameter in pixels.
pub const MAX_NODE_SIZE: f64 = 80.0;

/// Darkest lightness of the citation-trend gradient.
pub const MIN_TREND_LIGHTNESS: i64 = 30;

/// Edge stroke color.
pub const EDGE_COLOR: &str = "#cbd5e0";

/// Edge opacity.
pub const EDGE_OPACITY: f64 = 0.6;

/// Node outline shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeShape {
    /// Papers.
    Ellipse,
    /// Authors.
    Diamond,
    /// Topics.
    Hexagon,
}

impl From<NodeCategory> for NodeShape {
    fn from(category: NodeCategory) -> Self {
        match category {
            NodeCategory::Paper => Self::Ellipse,
            NodeCategory::Author => Self::Diamond,
            NodeCategory::Topic => Self::Hexagon,
        }
    }
}

/// How node fill colors are chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColorScheme {
    /// Fixed palette per category.
    #[default]
    Category,
    /// Blue gradient by publication year; older papers are darker.
    CitationTrend,
}

impl ColorScheme {
    /// Fill color for a node.
    ///
    /// Under [`ColorScheme::CitationTrend`], nodes without a year fall back to
    /// the category palette.
    #[must_use]
    pub fn fill(self, node: &GraphNode) -> String {
        match (self, node.year) {
            (Self::CitationTrend, Some(year)) => trend_color(year),
            _ => category_color(node.category).to_string(),
        }
    }
}

/// Palette color for a category.
#[must_use]
pub const fn category_color(category: NodeCategory) -> &'static str {
    match category {
        NodeCategory::Paper => "#4299e1",
        NodeCategory::Author => "#48bb78",
        NodeCategory::Topic => "#ed64a6",
    }
}

/// Node diameter for a citation count: `citations / 10` clamped to [30, 80].
#[must_use]
pub fn node_size(citations: u32) -> f64 {
    (f64::from(citations) / 10.0).clamp(MIN_NODE_SIZE, MAX_NODE_SIZE)
}

/// Lightness percentage for a publication year.
///
/// `80 - (year - 2010) * 5`, floored at 30 and capped at 100.
#[must_use]
pub fn trend_lightness(year: i32) -> i64 {
    (80 - (i64::from(year) - 2010) * 5).clamp(MIN_TREND_LIGHTNESS, 100)
}

/// CSS color for a publication year on the citation-trend gradient.
#[must_use]
pub fn trend_color(year: i32) -> String {
    format!("hsl(200, 80%, {}%)", trend_lightness(year))
}

/// Stroke width for an edge weight; unweighted edges are 1px.
#[must_use]
pub fn edge_width(weight: Option<f64>) -> f64 {
    match weight {
        Some(w) if w.is_finite() => (1.0 + w * 2.0).clamp(1.0, 5.0),
        _ => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_size_clamped() {
        assert!((node_size(0) - 30.0).abs() < f64::EPSILON);
        assert!((node_size(450) - 45.0).abs() < f64::EPSILON);
        assert!((node_size(2072) - 80.0).abs() < f64::EPSILON);
        assert!((node_size(u32::MAX) - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_trend_lightness() {
        assert_eq!(trend_lightness(2010), 80);
        assert_eq!(trend_lightness(2014), 60);
        assert_eq!(trend_lightness(2030), 30);
        assert_eq!(trend_lightness(1990), 100);
        assert_eq!(trend_color(2012), "hsl(200, 80%, 70%)");
    }

    #[test]
    fn test_fill_by_scheme() {
        let node = GraphNode {
            id: "1".into(),
            label: "x".into(),
            category: NodeCategory::Paper,
            size: 30.0,
            year: Some(2016),
            citations: Some(0),
        };
        assert_eq!(ColorScheme::Category.fill(&node), "#4299e1");
        assert_eq!(ColorScheme::CitationTrend.fill(&node), "hsl(200, 80%, 50%)");

        let author = GraphNode { category: NodeCategory::Author, year: None, ..node };
        assert_eq!(ColorScheme::CitationTrend.fill(&author), "#48bb78");
        assert_eq!(NodeShape::from(NodeCategory::Topic), NodeShape::Hexagon);
    }

    #[test]
    fn test_edge_width() {
        assert!((edge_width(None) - 1.0).abs() < f64::EPSILON);
        assert!((edge_width(Some(0.5)) - 2.0).abs() < f64::EPSILON);
        assert!((edge_width(Some(f64::NAN)) - 1.0).abs() < f64::EPSILON);
        assert!((edge_width(Some(100.0)) - 5.0).abs() < f64::EPSILON);
    }
}
