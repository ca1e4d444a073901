//! Graph construction for the "connected papers" and "knowledge graph" views.
//!
//! Both builders materialize every node before any edge, so edges can only
//! reference nodes that exist. Malformed papers are skipped, never fatal.

use std::collections::{HashMap, HashSet};

use super::style::node_size;
use super::{Graph, GraphEdge, GraphNode, NodeCategory};
use crate::models::{AuthorStats, Connection, PaperRecord, TopicStats};

/// Whitespace-collapsed name: the key authors and topics are deduplicated on.
#[must_use]
pub fn normalize_key(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Id segment for a name: `%` and `-` are percent-escaped, then spaces become `-`.
///
/// Injective over normalized names, so "Jean-Pierre" and "Jean Pierre" stay apart.
fn id_segment(name: &str) -> String {
    normalize_key(name).replace('%', "%25").replace('-', "%2D").replace(' ', "-")
}

/// Knowledge-graph node id for a paper.
#[must_use]
pub fn paper_node_id(paper_id: &str) -> String {
    format!("p-{paper_id}")
}

/// Knowledge-graph node id for an author.
#[must_use]
pub fn author_node_id(name: &str) -> String {
    format!("a-{}", id_segment(name))
}

/// Knowledge-graph node id for a topic.
#[must_use]
pub fn topic_node_id(name: &str) -> String {
    format!("t-{}", id_segment(name))
}

fn well_formed(papers: &[PaperRecord]) -> impl Iterator<Item = &PaperRecord> {
    papers.iter().filter(|paper| {
        let ok = paper.is_well_formed();
        if !ok {
            tracing::debug!(id = %paper.id, "Skipping malformed paper");
        }
        ok
    })
}

fn paper_node(paper: &PaperRecord, id: String) -> GraphNode {
    GraphNode {
        id,
        label: paper.title.clone(),
        category: NodeCategory::Paper,
        size: node_size(paper.citations),
        year: Some(paper.year),
        citations: Some(paper.citations),
    }
}

/// One node per paper, one edge per connection between known papers.
///
/// Paper ids are used verbatim as node ids. Connection weights are kept on the
/// edge for stroke thickness.
#[must_use]
pub fn build_connected_papers(papers: &[PaperRecord], connections: &[Connection]) -> Graph {
    let mut graph = Graph::new();

    for paper in well_formed(papers) {
        graph.add_node(paper_node(paper, paper.id.clone()));
    }

    for conn in connections {
        let added = graph.add_edge(GraphEdge {
            source: conn.source.clone(),
            target: conn.target.clone(),
            weight: Some(conn.weight),
        });
        if !added {
            tracing::debug!(source = %conn.source, target = %conn.target, "Skipping connection to unknown paper");
        }
    }

    graph
}

/// Papers, their authors and matching topics.
///
/// Authors are deduplicated by [`normalize_key`] and linked author → paper.
/// A topic links to a paper iff the lower-cased title contains the lower-cased
/// topic name. `authors` only supplies citation totals for author node sizing.
#[must_use]
pub fn build_knowledge_graph(
    papers: &[PaperRecord],
    authors: &[AuthorStats],
    topics: &[TopicStats],
) -> Graph {
    let mut graph = Graph::new();
    let papers: Vec<&PaperRecord> = well_formed(papers).collect();

    let author_citations: HashMap<String, u32> =
        authors.iter().map(|a| (normalize_key(&a.name), a.citations)).collect();

    for paper in &papers {
        graph.add_node(paper_node(paper, paper_node_id(&paper.id)));
    }

    for paper in &papers {
        for name in paper.authors.iter().filter(|n| !n.trim().is_empty()) {
            let citations = author_citations.get(&normalize_key(name)).copied();
            graph.add_node(GraphNode {
                id: author_node_id(name),
                label: normalize_key(name),
                category: NodeCategory::Author,
                size: node_size(citations.unwrap_or(0)),
                year: None,
                citations,
            });
        }
    }

    let mut topic_names: Vec<(String, String)> = Vec::new();
    for topic in topics {
        if topic.name.trim().is_empty() {
            tracing::debug!("Skipping blank topic");
            continue;
        }
        let id = topic_node_id(&topic.name);
        let added = graph.add_node(GraphNode {
            id: id.clone(),
            label: topic.name.clone(),
            category: NodeCategory::Topic,
            size: node_size(0),
            year: None,
            citations: None,
        });
        if added {
            topic_names.push((id, topic.name.to_lowercase()));
        }
    }

    for paper in &papers {
        let target = paper_node_id(&paper.id);
        let mut seen = HashSet::new();
        for name in paper.authors.iter().filter(|n| !n.trim().is_empty()) {
            let source = author_node_id(name);
            if seen.insert(source.clone()) {
                graph.add_edge(GraphEdge { source, target: target.clone(), weight: None });
            }
        }
    }

    for (topic_id, needle) in &topic_names {
        for paper in &papers {
            if paper.title.to_lowercase().contains(needle.as_str()) {
                graph.add_edge(GraphEdge {
                    source: topic_id.clone(),
                    target: paper_node_id(&paper.id),
                    weight: None,
                });
            }
        }
    }

    graph
}
