//! Compact JSON output.

use serde_json::{Value, json};

use crate::models::{Paper, SearchResult};

/// Compact paper representation: only the fields a reader needs.
#[must_use]
pub fn compact_paper(paper: &Paper) -> Value {
    let mut obj = json!({
        "id": paper.paper_id,
        "title": paper.title_or_default(),
        "year": paper.year,
        "citations": paper.citations(),
    });

    if !paper.authors.is_empty() {
        obj["authors"] =
            json!(paper.authors.iter().filter_map(|a| a.name.as_ref()).collect::<Vec<_>>());
    }

    if let Some(venue) = paper.venue.as_deref().filter(|v| !v.is_empty()) {
        obj["venue"] = json!(venue);
    }

    if let Some(types) = paper.publication_types.as_ref().filter(|t| !t.is_empty()) {
        obj["types"] = json!(types);
    }

    if let Some(pdf) = paper.pdf_url() {
        obj["pdf"] = json!(pdf);
    }

    obj
}

/// Compact representation of a search page.
#[must_use]
pub fn compact_search(page: &SearchResult) -> Value {
    json!({
        "total": page.total,
        "offset": page.offset,
        "next": page.next,
        "papers": page.data.iter().map(compact_paper).collect::<Vec<_>>(),
    })
}
