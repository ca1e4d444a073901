//! Markdown output formatting.

use std::borrow::Cow;

use crate::graph::PaperDetail;
use crate::models::{Paper, SearchResult};

/// Characters of abstract shown in list views.
const ABSTRACT_PREVIEW: usize = 300;

/// Format a search page as Markdown.
#[must_use]
pub fn format_search_markdown(page: &SearchResult) -> String {
    if page.data.is_empty() {
        return "No papers found.".to_string();
    }

    let mut output = format!("# Papers ({} of {} results)\n\n", page.data.len(), page.total);

    for (i, paper) in page.data.iter().enumerate() {
        output.push_str(&format_paper_markdown(paper, i + 1));
        output.push_str("\n---\n\n");
    }

    output
}

/// Format a single provider paper as Markdown.
#[must_use]
pub fn format_paper_markdown(paper: &Paper, index: usize) -> String {
    let mut output = String::new();

    output.push_str(&format!("## {}. {}\n\n", index, paper.title_or_default()));

    if !paper.authors.is_empty() {
        output.push_str(&format!("**Authors**: {}\n\n", paper.author_names()));
    }

    let mut meta = Vec::new();
    if let Some(year) = paper.year {
        meta.push(format!("**Year**: {year}"));
    }
    meta.push(format!("**Citations**: {}", paper.citations()));
    if let Some(venue) = paper.venue.as_deref().filter(|v| !v.is_empty()) {
        meta.push(format!("**Venue**: {venue}"));
    }
    output.push_str(&format!("{}\n\n", meta.join(" | ")));

    if let Some(types) = paper.publication_types.as_ref().filter(|t| !t.is_empty()) {
        output.push_str(&format!("**Type**: {}\n\n", types.join(", ")));
    }

    let mut links = vec![format!("[S2](https://www.semanticscholar.org/paper/{})", paper.paper_id)];
    if let Some(pdf_url) = paper.pdf_url() {
        links.push(format!("[PDF]({pdf_url})"));
    }
    output.push_str(&format!("**Links**: {}\n\n", links.join(" | ")));

    if let Some(abs) = &paper.r#abstract {
        output.push_str(&format!("**Abstract**: {}\n", preview(abs)));
    }

    output
}

/// Side-panel text for a selected graph node.
#[must_use]
pub fn format_paper_detail(detail: &PaperDetail) -> String {
    let mut output = format!("### {}\n\n", detail.title);

    if detail.authors.is_empty() {
        output.push_str(&format!("{}\n\n", detail.year));
    } else {
        output.push_str(&format!("{} • {}\n\n", detail.authors.join(", "), detail.year));
    }

    if let Some(abs) = detail.r#abstract.as_deref().filter(|a| !a.trim().is_empty()) {
        output.push_str(&format!("#### Abstract\n\n{abs}\n\n"));
    }

    output.push_str(&format!("**Citations**: {}\n", detail.citations));
    output
}

fn preview(text: &str) -> Cow<'_, str> {
    match text.char_indices().nth(ABSTRACT_PREVIEW) {
        Some((end, _)) => Cow::Owned(format!("{}...", &text[..end])),
        None => Cow::Borrowed(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AuthorRef;

    #[test]
    fn test_format_paper_markdown() {
        let paper = Paper {
            paper_id: "abc123".to_string(),
            title: Some("Science mapping software tools".to_string()),
            year: Some(2011),
            citation_count: Some(2072),
            authors: vec![AuthorRef { author_id: None, name: Some("M. J. Cobo".to_string()) }],
            publication_types: Some(vec!["JournalArticle".to_string()]),
            r#abstract: Some("é".repeat(400)),
            ..Default::default()
        };

        let md = format_paper_markdown(&paper, 1);
        assert!(md.starts_with("## 1. Science mapping software tools"));
        assert!(md.contains("**Citations**: 2072"));
        assert!(md.contains("**Type**: JournalArticle"));
        assert!(md.contains("semanticscholar.org/paper/abc123"));
        assert!(md.contains("..."));
    }

    #[test]
    fn test_empty_page() {
        assert_eq!(format_search_markdown(&SearchResult::default()), "No papers found.");
    }

    #[test]
    fn test_format_paper_detail() {
        let detail = PaperDetail {
            id: "2".into(),
            title: "SciMAT".into(),
            authors: vec!["M. J. Cobo".into(), "F. Herrera".into()],
            year: 2012,
            citations: 450,
            r#abstract: None,
        };

        let md = format_paper_detail(&detail);
        assert!(md.starts_with("### SciMAT"));
        assert!(md.contains("M. J. Cobo, F. Herrera • 2012"));
        assert!(!md.contains("Abstract"));
        assert!(md.ends_with("**Citations**: 450\n"));
    }
}
