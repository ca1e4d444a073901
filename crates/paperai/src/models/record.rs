//! Paper records and relations that feed the graph views.

use serde::{Deserialize, Deserializer, Serialize};

use super::Paper;

/// `null` reads as the type's default, the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Any integer (or `null`) clamped into `0..=u32::MAX`.
fn clamped_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<i64>::deserialize(deserializer)?.unwrap_or(0);
    Ok(u32::try_from(raw.max(0)).unwrap_or(u32::MAX))
}

/// Author list with `null` entries dropped.
fn author_names<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let names = Option::<Vec<Option<String>>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(names.into_iter().flatten().collect())
}

/// A paper as the visualizations see it.
///
/// Deserialization is lenient: a missing or `null` id or title becomes an empty
/// string and counts clamp to `u32`, so a single bad entry can be skipped
/// instead of rejecting the whole list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperRecord {
    /// Unique paper identifier.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,

    /// Paper title.
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    /// Author names, in publication order.
    #[serde(default, deserialize_with = "author_names")]
    pub authors: Vec<String>,

    /// Publication year.
    #[serde(default, deserialize_with = "null_as_default")]
    pub year: i32,

    /// Citation count.
    #[serde(default, deserialize_with = "clamped_count")]
    pub citations: u32,

    /// Abstract text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#abstract: Option<String>,
}

impl PaperRecord {
    /// A record is usable only if it has a non-blank id and title.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        !self.id.trim().is_empty() && !self.title.trim().is_empty()
    }
}

impl From<&Paper> for PaperRecord {
    fn from(paper: &Paper) -> Self {
        Self {
            id: paper.paper_id.clone(),
            title: paper.title.clone().unwrap_or_default(),
            authors: paper.authors.iter().filter_map(|a| a.name.clone()).collect(),
            year: paper.year.unwrap_or(0),
            citations: u32::try_from(paper.citations()).unwrap_or(0),
            r#abstract: paper.r#abstract.clone(),
        }
    }
}

/// A weighted link between two papers.
///
/// The weight is caller-supplied (similarity or citation strength) and is not
/// validated. Duplicate connections are kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    /// Source paper id.
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: String,

    /// Target paper id.
    #[serde(default, deserialize_with = "null_as_default")]
    pub target: String,

    /// Link strength.
    #[serde(default, deserialize_with = "null_as_default")]
    pub weight: f64,
}

impl Connection {
    /// Create a connection.
    #[must_use]
    pub fn new(source: impl Into<String>, target: impl Into<String>, weight: f64) -> Self {
        Self { source: source.into(), target: target.into(), weight }
    }
}

/// Citation total for one author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorStats {
    /// Author name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    /// Citation total.
    #[serde(default, deserialize_with = "clamped_count")]
    pub citations: u32,
}

/// Paper count for one research topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicStats {
    /// Topic name, matched against paper titles.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    /// Number of papers on this topic.
    #[serde(default, deserialize_with = "clamped_count")]
    pub count: u32,
}

impl TopicStats {
    /// Create a topic with a zero count.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into(), count: 0 }
    }
}

/// Citations per year, as parallel arrays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationTrend {
    /// Years, ascending.
    pub years: Vec<i32>,

    /// Counts for each year.
    pub counts: Vec<u64>,
}

impl CitationTrend {
    /// Sum citation counts by publication year over well-formed papers.
    #[must_use]
    pub fn from_papers(papers: &[PaperRecord]) -> Self {
        let mut by_year = std::collections::BTreeMap::<i32, u64>::new();
        for paper in papers.iter().filter(|p| p.is_well_formed() && p.year > 0) {
            *by_year.entry(paper.year).or_default() += u64::from(paper.citations);
        }

        let (years, counts) = by_year.into_iter().unzip();
        Self { years, counts }
    }
}
