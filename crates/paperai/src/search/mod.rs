//! Search aggregation over the Semantic Scholar search endpoint.
//!
//! Ranking is delegated to the provider. Locally we validate the request,
//! translate sort/year options into provider parameters, and re-filter the
//! returned page by publication type.

mod feed;

pub use feed::{FeedTicket, ResultFeed};

use std::str::FromStr;
use std::sync::Arc;

use crate::client::SemanticScholarClient;
use crate::error::{ApiError, ApiResult};
use crate::models::{SearchParams, SearchResult};

/// Largest page the provider accepts.
pub const MAX_LIMIT: u32 = 100;

/// Result ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortBy {
    /// Provider relevance ranking.
    #[default]
    Relevance,
    /// Most cited first.
    Citations,
    /// Most recent first.
    Year,
}

impl SortBy {
    /// Provider `sort` parameter, `None` for relevance.
    #[must_use]
    pub const fn as_api_param(self) -> Option<&'static str> {
        match self {
            Self::Relevance => None,
            Self::Citations => Some("citationCount:desc"),
            Self::Year => Some("year:desc"),
        }
    }
}

impl FromStr for SortBy {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "relevance" => Ok(Self::Relevance),
            "citations" => Ok(Self::Citations),
            "year" => Ok(Self::Year),
            other => Err(ApiError::validation(
                "sortBy",
                format!("unknown sort key '{other}', expected relevance, citations or year"),
            )),
        }
    }
}

/// Publication type filter.
///
/// Only `Contains` filters. The other two differ in the reported total:
/// an explicit `all` keeps the provider total, an absent type reports the page length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DocumentType {
    /// No type parameter given.
    #[default]
    Unspecified,
    /// Explicit `all`.
    All,
    /// Keep papers with a publication type containing this lower-cased substring.
    Contains(String),
}

impl DocumentType {
    /// Parse a filter value; blank means unspecified, `all` means no filter.
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => Self::Unspecified,
            Some(v) if v.eq_ignore_ascii_case("all") => Self::All,
            Some(v) => Self::Contains(v.to_lowercase()),
        }
    }

    /// True when a filter is active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Contains(_))
    }
}

/// A validated search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Free-text query.
    pub query: String,
    /// Page size.
    pub limit: u32,
    /// Offset of the first result.
    pub offset: u32,
    /// Minimum publication year.
    pub year_min: Option<i32>,
    /// Maximum publication year.
    pub year_max: Option<i32>,
    /// Ordering.
    pub sort_by: SortBy,
    /// Type filter.
    pub doc_type: DocumentType,
}

impl SearchQuery {
    /// A relevance-ordered first page with default size.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            limit: 10,
            offset: 0,
            year_min: None,
            year_max: None,
            sort_by: SortBy::Relevance,
            doc_type: DocumentType::All,
        }
    }

    /// Provider `year` parameter (`2019-2021`, `2019-`, `-2021`).
    #[must_use]
    pub fn year_param(&self) -> Option<String> {
        match (self.year_min, self.year_max) {
            (None, None) => None,
            (Some(min), None) => Some(format!("{min}-")),
            (None, Some(max)) => Some(format!("-{max}")),
            (Some(min), Some(max)) => Some(format!("{min}-{max}")),
        }
    }

    /// Extra provider parameters beyond query/offset/limit/fields.
    #[must_use]
    pub fn provider_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(year) = self.year_param() {
            params.push(("year".to_string(), year));
        }
        if let Some(sort) = self.sort_by.as_api_param() {
            params.push(("sort".to_string(), sort.to_string()));
        }
        params
    }
}

impl TryFrom<SearchParams> for SearchQuery {
    type Error = ApiError;

    fn try_from(params: SearchParams) -> Result<Self, Self::Error> {
        let query = params.query.as_deref().map(str::trim).unwrap_or_default();
        if query.is_empty() {
            return Err(ApiError::validation("query", "Missing query parameter"));
        }
        if params.limit == 0 || params.limit > MAX_LIMIT {
            return Err(ApiError::validation("limit", format!("must be between 1 and {MAX_LIMIT}")));
        }
        if let (Some(min), Some(max)) = (params.year_min, params.year_max) {
            if min > max {
                return Err(ApiError::validation("yearMin", "must not be greater than yearMax"));
            }
        }

        let sort_by = params.sort_by.as_deref().map(SortBy::from_str).transpose()?.unwrap_or_default();

        Ok(Self {
            query: query.to_string(),
            limit: params.limit,
            offset: params.offset,
            year_min: params.year_min,
            year_max: params.year_max,
            sort_by,
            doc_type: DocumentType::parse(params.doc_type.as_deref()),
        })
    }
}

/// Apply the local type filter to a provider page.
///
/// Only an explicit `all` passes the provider's total through; otherwise the
/// reported `total` is the length of the returned page.
#[must_use]
pub fn aggregate(raw: SearchResult, query: &SearchQuery) -> SearchResult {
    let data: Vec<_> = match &query.doc_type {
        DocumentType::Contains(needle) => {
            raw.data.into_iter().filter(|p| p.has_publication_type(needle)).collect()
        }
        DocumentType::All | DocumentType::Unspecified => raw.data,
    };
    let total = match query.doc_type {
        DocumentType::All => raw.total,
        _ => i64::try_from(data.len()).unwrap_or(i64::MAX),
    };

    SearchResult { total, offset: query.offset, next: raw.next, data, message: None }
}

/// Search front-end combining the client and the local filter.
#[derive(Debug, Clone)]
pub struct SearchAggregator {
    client: Arc<SemanticScholarClient>,
}

impl SearchAggregator {
    /// Create an aggregator over a shared client.
    #[must_use]
    pub fn new(client: Arc<SemanticScholarClient>) -> Self {
        Self { client }
    }

    /// Run one search page.
    pub async fn search(&self, query: &SearchQuery) -> ApiResult<SearchResult> {
        tracing::debug!(
            query = %query.query,
            offset = query.offset,
            limit = query.limit,
            sort = ?query.sort_by,
            doc_type = ?query.doc_type,
            "Searching papers"
        );

        let raw = self
            .client
            .search_papers(&query.query, query.offset, query.limit, &query.provider_params())
            .await?;

        let fetched = raw.data.len();
        let page = aggregate(raw, query);
        tracing::debug!(fetched, kept = page.data.len(), total = page.total, "Search page ready");

        Ok(page)
    }

    /// Fetch one paper with its references.
    pub async fn paper(&self, paper_id: &str) -> ApiResult<crate::models::Paper> {
        let paper_id = paper_id.trim();
        if paper_id.is_empty() {
            return Err(ApiError::validation("paperId", "Missing paper ID"));
        }
        if paper_id == "." || paper_id == ".." {
            return Err(ApiError::validation("paperId", format!("'{paper_id}' is not a paper ID")));
        }
        Ok(self.client.get_paper(paper_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Paper;

    fn paper(id: &str, types: Option<&[&str]>) -> Paper {
        Paper {
            paper_id: id.to_string(),
            title: Some(format!("Paper {id}")),
            publication_types: types.map(|t| t.iter().map(|s| (*s).to_string()).collect()),
            ..Default::default()
        }
    }

    fn raw_page() -> SearchResult {
        SearchResult {
            total: 250,
            offset: 0,
            next: Some(10),
            data: vec![
                paper("a", Some(&["JournalArticle"])),
                paper("b", Some(&["Conference"])),
                paper("c", None),
                paper("d", Some(&["Review", "JournalArticle"])),
            ],
            message: None,
        }
    }

    #[test]
    fn test_type_filter_adjusts_total() {
        let mut query = SearchQuery::new("x");
        query.doc_type = DocumentType::parse(Some("Journal"));

        let page = aggregate(raw_page(), &query);
        let ids: Vec<_> = page.data.iter().map(|p| p.paper_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "d"]);
        assert_eq!(page.total, 2);
        assert_eq!(page.next, Some(10));
    }

    #[test]
    fn test_all_keeps_provider_total() {
        let query = SearchQuery::new("x");
        let page = aggregate(raw_page(), &query);
        assert_eq!(page.data.len(), 4);
        assert_eq!(page.total, 250);
    }

    #[test]
    fn test_absent_type_reports_page_length() {
        let mut query = SearchQuery::new("x");
        query.doc_type = DocumentType::parse(None);

        let page = aggregate(raw_page(), &query);
        assert_eq!(page.data.len(), 4);
        assert_eq!(page.total, 4);
        assert_eq!(page.next, Some(10));
    }

    #[test]
    fn test_large_offset_is_not_truncated() {
        let mut query = SearchQuery::new("x");
        query.offset = u32::MAX;
        assert_eq!(aggregate(raw_page(), &query).offset, u32::MAX);
    }

    #[test]
    fn test_sort_params() {
        assert_eq!(SortBy::Relevance.as_api_param(), None);
        assert_eq!(SortBy::Citations.as_api_param(), Some("citationCount:desc"));
        assert_eq!(SortBy::Year.as_api_param(), Some("year:desc"));
        assert!("popularity".parse::<SortBy>().is_err());
    }

    #[test]
    fn test_year_param_forms() {
        let mut query = SearchQuery::new("x");
        assert_eq!(query.year_param(), None);
        query.year_min = Some(2019);
        assert_eq!(query.year_param().as_deref(), Some("2019-"));
        query.year_max = Some(2021);
        assert_eq!(query.year_param().as_deref(), Some("2019-2021"));
        query.year_min = None;
        assert_eq!(query.year_param().as_deref(), Some("-2021"));
    }

    #[test]
    fn test_validation_rejects_before_network() {
        let blank = SearchParams { query: Some("   ".into()), limit: 10, ..Default::default() };
        assert!(matches!(SearchQuery::try_from(blank), Err(ApiError::Validation { .. })));

        let huge = SearchParams { query: Some("x".into()), limit: 500, ..Default::default() };
        assert!(SearchQuery::try_from(huge).is_err());

        let inverted = SearchParams {
            query: Some("x".into()),
            limit: 10,
            year_min: Some(2022),
            year_max: Some(2020),
            ..Default::default()
        };
        assert!(SearchQuery::try_from(inverted).is_err());
    }

    #[test]
    fn test_document_type_parse() {
        assert_eq!(DocumentType::parse(None), DocumentType::Unspecified);
        assert_eq!(DocumentType::parse(Some("  ")), DocumentType::Unspecified);
        assert_eq!(DocumentType::parse(Some("ALL")), DocumentType::All);
        assert_eq!(DocumentType::parse(Some("Review")), DocumentType::Contains("review".into()));
    }
}
