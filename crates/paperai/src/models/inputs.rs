//! Request bodies and query strings accepted by the HTTP endpoints.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AuthorStats, ChatMessage, Connection, PaperRecord, TopicStats};

/// Query string of `GET /api/semantic/search`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    /// Free-text query.
    #[serde(default)]
    pub query: Option<String>,

    /// Page size.
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Offset of the first result.
    #[serde(default)]
    pub offset: u32,

    /// Minimum publication year (inclusive).
    #[serde(default)]
    pub year_min: Option<i32>,

    /// Maximum publication year (inclusive).
    #[serde(default)]
    pub year_max: Option<i32>,

    /// `relevance`, `citations` or `year`.
    #[serde(default)]
    pub sort_by: Option<String>,

    /// Publication type substring, or `all`.
    #[serde(default, rename = "type")]
    pub doc_type: Option<String>,
}

fn default_limit() -> u32 {
    10
}

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// Transcript so far.
    #[serde(default)]
    pub messages: Vec<ChatMessage>,

    /// The new question.
    pub question: String,

    /// Stored files to use as context. Empty means every stored file.
    #[serde(default)]
    pub file_ids: Vec<Uuid>,
}

/// Body of `POST /api/analysis/{kind}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    /// Stored file to analyze.
    #[serde(default)]
    pub file_id: Option<Uuid>,

    /// Raw text to analyze, used when no file id is given.
    #[serde(default)]
    pub text: Option<String>,
}

/// Body of `POST /api/graph/connected`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectedGraphRequest {
    /// Papers to plot.
    #[serde(default)]
    pub papers: Vec<PaperRecord>,

    /// Links between them.
    #[serde(default)]
    pub connections: Vec<Connection>,
}

/// Body of `POST /api/graph/knowledge`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnowledgeGraphRequest {
    /// Papers to plot.
    #[serde(default)]
    pub papers: Vec<PaperRecord>,

    /// Author citation totals, used for author node sizing.
    #[serde(default)]
    pub authors: Vec<AuthorStats>,

    /// Topics matched against titles.
    #[serde(default)]
    pub topics: Vec<TopicStats>,
}

/// Body of `POST /api/graph/trend`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrendRequest {
    /// Papers to aggregate.
    #[serde(default)]
    pub papers: Vec<PaperRecord>,
}
