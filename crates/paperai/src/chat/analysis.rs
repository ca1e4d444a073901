//! One-shot document analyses: summary, keywords, recommendations.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::provider::CompletionProvider;
use crate::config::api;
use crate::error::ChatError;
use crate::extract::truncate_chars;
use crate::models::{Role, WireMessage};

const PLAIN_TEXT_RULE: &str =
    "IMPORTANT: Do NOT use markdown formatting like asterisks (*) or bold (**) in your response. Use plain text only.";

/// Which analysis to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisKind {
    /// Structured summary.
    Summary,
    /// Keywords with explanations and categories.
    Keywords,
    /// Similar papers worth reading.
    Recommendations,
    /// Brief free-form analysis.
    Analysis,
}

impl AnalysisKind {
    /// Path segment / wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Keywords => "keywords",
            Self::Recommendations => "recommendations",
            Self::Analysis => "analysis",
        }
    }

    /// Messages for this analysis over `text`.
    #[must_use]
    pub fn messages(self, text: &str) -> Vec<WireMessage> {
        let user = |content: String| WireMessage { role: Role::User, content };
        match self {
            Self::Summary => vec![user(format!(
                "You are a scientific paper summarization expert. Please provide a comprehensive summary \
                 of the following research paper.\n\
                 Focus on:\n\
                 1. The main research question or objective\n\
                 2. Methodology used\n\
                 3. Key findings and results\n\
                 4. Conclusions and implications\n\
                 5. Limitations of the study\n\n\
                 Format the summary in clear paragraphs with appropriate headings.\n\n\
                 {PLAIN_TEXT_RULE}\n\n\
                 Paper Content: {text}"
            ))],
            Self::Keywords => vec![user(format!(
                "You are a keyword extraction expert for scientific papers. Please extract the most \
                 important keywords and key phrases from the following research paper.\n\n\
                 For each keyword or phrase:\n\
                 1. Provide a brief explanation of its significance in the context of the paper\n\
                 2. Categorize it (e.g., methodology, finding, concept, tool, etc.)\n\n\
                 Format your response as a list of keywords with their explanations and categories.\n\n\
                 {PLAIN_TEXT_RULE}\n\n\
                 Paper Content: {text}"
            ))],
            Self::Recommendations => vec![user(format!(
                "You are a research paper recommendation expert. Based on the following research paper, \
                 recommend 5-7 similar papers that would be valuable for further reading.\n\n\
                 For each recommended paper:\n\
                 1. Provide the title\n\
                 2. List the authors\n\
                 3. Include the publication year\n\
                 4. Provide a brief explanation of why this paper is relevant to the uploaded paper\n\
                 5. Include a link to where the paper can be found (if possible)\n\n\
                 Format your response as a list of papers with their details.\n\n\
                 {PLAIN_TEXT_RULE}\n\n\
                 Paper Content: {text}"
            ))],
            Self::Analysis => vec![
                WireMessage {
                    role: Role::System,
                    content: "You are an AI that summarizes and analyzes academic paper content.".to_string(),
                },
                user(format!("Please provide a brief analysis and summary of the following paper:\n\n{text}")),
            ],
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisKind {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "summary" => Ok(Self::Summary),
            "keywords" => Ok(Self::Keywords),
            "recommendations" => Ok(Self::Recommendations),
            "analysis" => Ok(Self::Analysis),
            other => Err(ChatError::Validation(format!(
                "unknown analysis '{other}', expected summary, keywords, recommendations or analysis"
            ))),
        }
    }
}

/// Runs analyses against a completion provider.
#[derive(Clone)]
pub struct Analyzer {
    provider: Arc<dyn CompletionProvider>,
    context_budget: usize,
}

impl Analyzer {
    /// Create an analyzer with the default text budget.
    #[must_use]
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider, context_budget: api::CONTEXT_CHAR_BUDGET }
    }

    /// Set the character budget for the analyzed text.
    #[must_use]
    pub const fn with_context_budget(mut self, budget: usize) -> Self {
        self.context_budget = budget;
        self
    }

    /// Run `kind` over `text` and return the answer with asterisks removed.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::Validation`] for blank text, otherwise any provider error.
    pub async fn run(&self, kind: AnalysisKind, text: &str) -> Result<String, ChatError> {
        if text.trim().is_empty() {
            return Err(ChatError::Validation("No document text provided".to_string()));
        }

        let text = truncate_chars(text, self.context_budget);
        tracing::debug!(%kind, chars = text.chars().count(), "Running document analysis");

        let answer = self.provider.complete(&kind.messages(text)).await?;
        Ok(strip_emphasis(&answer))
    }

    /// Structured summary.
    pub async fn summarize(&self, text: &str) -> Result<String, ChatError> {
        self.run(AnalysisKind::Summary, text).await
    }

    /// Keywords with explanations.
    pub async fn extract_keywords(&self, text: &str) -> Result<String, ChatError> {
        self.run(AnalysisKind::Keywords, text).await
    }

    /// Similar-paper recommendations.
    pub async fn recommend_similar(&self, text: &str) -> Result<String, ChatError> {
        self.run(AnalysisKind::Recommendations, text).await
    }

    /// Brief analysis.
    pub async fn analyze(&self, text: &str) -> Result<String, ChatError> {
        self.run(AnalysisKind::Analysis, text).await
    }
}

impl fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Analyzer")
            .field("model", &self.provider.model_name())
            .field("context_budget", &self.context_budget)
            .finish()
    }
}

/// Remove markdown emphasis markers.
#[must_use]
pub fn strip_emphasis(text: &str) -> String {
    text.replace('*', "")
}
