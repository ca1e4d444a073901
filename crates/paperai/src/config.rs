//! Configuration for the PaperAI service.

use std::time::Duration;

/// API configuration constants.
pub mod api {
    use std::time::Duration;

    /// Graph API endpoint.
    pub const GRAPH_API: &str = "https://api.semanticscholar.org/graph/v1";

    /// OpenAI-compatible chat completion base URL.
    pub const CHAT_API: &str = "https://api.x.ai";

    /// Default chat model.
    pub const CHAT_MODEL: &str = "grok-1.5";

    /// Request timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Cache TTL (5 minutes).
    pub const CACHE_TTL: Duration = Duration::from_secs(300);

    /// Maximum cache size.
    pub const CACHE_MAX_SIZE: u64 = 1000;

    /// Maximum keepalive connections.
    pub const MAX_KEEPALIVE: usize = 10;

    /// Keepalive expiry.
    pub const KEEPALIVE_EXPIRY: Duration = Duration::from_secs(30);

    /// Largest accepted upload (100 MiB).
    pub const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

    /// Characters of document text forwarded to the chat model.
    pub const CONTEXT_CHAR_BUDGET: usize = 30_000;

    /// Default HTTP port.
    pub const DEFAULT_PORT: u16 = 5002;
}

/// Paper field sets for API requests.
pub mod fields {
    /// Fields requested for search results.
    pub const SEARCH: &[&str] = &[
        "paperId",
        "title",
        "abstract",
        "authors",
        "year",
        "url",
        "venue",
        "citationCount",
        "isOpenAccess",
        "openAccessPdf",
        "publicationTypes",
    ];

    /// Fields requested for the paper detail view.
    pub const DETAIL: &[&str] = &[
        "paperId",
        "title",
        "abstract",
        "authors",
        "year",
        "url",
        "venue",
        "citationCount",
        "isOpenAccess",
        "openAccessPdf",
        "references",
    ];
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Semantic Scholar API key (optional).
    pub api_key: Option<String>,

    /// Base URL for Graph API (overridable for mock servers).
    pub graph_api_url: String,

    /// Chat completion API key. Never leaves the server.
    pub chat_api_key: Option<String>,

    /// Chat completion base URL.
    pub chat_api_url: String,

    /// Chat model name.
    pub chat_model: String,

    /// Request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Cache TTL.
    pub cache_ttl: Duration,

    /// Maximum cache size.
    pub cache_max_size: u64,

    /// Largest accepted upload in bytes.
    pub max_upload_bytes: usize,

    /// Character budget for document text in chat context.
    pub context_char_budget: usize,
}

impl Config {
    /// Create a new configuration with optional API keys.
    #[must_use]
    pub fn new(api_key: Option<String>, chat_api_key: Option<String>) -> Self {
        Self {
            api_key,
            graph_api_url: api::GRAPH_API.to_string(),
            chat_api_key,
            chat_api_url: api::CHAT_API.to_string(),
            chat_model: api::CHAT_MODEL.to_string(),
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            cache_ttl: api::CACHE_TTL,
            cache_max_size: api::CACHE_MAX_SIZE,
            max_upload_bytes: api::MAX_UPLOAD_BYTES,
            context_char_budget: api::CONTEXT_CHAR_BUDGET,
        }
    }

    /// Create a test configuration with every upstream pointed at a mock server.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            api_key: None,
            graph_api_url: format!("{}/graph/v1", base_url),
            chat_api_key: Some("test-chat-key".to_string()),
            chat_api_url: base_url.to_string(),
            chat_model: "test-model".to_string(),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            cache_ttl: Duration::from_secs(0), // No caching in tests
            cache_max_size: 0,
            max_upload_bytes: api::MAX_UPLOAD_BYTES,
            context_char_budget: api::CONTEXT_CHAR_BUDGET,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Reads `SEMANTIC_SCHOLAR_API_KEY`, `CHAT_API_KEY`, `CHAT_API_URL` and
    /// `CHAT_MODEL`. URLs are validated.
    pub fn from_env() -> anyhow::Result<Self> {
        let api_key = non_empty_var("SEMANTIC_SCHOLAR_API_KEY");
        let chat_api_key = non_empty_var("CHAT_API_KEY");

        let mut config = Self::new(api_key, chat_api_key);

        if let Some(url) = non_empty_var("CHAT_API_URL") {
            url::Url::parse(&url)?;
            config.chat_api_url = url.trim_end_matches('/').to_string();
        }
        if let Some(model) = non_empty_var("CHAT_MODEL") {
            config.chat_model = model;
        }

        Ok(config)
    }

    /// Check if a Semantic Scholar API key is configured.
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Check if a chat API key is configured.
    #[must_use]
    pub const fn has_chat_key(&self) -> bool {
        self.chat_api_key.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(None, None)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
