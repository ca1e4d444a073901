//! Error types for the PaperAI service.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.
//! [`ApiError`] is the single type handlers return; it maps every failure onto an
//! HTTP status and a `{error, details}` JSON body.

use std::time::Duration;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Errors from the Semantic Scholar HTTP client layer.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// HTTP transport error (connection, DNS, TLS, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Rate limited by Semantic Scholar API (429 response)
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited {
        /// Suggested wait time before retry
        retry_after: Duration,
    },

    /// Resource not found (404 response)
    #[error("Resource not found: {resource}")]
    NotFound {
        /// Description of the missing resource
        resource: String,
    },

    /// Invalid request parameters (400 response)
    #[error("Bad request: {message}")]
    BadRequest {
        /// Error message from API
        message: String,
    },

    /// JSON parsing error
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Server error (5xx response)
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Malformed request URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Unexpected HTTP status
    #[error("Unexpected status {status}: {message}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Response body or message
        message: String,
    },
}

impl ClientError {
    /// Create a rate limited error with retry-after duration.
    #[must_use]
    pub fn rate_limited(seconds: u64) -> Self {
        Self::RateLimited { retry_after: Duration::from_secs(seconds) }
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound { resource: resource.into() }
    }

    /// Create a bad request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest { message: message.into() }
    }

    /// Create a server error.
    #[must_use]
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server { status, message: message.into() }
    }

    /// Returns true for an upstream 429.
    #[must_use]
    pub const fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }

    /// Get the retry-after duration if this is a rate limit error.
    #[must_use]
    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after } => Some(*retry_after),
            _ => None,
        }
    }
}

/// Errors from the force-directed layout.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum LayoutError {
    /// An edge references a node that is not in the graph.
    #[error("edge {source_id} -> {target_id} references a missing node")]
    DanglingEdge {
        /// Edge source id
        source_id: String,
        /// Edge target id
        target_id: String,
    },
}

/// Errors from document text extraction.
#[derive(thiserror::Error, Debug)]
pub enum ExtractError {
    /// The PDF could not be parsed.
    #[error("Failed to parse PDF: {0}")]
    Pdf(#[from] lopdf::Error),

    /// The document parsed but yielded no text.
    #[error("No text content could be extracted")]
    NoText,
}

/// Errors from the document store.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// Upload had no bytes.
    #[error("No file uploaded")]
    Empty,

    /// Upload exceeds the configured limit.
    #[error("File size {size} exceeds the {limit} byte limit")]
    TooLarge {
        /// Upload size in bytes
        size: usize,
        /// Configured limit in bytes
        limit: usize,
    },

    /// MIME type is neither PDF nor text.
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    /// Text extraction failed.
    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// The extraction task panicked or was cancelled.
    #[error("Extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Errors from the chat completion provider.
#[derive(thiserror::Error, Debug)]
pub enum ChatError {
    /// HTTP transport error.
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider rejected the request with a 429.
    #[error("Chat provider rate limited the request")]
    RateLimited {
        /// Provider-supplied explanation, if any
        detail: Option<String>,
    },

    /// The provider answered with a non-success status.
    #[error("Chat provider error ({status})")]
    Provider {
        /// HTTP status code
        status: u16,
        /// Provider-supplied explanation, if any
        detail: Option<String>,
    },

    /// The response body was not valid JSON.
    #[error("Invalid chat response: {0}")]
    Parse(#[from] serde_json::Error),

    /// No chat API key is configured on the server.
    #[error("Chat API key is not configured")]
    MissingApiKey,

    /// Input rejected before any network call.
    #[error("{0}")]
    Validation(String),
}

impl ChatError {
    /// Provider-supplied error detail, when the provider sent one.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::RateLimited { detail } | Self::Provider { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

/// Errors surfaced by HTTP handlers.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    /// Error from the Semantic Scholar client
    #[error("API error: {0}")]
    Client(#[from] ClientError),

    /// Input validation failed
    #[error("Validation error: {message}")]
    Validation {
        /// Field that failed validation
        field: String,
        /// Validation error message
        message: String,
    },

    /// Requested record does not exist
    #[error("{0} not found")]
    NotFound(String),

    /// Upload rejected by the store
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Layout failure
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// Chat provider failure
    #[error(transparent)]
    Chat(#[from] ChatError),

    /// Internal logic error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Short user-facing message.
    pub error: String,
    /// Longer explanation or upstream detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation { field: field.into(), message: message.into() }
    }

    /// Create an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true if this error came from an upstream 429.
    #[must_use]
    pub const fn is_rate_limited(&self) -> bool {
        matches!(
            self,
            Self::Client(ClientError::RateLimited { .. }) | Self::Chat(ChatError::RateLimited { .. })
        )
    }

    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Client(ClientError::RateLimited { .. }) | Self::Chat(ChatError::RateLimited { .. }) => {
                StatusCode::TOO_MANY_REQUESTS
            }
            Self::Client(ClientError::NotFound { .. }) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Client(ClientError::BadRequest { .. })
            | Self::Validation { .. }
            | Self::Store(StoreError::Empty)
            | Self::Chat(ChatError::Validation(_)) => StatusCode::BAD_REQUEST,
            Self::Store(StoreError::TooLarge { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Store(StoreError::UnsupportedType(_)) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::Store(StoreError::Extract(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Build the user-facing `{error, details}` body.
    #[must_use]
    pub fn to_body(&self) -> ErrorBody {
        match self {
            Self::Client(ClientError::RateLimited { retry_after }) => ErrorBody {
                error: "Rate limit exceeded. Please try again in a few minutes.".to_string(),
                details: Some(format!(
                    "Semantic Scholar API allows 100 requests per 5 minutes without an API key. \
                     Suggested wait: {}s.",
                    retry_after.as_secs()
                )),
            },
            Self::Client(ClientError::NotFound { resource }) => ErrorBody {
                error: "Paper not found".to_string(),
                details: Some(resource.clone()).filter(|r| !r.is_empty()),
            },
            Self::Client(err) => ErrorBody {
                error: "Failed to fetch data from Semantic Scholar".to_string(),
                details: Some(err.to_string()),
            },
            Self::Validation { field, message } => ErrorBody {
                error: format!("Invalid input for '{field}'"),
                details: Some(message.clone()),
            },
            Self::Chat(ChatError::RateLimited { detail }) => ErrorBody {
                error: "The chat provider is rate limiting requests. Please wait and retry.".to_string(),
                details: detail.clone(),
            },
            Self::Chat(err) => ErrorBody {
                error: "Failed to get a response from the chat provider".to_string(),
                details: err.detail().map(str::to_string).or_else(|| Some(err.to_string())),
            },
            other => ErrorBody { error: other.to_string(), details: None },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }
        (status, Json(self.to_body())).into_response()
    }
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Result type alias for handler operations.
pub type ApiResult<T> = Result<T, ApiError>;
