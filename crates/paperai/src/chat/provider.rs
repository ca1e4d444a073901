//! Completion providers.

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::config::Config;
use crate::error::ChatError;
use crate::models::WireMessage;

/// Answer used when the provider returns no message content.
pub const EMPTY_COMPLETION: &str = "No response from the model.";

/// A chat completion backend.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Send the full message list and return the answer text.
    async fn complete(&self, messages: &[WireMessage]) -> Result<String, ChatError>;

    /// Model name used for requests.
    fn model_name(&self) -> &str;
}

/// Provider speaking the OpenAI-compatible `/v1/chat/completions` protocol.
///
/// The API key stays on the server; clients only ever talk to our own
/// endpoints.
#[derive(Clone)]
pub struct OpenAiCompatProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl OpenAiCompatProvider {
    /// Create a provider from configuration.
    ///
    /// A missing key is not an error here; requests fail with
    /// [`ChatError::MissingApiKey`] instead.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.chat_api_url.trim_end_matches('/').to_string(),
            api_key: config.chat_api_key.clone(),
            model: config.chat_model.clone(),
        })
    }

    fn parse_response(body: &Value) -> String {
        body.get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map_or_else(|| EMPTY_COMPLETION.to_string(), str::to_string)
    }

    /// Pull a human-readable detail out of an error body.
    fn error_detail(body: &str) -> Option<String> {
        let detail = match serde_json::from_str::<Value>(body) {
            Ok(v) => match v.get("error") {
                Some(Value::String(s)) => Some(s.clone()),
                Some(e) => e.get("message").and_then(Value::as_str).map(str::to_string),
                None => v.get("message").and_then(Value::as_str).map(str::to_string),
            },
            Err(_) => Some(body.trim().to_string()),
        };
        detail.filter(|d| !d.is_empty())
    }

    fn map_http_error(status: reqwest::StatusCode, body: &str) -> ChatError {
        let detail = Self::error_detail(body);
        match status.as_u16() {
            429 => ChatError::RateLimited { detail },
            code => ChatError::Provider { status: code, detail },
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAiCompatProvider {
    async fn complete(&self, messages: &[WireMessage]) -> Result<String, ChatError> {
        let api_key = self.api_key.as_deref().ok_or(ChatError::MissingApiKey)?;
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = json!({ "model": self.model, "messages": messages });

        tracing::debug!(url = %url, model = %self.model, messages = messages.len(), "Sending completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let err = Self::map_http_error(status, &text);
            tracing::warn!(status = status.as_u16(), error = %err, "Completion request failed");
            return Err(err);
        }

        let json: Value = serde_json::from_str(&text)?;
        Ok(Self::parse_response(&json))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

impl std::fmt::Debug for OpenAiCompatProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatProvider")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("has_api_key", &self.api_key.is_some())
            .finish()
    }
}
