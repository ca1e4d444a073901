//! Chat transcript and the ask flow.

use super::provider::CompletionProvider;
use crate::config::api;
use crate::error::ChatError;
use crate::extract::truncate_chars;
use crate::models::{ChatMessage, DocumentText, MessageStatus, Role, WireMessage};

/// Shown when a request fails without any provider detail.
pub const GENERIC_FAILURE: &str = "Failed to get a response. Please try again.";

/// An ordered chat transcript.
#[derive(Debug, Clone)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    context_budget: usize,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    /// Empty transcript with the default context budget.
    #[must_use]
    pub fn new() -> Self {
        Self { messages: Vec::new(), context_budget: api::CONTEXT_CHAR_BUDGET }
    }

    /// Resume from an existing transcript.
    ///
    /// System messages are dropped; the context block is rebuilt on every ask.
    #[must_use]
    pub fn from_transcript(messages: Vec<ChatMessage>) -> Self {
        let messages = messages.into_iter().filter(|m| m.role != Role::System).collect();
        Self { messages, ..Self::new() }
    }

    /// Set the character budget for the document context block.
    #[must_use]
    pub const fn with_context_budget(mut self, budget: usize) -> Self {
        self.context_budget = budget;
        self
    }

    /// The transcript, oldest first.
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Consume the session, returning its transcript.
    #[must_use]
    pub fn into_messages(self) -> Vec<ChatMessage> {
        self.messages
    }

    /// Context block for `files`: `--- name ---` headers over each text,
    /// separated by blank lines and cut to the character budget.
    #[must_use]
    pub fn context_block(&self, files: &[DocumentText]) -> Option<String> {
        let block = files
            .iter()
            .filter(|f| !f.text.trim().is_empty())
            .map(|f| format!("--- {} ---\n{}", f.name, f.text))
            .collect::<Vec<_>>()
            .join("\n\n");

        if block.is_empty() {
            return None;
        }
        Some(truncate_chars(&block, self.context_budget).to_string())
    }

    /// Messages sent to the provider: the context block, then every ready message.
    #[must_use]
    pub fn request_messages(&self, files: &[DocumentText]) -> Vec<WireMessage> {
        let context = self
            .context_block(files)
            .map(|content| WireMessage { role: Role::System, content });

        context
            .into_iter()
            .chain(self.messages.iter().filter(|m| m.is_deliverable()).map(WireMessage::from))
            .collect()
    }

    /// Ask a question with `files` as context.
    ///
    /// Appends the question and a loading placeholder, then replaces the
    /// placeholder with the answer, or with an error-flagged message if the
    /// provider fails. Provider failures are reported in the transcript, not
    /// as `Err`.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::Validation`] for a blank question; the transcript
    /// is left untouched.
    pub async fn ask(
        &mut self,
        provider: &dyn CompletionProvider,
        files: &[DocumentText],
        question: &str,
    ) -> Result<&ChatMessage, ChatError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ChatError::Validation("Question cannot be empty".to_string()));
        }

        self.messages.push(ChatMessage::user(question));
        let request = self.request_messages(files);
        self.messages.push(ChatMessage::loading());

        tracing::debug!(
            model = provider.model_name(),
            messages = request.len(),
            files = files.len(),
            "Asking chat provider"
        );

        let reply = match provider.complete(&request).await {
            Ok(answer) => ChatMessage::assistant(answer),
            Err(err) => {
                tracing::warn!(error = %err, "Chat request failed");
                ChatMessage {
                    role: Role::Assistant,
                    content: err.detail().unwrap_or(GENERIC_FAILURE).to_string(),
                    status: MessageStatus::Error,
                }
            }
        };

        let last = self.messages.len() - 1;
        self.messages[last] = reply;
        Ok(&self.messages[last])
    }
}
