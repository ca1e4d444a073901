//! Chat transcript messages.

use serde::{Deserialize, Serialize};

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions and document context.
    System,
    /// The person asking.
    User,
    /// The model.
    Assistant,
}

/// Delivery state of a transcript message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    /// Final content.
    #[default]
    Ready,
    /// Placeholder awaiting the provider.
    Loading,
    /// The request failed; content holds the error text.
    Error,
}

/// One entry in a chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author role.
    pub role: Role,

    /// Message text.
    pub content: String,

    /// Delivery state.
    #[serde(default)]
    pub status: MessageStatus,
}

impl ChatMessage {
    /// A ready system message.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into(), status: MessageStatus::Ready }
    }

    /// A ready user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into(), status: MessageStatus::Ready }
    }

    /// A ready assistant message.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into(), status: MessageStatus::Ready }
    }

    /// An assistant placeholder shown while a request is in flight.
    #[must_use]
    pub fn loading() -> Self {
        Self { role: Role::Assistant, content: String::new(), status: MessageStatus::Loading }
    }

    /// True if the message should be sent to the provider.
    #[must_use]
    pub fn is_deliverable(&self) -> bool {
        self.status == MessageStatus::Ready
    }
}

/// Wire format of one message in a completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMessage {
    /// Role name.
    pub role: Role,

    /// Message text.
    pub content: String,
}

impl From<&ChatMessage> for WireMessage {
    fn from(message: &ChatMessage) -> Self {
        Self { role: message.role, content: message.content.clone() }
    }
}
