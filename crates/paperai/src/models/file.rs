//! Stored document records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A document held by the file store, including its text content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    /// Store-assigned identifier.
    pub id: Uuid,

    /// Stored file name.
    pub filename: String,

    /// Name the client uploaded the file under.
    pub original_name: String,

    /// Declared MIME type.
    pub mime_type: String,

    /// Upload size in bytes.
    pub size: usize,

    /// Text content (extracted text for PDFs).
    pub content: String,

    /// Upload time.
    pub uploaded_at: DateTime<Utc>,
}

/// A stored document without its content, as returned by list calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSummary {
    /// Store-assigned identifier.
    pub id: Uuid,

    /// Stored file name.
    pub filename: String,

    /// Name the client uploaded the file under.
    pub original_name: String,

    /// Declared MIME type.
    pub mime_type: String,

    /// Upload size in bytes.
    pub size: usize,

    /// Upload time.
    pub uploaded_at: DateTime<Utc>,
}

impl From<&StoredFile> for FileSummary {
    fn from(file: &StoredFile) -> Self {
        Self {
            id: file.id,
            filename: file.filename.clone(),
            original_name: file.original_name.clone(),
            mime_type: file.mime_type.clone(),
            size: file.size,
            uploaded_at: file.uploaded_at,
        }
    }
}

/// An upload as received, before validation.
#[derive(Debug, Clone)]
pub struct Upload {
    /// Client-supplied file name.
    pub name: String,

    /// Declared MIME type.
    pub mime_type: String,

    /// Raw bytes.
    pub bytes: Vec<u8>,
}

/// Document text handed to the chat adapter as context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentText {
    /// Display name.
    pub name: String,

    /// Extracted text.
    pub text: String,
}

impl From<&StoredFile> for DocumentText {
    fn from(file: &StoredFile) -> Self {
        Self { name: file.original_name.clone(), text: file.content.clone() }
    }
}
