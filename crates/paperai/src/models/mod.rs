//! Data models.
//!
//! Provider models use `#[serde(default)]` for optional fields and
//! `#[serde(rename_all = "camelCase")]` to match Semantic Scholar naming.

mod chat;
mod file;
mod inputs;
mod paper;
mod record;

pub use chat::{ChatMessage, MessageStatus, Role, WireMessage};
pub use file::{DocumentText, FileSummary, StoredFile, Upload};
pub use inputs::*;
pub use paper::{AuthorRef, OpenAccessPdf, Paper, PaperRef, SearchResult};
pub use record::{AuthorStats, CitationTrend, Connection, PaperRecord, TopicStats};
