//! Chat and document analysis over an OpenAI-compatible completion API.
//!
//! - [`ChatSession`]: transcript with the ask/placeholder/replace flow
//! - [`Analyzer`]: fixed-prompt analyses of a single document
//! - [`CompletionProvider`]: the backend seam

mod analysis;
mod provider;
mod session;

pub use analysis::{AnalysisKind, Analyzer, strip_emphasis};
pub use provider::{CompletionProvider, EMPTY_COMPLETION, OpenAiCompatProvider};
pub use session::{ChatSession, GENERIC_FAILURE};
