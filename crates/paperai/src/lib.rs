//! PaperAI
//!
//! Backend for a research-paper assistant: a Semantic Scholar search proxy,
//! a document store with PDF text extraction, chat and analysis over an
//! OpenAI-compatible completion API, and force-directed paper graphs.
//!
//! # Features
//!
//! - **Search**: sort, year range and publication-type filtering with offset paging
//! - **Documents**: upload PDFs or text; extracted text becomes chat context
//! - **Chat**: transcript with in-place error reporting; the API key stays server-side
//! - **Graphs**: connected-papers and knowledge-graph views, laid out and styled
//!
//! # Example
//!
//! ```no_run
//! use paperai::{config::Config, server::PaperAiServer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     PaperAiServer::new(&config)?.run_http(5002).await
//! }
//! ```

pub mod chat;
pub mod client;
pub mod config;
pub mod error;
pub mod extract;
pub mod formatters;
pub mod graph;
pub mod models;
pub mod search;
pub mod server;
pub mod store;

pub use client::SemanticScholarClient;
pub use config::Config;
pub use error::{ApiError, ClientError};
