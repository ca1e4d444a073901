//! HTTP API server.
//!
//! One axum router serves the search proxy, the document store, chat and
//! analysis, and the graph endpoints. Shared state lives in [`AppState`]
//! behind an `Arc`; the file store is the only mutable part.

pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;

use crate::chat::{Analyzer, CompletionProvider, OpenAiCompatProvider};
use crate::client::SemanticScholarClient;
use crate::config::Config;
use crate::graph::ForceLayout;
use crate::search::SearchAggregator;
use crate::store::FileStore;

/// State shared by every handler.
pub struct AppState {
    /// Search front-end.
    pub search: SearchAggregator,

    /// Uploaded documents.
    pub store: FileStore,

    /// Chat backend.
    pub provider: Arc<dyn CompletionProvider>,

    /// Document analyses over the same backend.
    pub analyzer: Analyzer,

    /// Layout engine for graph endpoints.
    pub layout: ForceLayout,

    /// Character budget for chat context.
    pub context_budget: usize,

    /// True if a chat key is configured.
    pub chat_configured: bool,
}

impl AppState {
    /// Build state from configuration with the OpenAI-compatible chat provider.
    ///
    /// # Errors
    ///
    /// Returns error if an HTTP client cannot be built.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let provider: Arc<dyn CompletionProvider> = Arc::new(OpenAiCompatProvider::new(config)?);
        Self::with_provider(config, provider)
    }

    /// Build state with an explicit chat provider.
    ///
    /// # Errors
    ///
    /// Returns error if the search client cannot be built.
    pub fn with_provider(config: &Config, provider: Arc<dyn CompletionProvider>) -> anyhow::Result<Self> {
        let client = Arc::new(SemanticScholarClient::new(config)?);

        Ok(Self {
            search: SearchAggregator::new(client),
            store: FileStore::new(config.max_upload_bytes),
            analyzer: Analyzer::new(Arc::clone(&provider)).with_context_budget(config.context_char_budget),
            provider,
            layout: ForceLayout::default(),
            context_budget: config.context_char_budget,
            chat_configured: config.has_chat_key(),
        })
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("search", &self.search)
            .field("store", &self.store)
            .field("model", &self.provider.model_name())
            .field("chat_configured", &self.chat_configured)
            .finish_non_exhaustive()
    }
}

/// The PaperAI HTTP server.
#[derive(Debug, Clone)]
pub struct PaperAiServer {
    state: Arc<AppState>,
}

impl PaperAiServer {
    /// Create a server from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if an HTTP client cannot be built.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::from_state(AppState::new(config)?))
    }

    /// Create a server around prepared state.
    #[must_use]
    pub fn from_state(state: AppState) -> Self {
        Self { state: Arc::new(state) }
    }

    /// The router, for serving or in-process testing.
    #[must_use]
    pub fn router(&self) -> Router {
        routes::create_router(Arc::clone(&self.state))
    }

    /// Serve HTTP on `port` until Ctrl+C.
    ///
    /// # Errors
    ///
    /// Returns error on bind or server failure.
    pub async fn run_http(self, port: u16) -> anyhow::Result<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        let listener = tokio::net::TcpListener::bind(addr).await?;

        tracing::info!(%addr, chat_configured = self.state.chat_configured, "HTTP server listening");

        axum::serve(listener, self.router()).with_graceful_shutdown(shutdown_signal()).await?;

        tracing::info!("HTTP server shut down");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received shutdown signal");
}
