//! PaperAI - Entry Point
//!
//! `serve` runs the HTTP API; `search` queries Semantic Scholar from the terminal.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use paperai::config::{Config, api};
use paperai::formatters::{compact_search, format_search_markdown};
use paperai::models::{SearchParams, SearchResult};
use paperai::search::{ResultFeed, SearchAggregator, SearchQuery};
use paperai::server::PaperAiServer;
use paperai::SemanticScholarClient;

#[derive(Parser, Debug)]
#[command(name = "paperai")]
#[command(about = "Research paper assistant backend")]
#[command(version)]
struct Cli {
    /// Semantic Scholar API key (optional, enables higher rate limits)
    #[arg(long, env = "SEMANTIC_SCHOLAR_API_KEY", global = true)]
    api_key: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG", global = true)]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API
    Serve {
        /// HTTP server port
        #[arg(long, default_value_t = api::DEFAULT_PORT, env = "PORT")]
        port: u16,
    },

    /// Search papers and print the results
    Search {
        /// Free-text query
        query: String,

        /// Results per page
        #[arg(long, default_value_t = 10)]
        limit: u32,

        /// Number of pages to load
        #[arg(long, default_value_t = 1)]
        pages: u32,

        /// Minimum publication year
        #[arg(long)]
        year_min: Option<i32>,

        /// Maximum publication year
        #[arg(long)]
        year_max: Option<i32>,

        /// relevance, citations or year
        #[arg(long)]
        sort_by: Option<String>,

        /// Publication type substring, or "all"
        #[arg(long = "type")]
        doc_type: Option<String>,

        /// Print compact JSON instead of Markdown
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    let mut config = Config::from_env()?;
    if cli.api_key.is_some() {
        config.api_key = cli.api_key;
    }

    match cli.command {
        Command::Serve { port } => {
            tracing::info!(
                version = env!("CARGO_PKG_VERSION"),
                port,
                has_api_key = config.has_api_key(),
                "Starting PaperAI"
            );
            PaperAiServer::new(&config)?.run_http(port).await?;
        }
        Command::Search { query, limit, pages, year_min, year_max, sort_by, doc_type, json } => {
            let params = SearchParams {
                query: Some(query),
                limit,
                offset: 0,
                year_min,
                year_max,
                sort_by,
                doc_type,
            };
            let mut query = SearchQuery::try_from(params)?;
            let aggregator = SearchAggregator::new(Arc::new(SemanticScholarClient::new(&config)?));

            let mut feed = ResultFeed::new(query.limit);
            let mut ticket = feed.begin(0);
            let mut next = None;
            for page in 0..pages.max(1) {
                if page > 0 {
                    ticket = feed.begin_next();
                }
                query.offset = ticket.offset();
                let result = aggregator.search(&query).await?;
                next = result.next;
                feed.apply(ticket, result);
                if next.is_none() {
                    break;
                }
            }

            let collected = SearchResult {
                total: feed.total(),
                offset: 0,
                next,
                data: feed.papers().to_vec(),
                message: None,
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&compact_search(&collected))?);
            } else {
                println!("{}", format_search_markdown(&collected));
            }
        }
    }

    Ok(())
}
