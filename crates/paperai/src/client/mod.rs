//! Semantic Scholar API client.
//!
//! Provides async HTTP client with:
//! - Connection pooling via reqwest
//! - Response caching with a configurable TTL
//!
//! Requests are never retried; a 429 is surfaced as [`ClientError::RateLimited`].

use moka::future::Cache;
use reqwest::Client;

use crate::config::{Config, api, fields};
use crate::error::{ClientError, ClientResult};
use crate::models::{Paper, SearchResult};

/// Semantic Scholar API client.
#[derive(Clone)]
pub struct SemanticScholarClient {
    /// HTTP client.
    client: Client,

    /// Response cache.
    cache: Cache<String, serde_json::Value>,

    /// API key (optional).
    api_key: Option<String>,

    /// Graph API base URL.
    graph_api_url: String,
}

impl SemanticScholarClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        if let Some(ref key) = config.api_key {
            headers.insert("x-api-key", key.parse()?);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(api::MAX_KEEPALIVE)
            .pool_idle_timeout(api::KEEPALIVE_EXPIRY)
            .gzip(true)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(config.cache_max_size)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self {
            client,
            cache,
            api_key: config.api_key.clone(),
            graph_api_url: config.graph_api_url.clone(),
        })
    }

    /// Check if an API key is configured.
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Search for papers.
    ///
    /// `extra` carries optional provider parameters (`year`, `sort`).
    pub async fn search_papers(
        &self,
        query: &str,
        offset: u32,
        limit: u32,
        extra: &[(String, String)],
    ) -> ClientResult<SearchResult> {
        let url = format!("{}/paper/search", self.graph_api_url);

        let mut params = vec![
            ("query".to_string(), query.to_string()),
            ("offset".to_string(), offset.to_string()),
            ("limit".to_string(), limit.to_string()),
            ("fields".to_string(), fields::SEARCH.join(",")),
        ];
        params.extend(extra.iter().cloned());

        self.get(&url, &params).await
    }

    /// Get a single paper by ID, including its references.
    pub async fn get_paper(&self, paper_id: &str) -> ClientResult<Paper> {
        let url = self.paper_url(paper_id)?;
        let params = vec![("fields".to_string(), fields::DETAIL.join(","))];

        self.get(url.as_str(), &params).await
    }

    /// `{graph_api_url}/paper/{id}` with the id percent-encoded as one path segment.
    fn paper_url(&self, paper_id: &str) -> ClientResult<url::Url> {
        if matches!(paper_id, "" | "." | "..") {
            return Err(ClientError::bad_request(format!("invalid paper ID '{paper_id}'")));
        }

        let mut url = url::Url::parse(&self.graph_api_url)?;
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(["paper", paper_id]);
        Ok(url)
    }

    /// Make a GET request.
    async fn get<T>(&self, url: &str, params: &[(String, String)]) -> ClientResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let cache_key = self.cache_key("GET", url, params);
        if let Some(cached) = self.cache.get(&cache_key).await {
            tracing::debug!(url, "Serving cached response");
            return serde_json::from_value(cached).map_err(ClientError::from);
        }

        tracing::debug!(url, "Requesting Semantic Scholar");
        let response = self.client.get(url).query(params).send().await?;

        let response = self.handle_response(response).await?;
        let value: serde_json::Value = response.json().await?;

        self.cache.insert(cache_key, value.clone()).await;

        serde_json::from_value(value).map_err(ClientError::from)
    }

    /// Handle API response status codes.
    async fn handle_response(
        &self,
        response: reqwest::Response,
    ) -> ClientResult<reqwest::Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        match status.as_u16() {
            429 => {
                let retry_after = response
                    .headers()
                    .get("Retry-After")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(60);

                tracing::warn!(retry_after, "Semantic Scholar rate limit hit");
                Err(ClientError::rate_limited(retry_after))
            }
            404 => {
                let text = response.text().await.unwrap_or_default();
                Err(ClientError::not_found(text))
            }
            400 => {
                let text = response.text().await.unwrap_or_default();
                Err(ClientError::bad_request(text))
            }
            500..=599 => {
                let text = response.text().await.unwrap_or_default();
                Err(ClientError::server(status.as_u16(), text))
            }
            _ => {
                let text = response.text().await.unwrap_or_default();
                Err(ClientError::UnexpectedStatus { status: status.as_u16(), message: text })
            }
        }
    }

    /// Generate cache key.
    fn cache_key(&self, method: &str, url: &str, params: &[(String, String)]) -> String {
        use md5::{Digest, Md5};

        let mut hasher = Md5::new();
        hasher.update(method.as_bytes());
        hasher.update(b"|");
        hasher.update(url.as_bytes());
        hasher.update(b"|");

        for (k, v) in params {
            hasher.update(k.as_bytes());
            hasher.update(b"=");
            hasher.update(v.as_bytes());
            hasher.update(b"&");
        }

        format!("{:x}", hasher.finalize())
    }
}

impl std::fmt::Debug for SemanticScholarClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticScholarClient").field("has_api_key", &self.has_api_key()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_depends_on_params() {
        let client = SemanticScholarClient::new(&Config::default()).unwrap();
        let a = client.cache_key("GET", "u", &[("query".into(), "a".into())]);
        let b = client.cache_key("GET", "u", &[("query".into(), "b".into())]);
        assert_ne!(a, b);
        assert_eq!(a, client.cache_key("GET", "u", &[("query".into(), "a".into())]));
    }

    #[test]
    fn test_paper_url_encodes_id_as_one_segment() {
        let client = SemanticScholarClient::new(&Config::for_testing("http://localhost:1")).unwrap();

        let url = client.paper_url("DOI:10.1/x?y#z").unwrap();
        assert_eq!(url.as_str(), "http://localhost:1/graph/v1/paper/DOI:10.1%2Fx%3Fy%23z");

        assert!(matches!(client.paper_url(".."), Err(ClientError::BadRequest { .. })));
        assert!(matches!(client.paper_url("."), Err(ClientError::BadRequest { .. })));
    }
}
