//! HTTP client for the wiki `api.php` endpoint.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::debug;

use super::cache::CachedService;
use super::config::ClientConfig;
use super::limiter::RateLimited;
use super::{parse_ask_response, AskResults, QueryError, QueryService};

/// The full client stack: cached, rate limited, HTTP.
pub type WikiService = CachedService<RateLimited<SmwClient>>;

/// Build the full client stack from configuration.
pub fn connect(config: &ClientConfig) -> Result<WikiService, QueryError> {
    let client = SmwClient::new(config)?;
    Ok(CachedService::new(
        RateLimited::new(client, config.rate_limit),
        config.cache_config(),
    ))
}

/// Semantic MediaWiki `ask` client.
///
/// Sends `GET {api_url}?format=json&action=ask&query=...` and nothing else;
/// rate limiting and caching are layered on by [`connect`].
pub struct SmwClient {
    http: Client,
    api_url: Url,
}

impl SmwClient {
    /// Create a new client.
    pub fn new(config: &ClientConfig) -> Result<Self, QueryError> {
        let api_url = Url::parse(&config.api_url)
            .map_err(|e| QueryError::InvalidUrl(format!("{}: {e}", config.api_url)))?;

        let http = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()
            .map_err(|e| QueryError::Transport(e.to_string()))?;

        Ok(Self { http, api_url })
    }

    /// Full request URL for a query.
    pub fn request_url(&self, query: &str) -> Url {
        let mut url = self.api_url.clone();
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("action", "ask")
            .append_pair("query", query);
        url
    }
}

#[async_trait]
impl QueryService for SmwClient {
    async fn ask(&self, query: &str) -> Result<AskResults, QueryError> {
        let url = self.request_url(query);

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| QueryError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(QueryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| QueryError::Transport(e.to_string()))?;

        let results = parse_ask_response(body)?;
        debug!(results = results.len(), "Query complete");
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_url_encodes_query() {
        let client = SmwClient::new(&ClientConfig::default()).unwrap();
        let url = client.request_url("[[Category:Items]]|?Uses material|limit=10");

        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("format".to_string(), "json".to_string()),
                ("action".to_string(), "ask".to_string()),
                (
                    "query".to_string(),
                    "[[Category:Items]]|?Uses material|limit=10".to_string()
                ),
            ]
        );
        assert_eq!(url.path(), "/api.php");
    }

    #[test]
    fn test_invalid_url() {
        let config = ClientConfig {
            api_url: "not a url".to_string(),
            ..ClientConfig::default()
        };
        assert!(matches!(SmwClient::new(&config), Err(QueryError::InvalidUrl(_))));
    }

    #[test]
    fn test_connect_builds_stack() {
        let service = connect(&ClientConfig::default()).unwrap();
        assert_eq!(service.inner().interval(), ClientConfig::default().rate_limit);
        assert!(service.cache_stats().is_some());
    }
}
