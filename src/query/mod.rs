//! Semantic MediaWiki `ask` queries.
//!
//! The [`QueryService`] trait is the seam between ingestion and the network.
//! Services compose as decorators:
//!
//! ```text
//! CachedService ─▶ RateLimited ─▶ SmwClient (HTTP)
//! ```
//!
//! [`paginated_ask`] drives any service through cursor pagination.

pub mod cache;
pub mod config;
pub mod limiter;
pub mod paginate;

#[cfg(feature = "http")]
pub mod client;

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use cache::{CacheConfig, CacheStats, CachedService};
pub use config::ClientConfig;
pub use limiter::RateLimited;
pub use paginate::{paginated_ask, AskQuery};

#[cfg(feature = "http")]
pub use client::{connect, SmwClient, WikiService};

/// Error type for query operations.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// The service answered with a non-success HTTP status.
    #[error("query service returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as text.
        body: String,
    },
    /// The service answered successfully but reported a query error.
    #[error("query service reported an error: {0}")]
    Api(Value),
    /// The request could not be sent or the response could not be read.
    #[error("transport error: {0}")]
    Transport(String),
    /// The endpoint URL is not valid.
    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(String),
    /// The response body did not have the expected shape.
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// One result row of an `ask` query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AskResult {
    /// Requested printouts, by printout name. The service encodes "no
    /// printouts" as an empty array, so this is kept as raw JSON.
    #[serde(default)]
    pub printouts: Value,
    /// Display name of the page.
    #[serde(default)]
    pub fulltext: Option<String>,
}

impl AskResult {
    /// Values of a printout. Missing printouts read as empty.
    pub fn printout(&self, name: &str) -> &[Value] {
        self.printouts
            .get(name)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Results of an `ask` query, by page name, in the order the service
/// returned them.
pub type AskResults = IndexMap<String, AskResult>;

/// Something that can answer `ask` queries.
#[async_trait]
pub trait QueryService: Send + Sync {
    /// Run one `ask` query and return its results.
    async fn ask(&self, query: &str) -> Result<AskResults, QueryError>;
}

/// Extract results from an `ask` response body.
///
/// A body with an `error` member is an [`QueryError::Api`]. Results are read
/// from `query.results`; the service sends an empty array rather than an
/// empty object when nothing matched, and that reads as no results.
pub fn parse_ask_response(mut body: Value) -> Result<AskResults, QueryError> {
    if let Some(error) = body.get_mut("error") {
        return Err(QueryError::Api(error.take()));
    }

    match body.pointer_mut("/query/results").map(Value::take) {
        Some(results @ Value::Object(_)) => Ok(serde_json::from_value(results)?),
        _ => Ok(AskResults::new()),
    }
}
