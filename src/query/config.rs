//! Query client configuration.
//!
//! All settings can be configured via environment variables:
//! - `NID_API_URL`: `api.php` endpoint (default: the Old School RuneScape wiki)
//! - `NID_USER_AGENT`: User-Agent header (default: `nid/<version>`)
//! - `NID_TIMEOUT_SECS`: Per-request timeout (default: 10)
//! - `NID_RATE_LIMIT_MS`: Minimum spacing between requests (default: 1000)
//! - `NID_CACHE_TTL_SECS`: How long responses are reused (default: 60)
//! - `NID_CACHE_ENTRIES`: Maximum cached responses, 0 disables (default: 256)
//! - `NID_PAGE_SIZE`: Results requested per page (default: 10000)

use std::str::FromStr;
use std::time::Duration;

use super::cache::CacheConfig;

/// Default `api.php` endpoint.
pub const DEFAULT_API_URL: &str = "https://oldschool.runescape.wiki/api.php";

/// Default number of results requested per page.
pub const DEFAULT_PAGE_SIZE: usize = 10_000;

/// Configuration for the wiki query client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// `api.php` endpoint URL.
    pub api_url: String,
    /// User-Agent sent with every request.
    pub user_agent: String,
    /// Per-request timeout (default: 10s).
    pub timeout: Duration,
    /// Minimum spacing between requests (default: 1s).
    pub rate_limit: Duration,
    /// Response cache time-to-live (default: 60s).
    pub cache_ttl: Duration,
    /// Maximum number of cached responses (default: 256).
    pub cache_entries: usize,
    /// Results requested per page (default: 10000).
    pub page_size: usize,
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            api_url: lookup("NID_API_URL").unwrap_or(defaults.api_url),
            user_agent: lookup("NID_USER_AGENT").unwrap_or(defaults.user_agent),
            timeout: parsed(&lookup, "NID_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            rate_limit: parsed(&lookup, "NID_RATE_LIMIT_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.rate_limit),
            cache_ttl: parsed(&lookup, "NID_CACHE_TTL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.cache_ttl),
            cache_entries: parsed(&lookup, "NID_CACHE_ENTRIES").unwrap_or(defaults.cache_entries),
            page_size: parsed(&lookup, "NID_PAGE_SIZE")
                .filter(|size| *size > 0)
                .unwrap_or(defaults.page_size),
        }
    }

    /// Cache settings derived from this configuration.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            max_entries: self.cache_entries,
            ttl: self.cache_ttl,
            enabled: self.cache_entries > 0,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            user_agent: concat!("nid/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(10),
            rate_limit: Duration::from_secs(1),
            cache_ttl: Duration::from_secs(60),
            cache_entries: 256,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|raw| raw.trim().parse().ok())
}
