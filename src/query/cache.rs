//! Response cache for query services.
//!
//! Identical query text within the time-to-live is answered from an LRU
//! cache instead of the wrapped service. Errors are never cached.
//!
//! The cache lives in memory for the life of the process. Paginated queries
//! change text with every cursor, so within one run only a repeated query
//! text hits.

use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use lru::LruCache;
use parking_lot::RwLock;
use tracing::debug;

use super::{AskResults, QueryError, QueryService};

/// Configuration for the response cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries in the cache.
    pub max_entries: usize,
    /// How long an entry stays valid.
    pub ttl: Duration,
    /// Whether to enable the cache.
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 256,
            ttl: Duration::from_secs(60),
            enabled: true,
        }
    }
}

struct CacheEntry {
    stored_at: Instant,
    results: AskResults,
}

/// Query service decorator that caches responses by query text.
pub struct CachedService<S> {
    inner: S,
    ttl: Duration,
    cache: Option<RwLock<LruCache<String, CacheEntry>>>,
}

impl<S> CachedService<S> {
    /// Wrap `inner` with a cache.
    pub fn new(inner: S, config: CacheConfig) -> Self {
        let cache = NonZeroUsize::new(config.max_entries)
            .filter(|_| config.enabled)
            .map(|size| RwLock::new(LruCache::new(size)));

        Self {
            inner,
            ttl: config.ttl,
            cache,
        }
    }

    /// The wrapped service.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn lookup(&self, query: &str) -> Option<AskResults> {
        let cache = self.cache.as_ref()?;
        {
            let guard = cache.read();
            let entry = guard.peek(query)?;
            if entry.stored_at.elapsed() < self.ttl {
                return Some(entry.results.clone());
            }
        }
        cache.write().pop(query);
        None
    }

    fn store(&self, query: &str, results: &AskResults) {
        if let Some(cache) = &self.cache {
            cache.write().put(
                query.to_string(),
                CacheEntry {
                    stored_at: Instant::now(),
                    results: results.clone(),
                },
            );
        }
    }

    /// Get cache statistics.
    ///
    /// Returns `None` if caching is disabled.
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(|cache| {
            let cache = cache.read();
            CacheStats {
                len: cache.len(),
                cap: cache.cap().get(),
            }
        })
    }

    /// Clear the cache.
    ///
    /// Does nothing if caching is disabled.
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.write().clear();
        }
    }
}

#[async_trait]
impl<S: QueryService> QueryService for CachedService<S> {
    async fn ask(&self, query: &str) -> Result<AskResults, QueryError> {
        if let Some(results) = self.lookup(query) {
            debug!(query, results = results.len(), "Cache hit");
            return Ok(results);
        }

        let results = self.inner.ask(query).await?;
        self.store(query, &results);
        Ok(results)
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Copy)]
pub struct CacheStats {
    /// Current number of entries in the cache.
    pub len: usize,
    /// Maximum capacity of the cache.
    pub cap: usize,
}
