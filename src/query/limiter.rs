//! Request spacing for query services.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

use super::{AskResults, QueryError, QueryService};

/// Query service decorator that allows at most one request per `interval`.
///
/// Callers that arrive early wait for their turn instead of failing.
/// Concurrent callers are served one at a time.
pub struct RateLimited<S> {
    inner: S,
    interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl<S> RateLimited<S> {
    /// Wrap `inner` so requests are spaced at least `interval` apart.
    pub fn new(inner: S, interval: Duration) -> Self {
        Self {
            inner,
            interval,
            last_request: Mutex::new(None),
        }
    }

    /// The wrapped service.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Minimum spacing between requests.
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

#[async_trait]
impl<S: QueryService> QueryService for RateLimited<S> {
    async fn ask(&self, query: &str) -> Result<AskResults, QueryError> {
        let mut last_request = self.last_request.lock().await;

        if let Some(previous) = *last_request {
            let ready_at = previous + self.interval;
            let now = Instant::now();
            if ready_at > now {
                debug!(wait = ?(ready_at - now), "Rate limited, waiting");
                sleep_until(ready_at).await;
            }
        }

        *last_request = Some(Instant::now());
        self.inner.ask(query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct EchoService;

    #[async_trait]
    impl QueryService for EchoService {
        async fn ask(&self, _query: &str) -> Result<AskResults, QueryError> {
            Ok(AskResults::new())
        }
    }

    #[tokio::test]
    async fn test_first_request_is_immediate() {
        let service = RateLimited::new(EchoService, Duration::from_secs(30));

        let start = std::time::Instant::now();
        service.ask("a").await.unwrap();

        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_requests_are_spaced() {
        let interval = Duration::from_millis(40);
        let service = RateLimited::new(EchoService, interval);

        let start = std::time::Instant::now();
        for _ in 0..3 {
            service.ask("a").await.unwrap();
        }

        assert!(start.elapsed() >= interval * 2);
    }

    #[tokio::test]
    async fn test_concurrent_callers_are_serialized() {
        let interval = Duration::from_millis(30);
        let service = Arc::new(RateLimited::new(EchoService, interval));

        let start = std::time::Instant::now();
        let handles: Vec<_> = (0..3)
            .map(|_| {
                let service = Arc::clone(&service);
                tokio::spawn(async move { service.ask("a").await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert!(start.elapsed() >= interval * 2);
    }
}
