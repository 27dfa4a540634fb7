//! Cursor pagination over `ask` queries.
//!
//! Each page is a separate query. After the first page the query gains a
//! `|[[>>NAME]]` condition, selecting only pages that sort after NAME, where
//! NAME is the last result of the previous page in the order the service
//! returned it. The service's collation decides the order; names are never
//! compared locally. Paging stops at the first short page, at a page that
//! adds no new names, or after `max_pages` pages when that is non-zero.

use tracing::{debug, warn};

use super::config::DEFAULT_PAGE_SIZE;
use super::{AskResults, QueryError, QueryService};

/// A paginated `ask` query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AskQuery {
    /// Selection conditions, e.g. `[[Category:Items]]`.
    pub selections: String,
    /// Printout requests, e.g. `?Uses material`, without a leading `|`.
    pub printouts: Option<String>,
    /// Results requested per page.
    pub page_size: usize,
    /// Maximum number of pages to fetch. Zero means unlimited.
    pub max_pages: usize,
}

impl AskQuery {
    /// Create a query with default paging.
    pub fn new(selections: impl Into<String>) -> Self {
        Self {
            selections: selections.into(),
            printouts: None,
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: 0,
        }
    }

    /// Request printouts.
    pub fn with_printouts(mut self, printouts: impl Into<String>) -> Self {
        self.printouts = Some(printouts.into());
        self
    }

    /// Set the page size. Values below one are raised to one.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Limit the number of pages fetched.
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Query text for the page after `cursor`.
    pub fn page_query(&self, cursor: Option<&str>) -> String {
        let cursor = cursor.map(|last| format!("|[[>>{last}]]")).unwrap_or_default();
        let printouts = self
            .printouts
            .as_deref()
            .map(|printouts| format!("|{printouts}"))
            .unwrap_or_default();
        format!(
            "{}{cursor}{printouts}|limit={}",
            self.selections, self.page_size
        )
    }
}

/// Fetch every page of `query` from `service` and merge the results.
pub async fn paginated_ask<S: QueryService + ?Sized>(
    service: &S,
    query: &AskQuery,
) -> Result<AskResults, QueryError> {
    let mut results = AskResults::new();
    let mut cursor: Option<String> = None;
    let mut page = 0usize;

    loop {
        let text = query.page_query(cursor.as_deref());
        debug!(query = %text, "Querying");

        let batch = service.ask(&text).await?;
        page += 1;

        let fetched = batch.len();
        let last = batch.keys().last().cloned();
        let mut added = 0usize;
        for (name, result) in batch {
            if results.insert(name, result).is_none() {
                added += 1;
            }
        }

        debug!(
            page,
            fetched,
            added,
            total = results.len(),
            after = cursor.as_deref().unwrap_or(""),
            last = last.as_deref().unwrap_or(""),
            "Fetched page"
        );

        if fetched < query.page_size || (query.max_pages > 0 && page >= query.max_pages) {
            break;
        }

        if added == 0 {
            warn!(page, "Page added no new results, stopping pagination");
            break;
        }

        cursor = last;
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::AskResult;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    /// Serves a sorted page list in chunks, honoring `[[>>NAME]]` and `limit=`.
    struct PagedService {
        pages: Vec<String>,
        seen: Mutex<Vec<String>>,
    }

    impl PagedService {
        fn with_pages(count: usize) -> Self {
            Self {
                pages: (0..count).map(|i| format!("Page {i:03}")).collect(),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl QueryService for PagedService {
        async fn ask(&self, query: &str) -> Result<AskResults, QueryError> {
            self.seen.lock().push(query.to_string());

            let after = query
                .split("[[>>")
                .nth(1)
                .and_then(|rest| rest.split("]]").next());
            let limit: usize = query
                .rsplit("limit=")
                .next()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(usize::MAX);

            Ok(self
                .pages
                .iter()
                .filter(|name| after.map_or(true, |after| name.as_str() > after))
                .take(limit)
                .map(|name| (name.clone(), AskResult::default()))
                .collect())
        }
    }

    #[test]
    fn test_page_query_text() {
        let query = AskQuery::new("[[Category:Items]]")
            .with_printouts("?Production JSON|?Uses material")
            .with_page_size(500);

        assert_eq!(
            query.page_query(None),
            "[[Category:Items]]|?Production JSON|?Uses material|limit=500"
        );
        assert_eq!(
            query.page_query(Some("Bronze bar")),
            "[[Category:Items]]|[[>>Bronze bar]]|?Production JSON|?Uses material|limit=500"
        );
    }

    #[test]
    fn test_page_query_without_printouts() {
        let query = AskQuery::new("[[Drop JSON::+]]").with_page_size(10);
        assert_eq!(query.page_query(None), "[[Drop JSON::+]]|limit=10");
    }

    #[tokio::test]
    async fn test_fetches_all_pages() {
        let service = PagedService::with_pages(25);
        let query = AskQuery::new("[[X]]").with_page_size(10);

        let results = paginated_ask(&service, &query).await.unwrap();

        assert_eq!(results.len(), 25);
        let seen = service.seen.lock();
        assert_eq!(seen.len(), 3);
        assert!(seen[1].contains("[[>>Page 009]]"));
        assert!(seen[2].contains("[[>>Page 019]]"));
    }

    #[tokio::test]
    async fn test_short_first_page_stops() {
        let service = PagedService::with_pages(3);
        let query = AskQuery::new("[[X]]").with_page_size(10);

        let results = paginated_ask(&service, &query).await.unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(service.seen.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_exact_multiple_needs_one_empty_page() {
        let service = PagedService::with_pages(20);
        let query = AskQuery::new("[[X]]").with_page_size(10);

        let results = paginated_ask(&service, &query).await.unwrap();

        assert_eq!(results.len(), 20);
        assert_eq!(service.seen.lock().len(), 3);
    }

    #[tokio::test]
    async fn test_max_pages() {
        let service = PagedService::with_pages(100);
        let query = AskQuery::new("[[X]]").with_page_size(10).with_max_pages(2);

        let results = paginated_ask(&service, &query).await.unwrap();

        assert_eq!(results.len(), 20);
        assert_eq!(service.seen.lock().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_result() {
        let service = PagedService::with_pages(0);
        let query = AskQuery::new("[[X]]");

        assert!(paginated_ask(&service, &query).await.unwrap().is_empty());
    }

    /// Serves pages sorted case-insensitively, the way a wiki collation
    /// might, honoring `[[>>NAME]]` and `limit=` under that order.
    struct CollatedService {
        pages: Vec<&'static str>,
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl QueryService for CollatedService {
        async fn ask(&self, query: &str) -> Result<AskResults, QueryError> {
            self.seen.lock().push(query.to_string());

            let after = query
                .split("[[>>")
                .nth(1)
                .and_then(|rest| rest.split("]]").next())
                .map(str::to_lowercase);
            let limit: usize = query
                .rsplit("limit=")
                .next()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(usize::MAX);

            Ok(self
                .pages
                .iter()
                .filter(|name| after.as_deref().map_or(true, |after| name.to_lowercase().as_str() > after))
                .take(limit)
                .map(|name| (name.to_string(), AskResult::default()))
                .collect())
        }
    }

    #[tokio::test]
    async fn test_cursor_follows_service_collation() {
        let service = CollatedService {
            pages: vec!["apple", "Banana", "Cat", "Dog", "Eel"],
            seen: Mutex::new(Vec::new()),
        };
        let query = AskQuery::new("[[X]]").with_page_size(2);

        let results = paginated_ask(&service, &query).await.unwrap();

        let names: Vec<&str> = results.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["apple", "Banana", "Cat", "Dog", "Eel"]);
        let seen = service.seen.lock();
        assert_eq!(seen.len(), 3);
        assert!(seen[1].contains("[[>>Banana]]"));
        assert!(seen[2].contains("[[>>Dog]]"));
    }

    struct StuckService;

    #[async_trait]
    impl QueryService for StuckService {
        async fn ask(&self, _query: &str) -> Result<AskResults, QueryError> {
            Ok([("Same".to_string(), AskResult::default())].into_iter().collect())
        }
    }

    #[tokio::test]
    async fn test_stuck_cursor_stops() {
        let query = AskQuery::new("[[X]]").with_page_size(1);
        let results = paginated_ask(&StuckService, &query).await.unwrap();
        assert_eq!(results.len(), 1);
    }

    struct FailingService;

    #[async_trait]
    impl QueryService for FailingService {
        async fn ask(&self, _query: &str) -> Result<AskResults, QueryError> {
            Err(QueryError::Status {
                status: 503,
                body: "maintenance".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_errors_propagate() {
        let query = AskQuery::new("[[X]]");
        let err = paginated_ask(&FailingService, &query).await.unwrap_err();
        assert!(matches!(err, QueryError::Status { status: 503, .. }));
    }
}
