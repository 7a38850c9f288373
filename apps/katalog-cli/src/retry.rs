//! Caller-side retry around `CatalogStore::search`.
//!
//! The store reports a failure once and leaves the decision to its caller.
//! Here only retryable failures (connection, timeout, 5xx/429) are retried,
//! with exponential backoff, up to `max_retries` extra attempts.

use backoff::backoff::Backoff;
use backoff::ExponentialBackoff;
use katalog_client::{CatalogSource, CatalogStore, ProductRecord, RetrievalFailure, RetrySettings};
use tracing::warn;

fn create_backoff(settings: &RetrySettings) -> ExponentialBackoff {
    ExponentialBackoff {
        initial_interval: settings.initial_backoff(),
        max_interval: settings.max_backoff(),
        multiplier: 2.0,
        max_elapsed_time: None,
        ..Default::default()
    }
}

/// Runs `store.search(query)`, retrying retryable failures.
pub async fn search_with_retry<S: CatalogSource>(
    store: &CatalogStore<S>,
    query: &str,
    settings: &RetrySettings,
) -> Result<Vec<ProductRecord>, RetrievalFailure> {
    let mut backoff = create_backoff(settings);
    let mut attempt = 0u32;

    loop {
        match store.search(query).await {
            Ok(records) => return Ok(records),
            Err(failure) if failure.is_retryable() && attempt < settings.max_retries => {
                attempt += 1;
                let delay = backoff.next_backoff().unwrap_or_else(|| settings.max_backoff());
                warn!(
                    attempt,
                    max_retries = settings.max_retries,
                    ?delay,
                    error = %failure,
                    "Catalog search failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(failure) => return Err(failure),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct FlakySource {
        responses: Mutex<VecDeque<Result<Vec<ProductRecord>, RetrievalFailure>>>,
        calls: AtomicUsize,
    }

    impl FlakySource {
        fn new(responses: Vec<Result<Vec<ProductRecord>, RetrievalFailure>>) -> Self {
            FlakySource {
                responses: Mutex::new(responses.into()),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CatalogSource for FlakySource {
        async fn fetch_all(&self) -> Result<Vec<ProductRecord>, RetrievalFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    fn fast_retry(max_retries: u32) -> RetrySettings {
        RetrySettings {
            max_retries,
            initial_backoff_ms: 1,
            max_backoff_secs: 1,
        }
    }

    #[tokio::test]
    async fn test_retries_retryable_failures() {
        let store = CatalogStore::new(FlakySource::new(vec![
            Err(RetrievalFailure::Timeout(10)),
            Err(RetrievalFailure::Status { status: 503 }),
            Ok(vec![ProductRecord::new().with_name("Kopi")]),
        ]));

        let records = search_with_retry(&store, "kopi", &fast_retry(3)).await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(store.source().calls.load(Ordering::SeqCst), 3);
        assert_eq!(store.status_message(), "Showing 1 products (of 1).");
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let store = CatalogStore::new(FlakySource::new(vec![
            Err(RetrievalFailure::Connection("refused".into())),
            Err(RetrievalFailure::Connection("refused".into())),
            Ok(Vec::new()),
        ]));

        let err = search_with_retry(&store, "kopi", &fast_retry(1)).await.unwrap_err();

        assert!(matches!(err, RetrievalFailure::Connection(_)));
        assert_eq!(store.source().calls.load(Ordering::SeqCst), 2);
        assert!(!store.is_busy());
    }

    #[tokio::test]
    async fn test_does_not_retry_permanent_failures() {
        let store = CatalogStore::new(FlakySource::new(vec![
            Err(RetrievalFailure::Status { status: 404 }),
            Ok(Vec::new()),
        ]));

        let err = search_with_retry(&store, "", &fast_retry(5)).await.unwrap_err();

        assert_eq!(err, RetrievalFailure::Status { status: 404 });
        assert_eq!(store.source().calls.load(Ordering::SeqCst), 1);
    }
}
