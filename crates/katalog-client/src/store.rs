//! # Catalog Store
//!
//! Holds the state of the last product search.
//!
//! ## Search Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    search(query)                                        │
//! │                                                                         │
//! │   busy = true  (BusyGuard created)                                      │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   wait for earlier searches on this store (FIFO)                        │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   source.fetch_all().await  ◄── only suspension point                   │
//! │        │                                                                │
//! │   ┌────┴──────────────┐                                                 │
//! │   ▼ Ok(all)           ▼ Err(failure)                                    │
//! │   filter(all, query)  log failure detail                                │
//! │   results = matched   status = generic notice                           │
//! │   status = summary    results unchanged                                 │
//! │   return Ok(matched)  return Err(failure)                               │
//! │        │                    │                                           │
//! │        └─────────┬──────────┘                                           │
//! │                  ▼                                                      │
//! │   busy = false  (BusyGuard dropped: also on cancellation)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Thread Safety
//! State lives behind a `std::sync::RwLock` that is never held across an
//! await. Overlapping searches on one store run one after another in arrival
//! order, so the state always reflects the most recently started search.
//! `select`/`clear_selected` never wait on a search.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

use katalog_core::{filter, ProductRecord};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::error::RetrievalFailure;
use crate::source::CatalogSource;

/// Status message set when the catalog cannot be fetched.
///
/// The failure detail goes to the log and to the caller, never into the
/// status field.
pub const FAILURE_NOTICE: &str = "Failed to load products. See the log for details.";

#[derive(Debug, Default)]
struct StoreState {
    results: Vec<ProductRecord>,
    status_message: String,
    selected: Option<ProductRecord>,
    /// Searches entered and not yet finished.
    in_flight: usize,
}

/// Read-only view of the store, for UI layers and JSON output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    pub results: Vec<ProductRecord>,
    pub busy: bool,
    pub status_message: String,
    pub selected: Option<ProductRecord>,
}

// =============================================================================
// Busy Guard
// =============================================================================

/// Marks a search as in flight for as long as it lives.
///
/// Released in `Drop`, so the flag clears on success, on failure, and when
/// the search future is dropped mid-fetch.
struct BusyGuard<'a> {
    state: &'a RwLock<StoreState>,
}

impl<'a> BusyGuard<'a> {
    fn enter(state: &'a RwLock<StoreState>) -> Self {
        state.write().unwrap_or_else(PoisonError::into_inner).in_flight += 1;
        BusyGuard { state }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.in_flight = state.in_flight.saturating_sub(1);
    }
}

// =============================================================================
// Catalog Store
// =============================================================================

/// Search state shared by everything that displays products.
///
/// Construct one per catalog at startup and hand out `Arc<CatalogStore<_>>`
/// to consumers.
///
/// ## Usage
/// ```rust,ignore
/// let source = HttpCatalogSource::from_settings(&config.source)?;
/// let store = Arc::new(CatalogStore::new(source));
///
/// let matched = store.search("kopi").await?;
/// println!("{}", store.status_message());
///
/// store.select(matched.first());
/// ```
pub struct CatalogStore<S> {
    source: S,
    state: RwLock<StoreState>,
    search_gate: Mutex<()>,
}

impl<S: CatalogSource> CatalogStore<S> {
    /// Creates an idle store with no results and no selection.
    pub fn new(source: S) -> Self {
        CatalogStore {
            source,
            state: RwLock::new(StoreState::default()),
            search_gate: Mutex::new(()),
        }
    }

    /// Returns the catalog source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetches the catalog and keeps the records matching `query`.
    ///
    /// On success the matches replace `results` and the summary replaces
    /// the status message; a copy of the matches is returned. On failure the
    /// previous `results` stay, the status message becomes
    /// [`FAILURE_NOTICE`], and the failure is returned to the caller. No
    /// retries are attempted.
    pub async fn search(&self, query: &str) -> Result<Vec<ProductRecord>, RetrievalFailure> {
        let _busy = BusyGuard::enter(&self.state);
        let _turn = self.search_gate.lock().await;

        let start = Instant::now();
        debug!(query = %query, "Catalog search started");

        match self.source.fetch_all().await {
            Ok(all) => {
                let outcome = filter(all, query);

                info!(
                    query = %query,
                    count = outcome.matched.len(),
                    total = outcome.total,
                    elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Catalog search complete"
                );

                let mut state = self.write();
                state.results = outcome.matched.clone();
                state.status_message = outcome.status_message;
                Ok(outcome.matched)
            }
            Err(failure) => {
                error!(query = %query, error = %failure, "Catalog search failed");
                self.write().status_message = FAILURE_NOTICE.to_string();
                Err(failure)
            }
        }
    }
}

impl<S> CatalogStore<S> {
    /// Stores an independent copy of `record`, or clears the selection.
    pub fn select(&self, record: Option<&ProductRecord>) {
        self.write().selected = record.cloned();
    }

    /// Clears the selection.
    pub fn clear_selected(&self) {
        self.write().selected = None;
    }

    /// Matches of the last completed search.
    pub fn results(&self) -> Vec<ProductRecord> {
        self.read().results.clone()
    }

    /// True while any search on this store is queued or running.
    pub fn is_busy(&self) -> bool {
        self.read().in_flight > 0
    }

    /// Outcome text of the last completed or failed search.
    pub fn status_message(&self) -> String {
        self.read().status_message.clone()
    }

    /// The selected record, if any.
    pub fn selected(&self) -> Option<ProductRecord> {
        self.read().selected.clone()
    }

    /// Captures all observable state at once.
    pub fn snapshot(&self) -> StoreSnapshot {
        let state = self.read();
        StoreSnapshot {
            results: state.results.clone(),
            busy: state.in_flight > 0,
            status_message: state.status_message.clone(),
            selected: state.selected.clone(),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StaticCatalogSource;
    use async_trait::async_trait;
    use katalog_core::FieldValue;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Notify;

    fn drinks() -> Vec<ProductRecord> {
        vec![
            ProductRecord::new()
                .with_name("Teh Botol")
                .with_category("Minuman")
                .with_price(5000_i64)
                .with_stock(10_i64),
            ProductRecord::new()
                .with_name("Kopi")
                .with_category("Minuman")
                .with_price(15000_i64)
                .with_stock(3_i64),
        ]
    }

    fn names(records: &[ProductRecord]) -> Vec<String> {
        records.iter().map(|r| r.name_text().into_owned()).collect()
    }

    /// Replays queued responses, one per fetch.
    struct ScriptedSource {
        responses: std::sync::Mutex<VecDeque<Result<Vec<ProductRecord>, RetrievalFailure>>>,
    }

    impl ScriptedSource {
        fn new(responses: Vec<Result<Vec<ProductRecord>, RetrievalFailure>>) -> Self {
            ScriptedSource {
                responses: std::sync::Mutex::new(responses.into()),
            }
        }
    }

    #[async_trait]
    impl CatalogSource for ScriptedSource {
        async fn fetch_all(&self) -> Result<Vec<ProductRecord>, RetrievalFailure> {
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    /// Blocks every fetch until released.
    struct GatedSource {
        release: Notify,
    }

    #[async_trait]
    impl CatalogSource for GatedSource {
        async fn fetch_all(&self) -> Result<Vec<ProductRecord>, RetrievalFailure> {
            self.release.notified().await;
            Ok(drinks())
        }
    }

    /// Never answers.
    struct PendingSource;

    #[async_trait]
    impl CatalogSource for PendingSource {
        async fn fetch_all(&self) -> Result<Vec<ProductRecord>, RetrievalFailure> {
            std::future::pending().await
        }
    }

    /// Records how many fetches overlap.
    #[derive(Default)]
    struct CountingSource {
        current: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl CatalogSource for CountingSource {
        async fn fetch_all(&self) -> Result<Vec<ProductRecord>, RetrievalFailure> {
            let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.current.fetch_sub(1, Ordering::SeqCst);
            Ok(drinks())
        }
    }

    async fn wait_until_busy<S: CatalogSource>(store: &CatalogStore<S>) {
        while !store.is_busy() {
            tokio::task::yield_now().await;
        }
    }

    #[test]
    fn test_new_store_is_idle() {
        let store = CatalogStore::new(StaticCatalogSource::default());
        let snapshot = store.snapshot();
        assert!(snapshot.results.is_empty());
        assert!(!snapshot.busy);
        assert_eq!(snapshot.status_message, "");
        assert!(snapshot.selected.is_none());
    }

    #[tokio::test]
    async fn test_search_scenario() {
        let store = CatalogStore::new(StaticCatalogSource::new(drinks()));

        let matched = store.search("minuman").await.unwrap();
        assert_eq!(names(&matched), vec!["Teh Botol", "Kopi"]);
        assert_eq!(store.status_message(), "Showing 2 products (of 2).");
        assert_eq!(store.results(), matched);

        let matched = store.search("10").await.unwrap();
        assert_eq!(names(&matched), vec!["Teh Botol"]);
        assert_eq!(store.status_message(), "Showing 1 products (of 2).");

        let matched = store.search("").await.unwrap();
        assert_eq!(matched, drinks());
        assert_eq!(store.status_message(), "Showing 2 products (of 2).");
        assert!(!store.is_busy());
    }

    #[tokio::test]
    async fn test_unreadable_catalog_is_empty_not_a_failure() {
        let store = CatalogStore::new(StaticCatalogSource::from_json("<html>ok</html>"));

        let matched = store.search("kopi").await.unwrap();

        assert!(matched.is_empty());
        assert_eq!(store.status_message(), "Showing 0 products (of 0).");
        assert_ne!(store.status_message(), FAILURE_NOTICE);
        assert!(!store.is_busy());
    }

    #[tokio::test]
    async fn test_failure_keeps_results_and_sets_notice() {
        let store = CatalogStore::new(ScriptedSource::new(vec![
            Ok(drinks()),
            Err(RetrievalFailure::Connection("connection refused (os error 111)".into())),
        ]));

        store.search("kopi").await.unwrap();
        let before = store.results();
        assert_eq!(names(&before), vec!["Kopi"]);

        let err = store.search("teh").await.unwrap_err();
        assert!(matches!(err, RetrievalFailure::Connection(_)));

        assert_eq!(store.results(), before);
        assert_eq!(store.status_message(), FAILURE_NOTICE);
        assert!(!store.status_message().contains("os error"));
        assert!(!store.is_busy());
    }

    #[tokio::test]
    async fn test_busy_only_while_fetching() {
        let store = Arc::new(CatalogStore::new(GatedSource {
            release: Notify::new(),
        }));
        assert!(!store.is_busy());

        let task = tokio::spawn({
            let store = Arc::clone(&store);
            async move { store.search("kopi").await }
        });

        wait_until_busy(&store).await;
        assert!(store.snapshot().busy);

        store.source().release.notify_one();
        let matched = task.await.unwrap().unwrap();

        assert_eq!(names(&matched), vec!["Kopi"]);
        assert!(!store.is_busy());
    }

    #[tokio::test]
    async fn test_cancelled_search_releases_busy() {
        let store = Arc::new(CatalogStore::new(PendingSource));

        let task = tokio::spawn({
            let store = Arc::clone(&store);
            async move { store.search("kopi").await }
        });

        wait_until_busy(&store).await;
        task.abort();
        assert!(task.await.unwrap_err().is_cancelled());

        assert!(!store.is_busy());
        assert_eq!(store.status_message(), "");
    }

    #[tokio::test]
    async fn test_overlapping_searches_are_serialized() {
        let store = CatalogStore::new(CountingSource::default());

        let (first, second) = tokio::join!(store.search("kopi"), store.search(""));

        assert_eq!(first.unwrap().len(), 1);
        assert_eq!(second.unwrap().len(), 2);
        assert_eq!(store.source().peak.load(Ordering::SeqCst), 1);
        // The later search wins
        assert_eq!(store.status_message(), "Showing 2 products (of 2).");
        assert!(!store.is_busy());
    }

    #[test]
    fn test_select_stores_independent_copy() {
        let store = CatalogStore::new(StaticCatalogSource::default());
        let mut record = drinks().remove(0);

        store.select(Some(&record));
        record.name = Some(FieldValue::from("Teh Kotak"));
        record.price = None;
        record.extra.insert("diskon".into(), serde_json::json!(10));

        let selected = store.selected().unwrap();
        assert_eq!(selected.name_text(), "Teh Botol");
        assert_eq!(selected.price_text(), "5000");
        assert!(selected.extra.is_empty());
    }

    #[test]
    fn test_select_none_and_clear() {
        let store = CatalogStore::new(StaticCatalogSource::default());
        let record = drinks().remove(1);

        store.select(Some(&record));
        assert!(store.selected().is_some());

        store.select(None);
        assert!(store.selected().is_none());

        store.select(Some(&record));
        store.clear_selected();
        store.clear_selected();
        assert!(store.selected().is_none());
    }

    #[tokio::test]
    async fn test_search_leaves_selection_alone() {
        let store = CatalogStore::new(StaticCatalogSource::new(drinks()));
        let record = drinks().remove(1);
        store.select(Some(&record));

        store.search("teh").await.unwrap();
        assert_eq!(store.selected(), Some(record));
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let store = CatalogStore::new(StaticCatalogSource::default());
        let json = serde_json::to_value(store.snapshot()).unwrap();
        assert_eq!(json["busy"], false);
        assert_eq!(json["statusMessage"], "");
        assert!(json["selected"].is_null());
    }
}
