//! Query state for the product list.
//!
//! One authoritative `ListQuery` per list instance. Every user trigger
//! (typing a search term, flipping a page, clicking a sort header)
//! replaces exactly one piece of that state, and each replacement issues
//! exactly one fetch against the fully merged state. Requests carry
//! sequence numbers; whichever request was issued last owns the committed
//! state, no matter which response lands first.

use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use crate::api::{ApiError, CatalogBackend};
use crate::models::{ListQuery, PersistedProduct, SortDirection, SortField};

/// What happened to a trigger once its response landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response belonged to the most recently issued request and was
    /// committed to the displayed list.
    Committed,
    /// A newer request was issued while this one was in flight; the
    /// response (success or failure) was discarded.
    Superseded,
}

struct ListState {
    /// Query whose response the table currently shows.
    committed: ListQuery,
    /// Latest requested query; new triggers merge into this.
    target: ListQuery,
    rows: Vec<PersistedProduct>,
    latest_seq: u64,
    in_flight: u32,
}

pub struct ProductList {
    backend: Arc<dyn CatalogBackend>,
    state: Mutex<ListState>,
}

impl ProductList {
    pub fn new(backend: Arc<dyn CatalogBackend>) -> Self {
        Self::with_query(backend, ListQuery::default())
    }

    pub fn with_query(backend: Arc<dyn CatalogBackend>, initial: ListQuery) -> Self {
        Self {
            backend,
            state: Mutex::new(ListState {
                committed: initial.clone(),
                target: initial,
                rows: Vec::new(),
                latest_seq: 0,
                in_flight: 0,
            }),
        }
    }

    /// Re-issue the current query unchanged (list-page mount).
    pub async fn refresh(&self) -> Result<FetchOutcome, ApiError> {
        self.trigger(|_| {}).await
    }

    /// Replace the search term. Always snaps back to the first page; the
    /// active sort is untouched.
    pub async fn set_search(&self, term: &str) -> Result<FetchOutcome, ApiError> {
        let term = term.to_string();
        self.trigger(move |query| {
            query.search = term;
            query.page = 1;
        })
        .await
    }

    /// Replace page and page size; search and sort are untouched.
    pub async fn set_page(&self, page: u32, page_size: u32) -> Result<FetchOutcome, ApiError> {
        self.trigger(move |query| {
            query.page = page.max(1);
            query.page_size = page_size.max(1);
        })
        .await
    }

    /// Replace the sort; `None` clears both field and direction. Search
    /// and page are untouched.
    pub async fn set_sort(
        &self,
        sort: Option<(SortField, SortDirection)>,
    ) -> Result<FetchOutcome, ApiError> {
        self.trigger(move |query| query.sort = sort).await
    }

    /// Committed query state (what the table reflects).
    pub fn query(&self) -> ListQuery {
        self.state.lock().unwrap().committed.clone()
    }

    /// Current page contents; replaced wholesale on every committed
    /// response, the backend owns ordering.
    pub fn products(&self) -> Vec<PersistedProduct> {
        self.state.lock().unwrap().rows.clone()
    }

    /// True from the first issued request until the last in-flight one
    /// resolves.
    pub fn is_loading(&self) -> bool {
        self.state.lock().unwrap().in_flight > 0
    }

    async fn trigger<F>(&self, change: F) -> Result<FetchOutcome, ApiError>
    where
        F: FnOnce(&mut ListQuery),
    {
        let (snapshot, seq) = {
            let mut state = self.state.lock().unwrap();
            change(&mut state.target);
            state.latest_seq += 1;
            state.in_flight += 1;
            (state.target.clone(), state.latest_seq)
        };

        let result = self.backend.list_products(&snapshot).await;

        let mut state = self.state.lock().unwrap();
        state.in_flight -= 1;

        if seq != state.latest_seq {
            // A newer request owns the state now, whatever this one says.
            debug!(
                "Discarding stale product list response (seq {}, latest {})",
                seq, state.latest_seq
            );
            return Ok(FetchOutcome::Superseded);
        }

        match result {
            Ok(rows) => {
                state.committed = snapshot;
                state.rows = rows;
                Ok(FetchOutcome::Committed)
            }
            Err(err) => {
                warn!("Product list fetch failed: {}", err);
                // Keep the previous rows on screen and forget the
                // provisional query so the next trigger merges against
                // committed state.
                state.target = state.committed.clone();
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        CreateProductPayload, ReferenceItem, UpdateProductPayload,
    };
    use async_trait::async_trait;
    use std::collections::{HashSet, VecDeque};
    use std::time::Duration;

    /// Backend fake: records every list query, answers after a scripted
    /// per-call delay, and tags each response with its call number so
    /// tests can tell whose rows got committed.
    #[derive(Default)]
    struct FakeBackend {
        log: Mutex<Vec<ListQuery>>,
        delays: Mutex<VecDeque<Duration>>,
        failing_calls: Mutex<HashSet<usize>>,
    }

    impl FakeBackend {
        fn with_delays(delays: &[u64]) -> Self {
            Self {
                delays: Mutex::new(delays.iter().map(|ms| Duration::from_millis(*ms)).collect()),
                ..Default::default()
            }
        }

        fn fail_call(&self, call: usize) {
            self.failing_calls.lock().unwrap().insert(call);
        }

        fn queries(&self) -> Vec<ListQuery> {
            self.log.lock().unwrap().clone()
        }

        fn row(call: usize) -> PersistedProduct {
            PersistedProduct {
                id: call as i64,
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl CatalogBackend for FakeBackend {
        async fn categories(&self) -> Result<Vec<ReferenceItem>, ApiError> {
            unimplemented!("not exercised by list tests")
        }

        async fn brands(&self) -> Result<Vec<ReferenceItem>, ApiError> {
            unimplemented!("not exercised by list tests")
        }

        async fn stores(&self) -> Result<Vec<ReferenceItem>, ApiError> {
            unimplemented!("not exercised by list tests")
        }

        async fn list_products(
            &self,
            query: &ListQuery,
        ) -> Result<Vec<PersistedProduct>, ApiError> {
            let call = {
                let mut log = self.log.lock().unwrap();
                log.push(query.clone());
                log.len()
            };

            let delay = self
                .delays
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Duration::ZERO);
            tokio::time::sleep(delay).await;

            if self.failing_calls.lock().unwrap().contains(&call) {
                return Err(ApiError::Http {
                    status: 500,
                    body: "boom".to_string(),
                });
            }

            Ok(vec![Self::row(call)])
        }

        async fn product(&self, _id: i64) -> Result<PersistedProduct, ApiError> {
            unimplemented!("not exercised by list tests")
        }

        async fn create_product(
            &self,
            _payload: &CreateProductPayload,
        ) -> Result<PersistedProduct, ApiError> {
            unimplemented!("not exercised by list tests")
        }

        async fn update_product(
            &self,
            _id: i64,
            _payload: &UpdateProductPayload,
        ) -> Result<PersistedProduct, ApiError> {
            unimplemented!("not exercised by list tests")
        }
    }

    fn setup() -> (Arc<FakeBackend>, ProductList) {
        let backend = Arc::new(FakeBackend::default());
        let list = ProductList::new(backend.clone());
        (backend, list)
    }

    #[tokio::test]
    async fn test_search_resets_page_keeps_sort() {
        let (backend, list) = setup();

        list.set_sort(Some((SortField::Name, SortDirection::Asc)))
            .await
            .unwrap();
        list.set_page(3, 20).await.unwrap();
        list.set_search("milk").await.unwrap();

        let last = backend.queries().last().unwrap().clone();
        assert_eq!(last.search, "milk");
        assert_eq!(last.page, 1);
        assert_eq!(last.page_size, 20);
        assert_eq!(last.sort, Some((SortField::Name, SortDirection::Asc)));
        assert_eq!(list.query(), last);
    }

    #[tokio::test]
    async fn test_page_change_keeps_search_and_sort() {
        let (backend, list) = setup();

        list.set_search("tea").await.unwrap();
        list.set_sort(Some((SortField::CreatedAt, SortDirection::Desc)))
            .await
            .unwrap();
        list.set_page(4, 10).await.unwrap();

        let last = backend.queries().last().unwrap().clone();
        assert_eq!(last.search, "tea");
        assert_eq!(last.page, 4);
        assert_eq!(last.sort, Some((SortField::CreatedAt, SortDirection::Desc)));
    }

    #[tokio::test]
    async fn test_clearing_sort_clears_both_halves() {
        let (backend, list) = setup();

        list.set_sort(Some((SortField::Barcode, SortDirection::Desc)))
            .await
            .unwrap();
        list.set_sort(None).await.unwrap();

        let last = backend.queries().last().unwrap().clone();
        assert!(last.sort.is_none());
        assert!(list.query().sort.is_none());
    }

    #[tokio::test]
    async fn test_stale_response_does_not_overwrite_newer_state() {
        // Call 1 answers slowly, call 2 quickly: the first-issued request
        // resolves last and must be discarded.
        let backend = Arc::new(FakeBackend::with_delays(&[80, 10]));
        let list = ProductList::new(backend.clone());

        let (first, second) = tokio::join!(list.set_search("slow"), async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            list.set_page(2, 10).await
        });

        assert_eq!(first.unwrap(), FetchOutcome::Superseded);
        assert_eq!(second.unwrap(), FetchOutcome::Committed);

        // Rows are call 2's, and committed state reflects the merged
        // second query (search survived, page advanced).
        let rows = list.products();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, 2);
        assert_eq!(list.query().page, 2);
        assert_eq!(list.query().search, "slow");
    }

    #[tokio::test]
    async fn test_failure_keeps_rows_and_rolls_back_query() {
        let (backend, list) = setup();

        list.set_search("milk").await.unwrap();
        assert_eq!(list.products()[0].id, 1);

        backend.fail_call(2);
        let err = list.set_page(5, 10).await.unwrap_err();
        assert!(matches!(err, ApiError::Http { status: 500, .. }));

        // Previous rows still displayed, page never committed.
        assert_eq!(list.products()[0].id, 1);
        assert_eq!(list.query().page, 1);

        // The next trigger merges against the rolled-back state.
        list.set_sort(Some((SortField::Id, SortDirection::Asc)))
            .await
            .unwrap();
        let last = backend.queries().last().unwrap().clone();
        assert_eq!(last.page, 1);
        assert_eq!(last.search, "milk");
    }

    #[tokio::test]
    async fn test_stale_failure_is_discarded_silently() {
        let backend = Arc::new(FakeBackend::with_delays(&[80, 10]));
        backend.fail_call(1);
        let list = ProductList::new(backend.clone());

        let (first, second) = tokio::join!(list.set_search("a"), async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            list.set_search("b").await
        });

        // The failed request was already superseded; no error surfaces
        // and no rollback disturbs the newer committed state.
        assert_eq!(first.unwrap(), FetchOutcome::Superseded);
        assert_eq!(second.unwrap(), FetchOutcome::Committed);
        assert_eq!(list.query().search, "b");
    }

    #[tokio::test]
    async fn test_loading_spans_overlapping_requests() {
        let backend = Arc::new(FakeBackend::with_delays(&[60, 30]));
        let list = ProductList::new(backend.clone());

        let ((), first, second) = tokio::join!(
            async {
                tokio::time::sleep(Duration::from_millis(40)).await;
                // call 2 already resolved, call 1 still pending
                assert!(list.is_loading());
            },
            list.refresh(),
            async {
                tokio::time::sleep(Duration::from_millis(5)).await;
                list.refresh().await
            }
        );

        first.unwrap();
        second.unwrap();
        assert!(!list.is_loading());
    }

    #[tokio::test]
    async fn test_last_issued_params_equal_merged_state() {
        let (backend, list) = setup();

        list.set_page(2, 25).await.unwrap();
        list.set_sort(Some((SortField::BrandName, SortDirection::Desc)))
            .await
            .unwrap();
        list.set_search("rice").await.unwrap();
        list.set_page(3, 25).await.unwrap();

        let expected = ListQuery {
            search: "rice".to_string(),
            page: 3,
            page_size: 25,
            sort: Some((SortField::BrandName, SortDirection::Desc)),
        };
        assert_eq!(backend.queries().last().unwrap(), &expected);
        assert_eq!(list.query(), expected);
    }
}
