//! Named query cache.
//!
//! One entry per query name, holding the latest fetched value, the in-flight
//! state, and a broadcast channel for subscribers. The cache is an explicit
//! constructed handle passed to every consumer - never a global - and one
//! handle is expected to live for the whole process.
//!
//! Invariants:
//! - at most one fetch in flight per name; concurrent subscribers coalesce
//!   onto it rather than issuing duplicates
//! - only `invalidate` and fetch completion mutate an entry
//! - fetch failures keep the previous data visible (stale-but-available)

use crate::error::FetchError;
use futures_util::future::BoxFuture;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::{debug, trace};

/// Query name for the workspace list, the one read this system performs.
pub const WORKSPACES_QUERY: &str = "workspaces";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    Idle,
    Loading,
    Success,
    Error,
}

/// When a new subscriber may trust an existing successful entry.
///
/// The workspace query uses `AlwaysRefetch`: peer synchronization mutates
/// the backend out-of-band, so cached presence says nothing about freshness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreshnessPolicy {
    TrustCache,
    AlwaysRefetch,
}

/// Point-in-time view of one query entry.
#[derive(Debug)]
pub struct QuerySnapshot<T> {
    pub status: QueryStatus,
    pub data: Option<Arc<T>>,
    pub error: Option<FetchError>,
}

impl<T> QuerySnapshot<T> {
    fn idle() -> Self {
        Self {
            status: QueryStatus::Idle,
            data: None,
            error: None,
        }
    }
}

// Manual impl: T itself need not be Clone, the data is shared via Arc.
impl<T> Clone for QuerySnapshot<T> {
    fn clone(&self) -> Self {
        Self {
            status: self.status,
            data: self.data.clone(),
            error: self.error.clone(),
        }
    }
}

/// The read operation behind a named query.
pub type QueryFetcher<T> =
    Arc<dyn Fn() -> BoxFuture<'static, Result<T, FetchError>> + Send + Sync>;

/// Wrap an async closure as a [`QueryFetcher`].
pub fn query_fetcher<T, F, Fut>(f: F) -> QueryFetcher<T>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, FetchError>> + Send + 'static,
{
    Arc::new(move || Box::pin(f()))
}

struct QueryEntry<T> {
    status: QueryStatus,
    data: Option<Arc<T>>,
    error: Option<FetchError>,
    fetcher: QueryFetcher<T>,
    stale: bool,
    in_flight: bool,
    tx: watch::Sender<QuerySnapshot<T>>,
}

impl<T> QueryEntry<T> {
    fn new(fetcher: QueryFetcher<T>) -> Self {
        let (tx, _rx) = watch::channel(QuerySnapshot::idle());
        Self {
            status: QueryStatus::Idle,
            data: None,
            error: None,
            fetcher,
            stale: false,
            in_flight: false,
            tx,
        }
    }

    fn snapshot(&self) -> QuerySnapshot<T> {
        QuerySnapshot {
            status: self.status,
            data: self.data.clone(),
            error: self.error.clone(),
        }
    }

    fn publish(&self) {
        self.tx.send_replace(self.snapshot());
    }
}

/// Process-wide cache of named query results.
///
/// Cheap to clone; all clones share the same entries.
pub struct QueryCache<T> {
    inner: Arc<Mutex<HashMap<String, QueryEntry<T>>>>,
}

impl<T> Clone for QueryCache<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for QueryCache<T>
where
    T: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> QueryCache<T>
where
    T: Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Register interest in a named query.
    ///
    /// Creates the entry on first use and starts a fetch. With
    /// [`FreshnessPolicy::TrustCache`] a fresh successful entry is returned
    /// as-is; with [`FreshnessPolicy::AlwaysRefetch`] every subscription
    /// triggers a fetch. Either way a subscription arriving while a fetch is
    /// in flight attaches to it instead of spawning a second one.
    ///
    /// Never fails: fetch errors surface through the returned subscription's
    /// snapshots, not as control flow.
    pub fn subscribe(
        &self,
        name: &str,
        fetcher: QueryFetcher<T>,
        policy: FreshnessPolicy,
    ) -> QuerySubscription<T> {
        let mut entries = self.lock();
        let entry = entries
            .entry(name.to_string())
            .or_insert_with(|| QueryEntry::new(fetcher.clone()));
        // Latest subscriber's fetcher wins for subsequent re-fetches.
        entry.fetcher = fetcher;

        let rx = entry.tx.subscribe();

        let needs_fetch = if entry.in_flight {
            trace!(query = name, "subscription attached to in-flight fetch");
            false
        } else {
            match policy {
                FreshnessPolicy::TrustCache => {
                    entry.stale || entry.status != QueryStatus::Success
                }
                FreshnessPolicy::AlwaysRefetch => true,
            }
        };
        if needs_fetch {
            self.start_fetch(name, entry);
        }

        QuerySubscription { rx }
    }

    /// Mark an entry stale.
    ///
    /// With subscribers mounted the re-fetch starts immediately; with none,
    /// the data is discarded and the next subscription fetches lazily. An
    /// invalidation arriving while a fetch is in flight schedules exactly
    /// one follow-up fetch after that completion.
    pub fn invalidate(&self, name: &str) {
        let mut entries = self.lock();
        let Some(entry) = entries.get_mut(name) else {
            return;
        };
        debug!(query = name, "query invalidated");
        if entry.in_flight {
            entry.stale = true;
            return;
        }
        if entry.tx.receiver_count() > 0 {
            self.start_fetch(name, entry);
        } else {
            entry.stale = true;
            entry.status = QueryStatus::Idle;
            entry.data = None;
            entry.error = None;
        }
    }

    /// Current snapshot without mounting a subscription. `Idle` for names
    /// never subscribed to.
    pub fn peek(&self, name: &str) -> QuerySnapshot<T> {
        self.lock()
            .get(name)
            .map(QueryEntry::snapshot)
            .unwrap_or_else(QuerySnapshot::idle)
    }

    /// Drop every entry. Intended for tests that reuse one cache handle.
    pub fn reset(&self) {
        self.lock().clear();
    }

    fn start_fetch(&self, name: &str, entry: &mut QueryEntry<T>) {
        entry.in_flight = true;
        entry.stale = false;
        entry.status = QueryStatus::Loading;
        entry.publish();
        debug!(query = name, "query fetch started");

        let cache = self.clone();
        let fetcher = Arc::clone(&entry.fetcher);
        let name = name.to_string();
        tokio::spawn(async move {
            let result = fetcher().await;
            cache.complete(&name, result);
        });
    }

    fn complete(&self, name: &str, result: Result<T, FetchError>) {
        let mut entries = self.lock();
        let Some(entry) = entries.get_mut(name) else {
            return;
        };
        entry.in_flight = false;
        match result {
            Ok(value) => {
                debug!(query = name, "query fetch succeeded");
                entry.status = QueryStatus::Success;
                entry.data = Some(Arc::new(value));
                entry.error = None;
            }
            Err(err) => {
                // Previous data stays visible; the error rides alongside it.
                debug!(query = name, error = %err, "query fetch failed");
                entry.status = QueryStatus::Error;
                entry.error = Some(err);
            }
        }
        entry.publish();

        if entry.stale {
            if entry.tx.receiver_count() > 0 {
                self.start_fetch(name, entry);
            } else {
                entry.stale = false;
                entry.status = QueryStatus::Idle;
                entry.data = None;
                entry.error = None;
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, QueryEntry<T>>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A mounted subscription to one named query.
///
/// Dropping it unmounts the subscriber; an in-flight fetch still completes
/// against the shared entry.
pub struct QuerySubscription<T> {
    rx: watch::Receiver<QuerySnapshot<T>>,
}

impl<T> QuerySubscription<T> {
    pub fn snapshot(&self) -> QuerySnapshot<T> {
        self.rx.borrow().clone()
    }

    /// Wait for the next published snapshot and return it. Returns the
    /// current snapshot if the cache itself has been torn down.
    pub async fn changed(&mut self) -> QuerySnapshot<T> {
        let _ = self.rx.changed().await;
        self.rx.borrow_and_update().clone()
    }
}
