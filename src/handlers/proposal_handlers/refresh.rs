use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::errors::AppResult;
use crate::models::proposal::{ProposalListItem, ProposalSource};

/// The response to one fetch request.
#[derive(Debug)]
pub struct FetchedPage {
    /// Number of the request this page answers; later requests have higher numbers.
    pub generation: u64,
    pub start: String,
    pub end: String,
    pub result: AppResult<Vec<ProposalListItem>>,
}

type LatestPage = Option<Arc<FetchedPage>>;

/// Fetches proposal pages after a short quiet period. Only the page for the
/// most recent request is published; responses to superseded requests are dropped.
pub struct DebouncedFetcher<P> {
    source: Arc<P>,
    debounce: Duration,
    limit: usize,
    generation: Arc<AtomicU64>,
    tx: Arc<watch::Sender<LatestPage>>,
}

impl<P: ProposalSource + 'static> DebouncedFetcher<P> {
    pub fn new(source: Arc<P>, debounce: Duration, limit: usize) -> Self {
        let (tx, _rx) = watch::channel(None);
        DebouncedFetcher {
            source,
            debounce,
            limit,
            generation: Arc::new(AtomicU64::new(0)),
            tx: Arc::new(tx),
        }
    }

    /// Number of the most recent request, 0 if none was made yet.
    pub fn latest_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Mark every outstanding request as stale without starting a new one.
    /// Returns the new generation.
    pub fn supersede(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn request(&self, start: &str, end: &str) -> JoinHandle<()> {
        let generation = self.supersede();
        let latest = Arc::clone(&self.generation);
        let source = Arc::clone(&self.source);
        let tx = Arc::clone(&self.tx);
        let debounce = self.debounce;
        let limit = self.limit;
        let start = start.to_string();
        let end = end.to_string();

        tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if latest.load(Ordering::SeqCst) != generation {
                log::debug!("Request {generation} superseded before fetching");
                return;
            }
            let result = source.fetch(&start, &end, limit).await;
            if latest.load(Ordering::SeqCst) != generation {
                log::debug!("Discarding response to superseded request {generation}");
                return;
            }
            if let Err(e) = &result {
                log::warn!("Proposal fetch {generation} for {start} to {end} failed: {e}");
            }
            tx.send_replace(Some(Arc::new(FetchedPage { generation, start, end, result })));
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<LatestPage> {
        self.tx.subscribe()
    }

    /// Call `callback` for every page published from now on, until the
    /// returned subscription is dropped.
    pub fn on_result<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&FetchedPage) + Send + 'static,
    {
        let mut rx = self.subscribe();
        let handle = tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                // Clone out so the channel isn't locked while the callback runs.
                let page = rx.borrow_and_update().clone();
                if let Some(page) = page {
                    callback(&page);
                }
            }
        });
        Subscription { handle }
    }
}

/// A running listener task. Dropping it stops the listener.
#[must_use = "dropping a Subscription stops it immediately"]
pub struct Subscription {
    handle: JoinHandle<()>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
