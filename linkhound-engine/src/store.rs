use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Concurrency-safe set of normalized URLs already scheduled or recorded.
///
/// `insert_if_absent` is the single deduplication gate for the whole run:
/// whichever task wins the insertion owns the URL. The set only grows; it is
/// discarded with the run.
#[derive(Clone, Default)]
pub struct VisitedSet {
    inner: Arc<Mutex<HashSet<String>>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically inserts the URL, returning true iff it was not present.
    pub async fn insert_if_absent(&self, url: &str) -> bool {
        self.inner.lock().await.insert(url.to_string())
    }

    pub async fn contains(&self, url: &str) -> bool {
        self.inner.lock().await.contains(url)
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }
}

/// Append-only ordered collection of accepted links.
#[derive(Clone, Default)]
pub struct ResultLog {
    inner: Arc<Mutex<Vec<String>>>,
}

impl ResultLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record(&self, url: &str) {
        self.inner.lock().await.push(url.to_string());
    }

    pub async fn snapshot(&self) -> Vec<String> {
        self.inner.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }
}
