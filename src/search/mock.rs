use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::error::{SearchError, SearchResult};
use super::{SearchProvider, WebResult};

/// Returns a fixed result set, with failure and latency injection.
#[derive(Default)]
pub struct MockSearch {
    results: Mutex<Vec<WebResult>>,
    failing: AtomicBool,
    latency_ms: AtomicU64,
    calls: AtomicU64,
}

impl MockSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_results(results: Vec<WebResult>) -> Self {
        let search = Self::new();
        search.set_results(results);
        search
    }

    pub fn set_results(&self, results: Vec<WebResult>) {
        if let Ok(mut slot) = self.results.lock() {
            *slot = results;
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn set_latency(&self, latency: Duration) {
        self.latency_ms
            .store(latency.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchProvider for MockSearch {
    async fn search(&self, _text: &str) -> SearchResult<Vec<WebResult>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let latency = self.latency_ms.load(Ordering::SeqCst);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(SearchError::RequestFailed {
                url: "mock".to_string(),
                message: "injected failure".to_string(),
            });
        }
        self.results
            .lock()
            .map(|r| r.clone())
            .map_err(|_| SearchError::InvalidResponse {
                message: "lock poisoned".to_string(),
            })
    }

    fn name(&self) -> &str {
        "mock"
    }
}
