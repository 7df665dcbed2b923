use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::error::EmbeddingError;
use super::{HashEmbedder, QueryEmbedder};

/// [`HashEmbedder`] with failure and latency injection.
pub struct MockEmbedder {
    inner: HashEmbedder,
    failing: AtomicBool,
    latency_ms: AtomicU64,
    calls: AtomicU64,
}

impl MockEmbedder {
    pub fn new(dim: usize) -> Self {
        Self {
            inner: HashEmbedder::new(dim),
            failing: AtomicBool::new(false),
            latency_ms: AtomicU64::new(0),
            calls: AtomicU64::new(0),
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
impl QueryEmbedder for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let latency = self.latency_ms.load(Ordering::SeqCst);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(EmbeddingError::InferenceFailed {
                reason: "injected failure".to_string(),
            });
        }
        self.inner.embed(text).await
    }

    fn model(&self) -> &str {
        self.inner.model()
    }
}
