use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use crate::vectordb::{IndexedDocument, KnowledgeIndex, SearchFilters, SearchHit, VectorDbError};

/// In-memory knowledge index with failure and latency injection.
#[derive(Default)]
pub struct MockKnowledgeIndex {
    collections: RwLock<HashMap<String, Vec<MockStoredDocument>>>,
    failing: AtomicBool,
    latency_ms: AtomicU64,
    search_calls: AtomicU64,
    scroll_calls: AtomicU64,
}

#[derive(Clone)]
struct MockStoredDocument {
    vector: Vec<f32>,
    document: IndexedDocument,
}

impl MockKnowledgeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a document to `collection`, creating it if needed.
    pub fn insert(&self, collection: &str, vector: Vec<f32>, document: IndexedDocument) {
        if let Ok(mut collections) = self.collections.write() {
            collections
                .entry(collection.to_string())
                .or_default()
                .push(MockStoredDocument { vector, document });
        }
    }

    /// Creates an empty collection.
    pub fn create_collection(&self, collection: &str) {
        if let Ok(mut collections) = self.collections.write() {
            collections.entry(collection.to_string()).or_default();
        }
    }

    pub fn document_count(&self, collection: &str) -> Option<usize> {
        self.collections
            .read()
            .ok()?
            .get(collection)
            .map(|docs| docs.len())
    }

    /// Makes every subsequent call fail.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Delays every subsequent call by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        self.latency_ms
            .store(latency.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn search_calls(&self) -> u64 {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn scroll_calls(&self) -> u64 {
        self.scroll_calls.load(Ordering::SeqCst)
    }

    async fn simulate(&self) {
        let latency = self.latency_ms.load(Ordering::SeqCst);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }
    }

    fn injected_failure(&self, collection: &str) -> Option<VectorDbError> {
        self.failing
            .load(Ordering::SeqCst)
            .then(|| VectorDbError::SearchFailed {
                collection: collection.to_string(),
                message: "injected failure".to_string(),
            })
    }
}

impl KnowledgeIndex for MockKnowledgeIndex {
    async fn is_ready(&self, collection: &str) -> Result<(), VectorDbError> {
        if let Some(err) = self.injected_failure(collection) {
            return Err(err);
        }
        let collections =
            self.collections
                .read()
                .map_err(|_| VectorDbError::ConnectionFailed {
                    url: "mock".to_string(),
                    message: "lock poisoned".to_string(),
                })?;

        if collections.contains_key(collection) {
            Ok(())
        } else {
            Err(VectorDbError::CollectionNotFound {
                collection: collection.to_string(),
            })
        }
    }

    async fn search(
        &self,
        collection: &str,
        query: Vec<f32>,
        limit: u64,
        threshold: Option<f32>,
        filters: &SearchFilters,
    ) -> Result<Vec<SearchHit>, VectorDbError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate().await;
        if let Some(err) = self.injected_failure(collection) {
            return Err(err);
        }

        let collections = self
            .collections
            .read()
            .map_err(|_| VectorDbError::SearchFailed {
                collection: collection.to_string(),
                message: "lock poisoned".to_string(),
            })?;

        let docs = collections
            .get(collection)
            .ok_or_else(|| VectorDbError::CollectionNotFound {
                collection: collection.to_string(),
            })?;

        if let Some(first) = docs.first()
            && first.vector.len() != query.len()
        {
            return Err(VectorDbError::InvalidDimension {
                expected: first.vector.len(),
                actual: query.len(),
            });
        }

        let mut hits: Vec<SearchHit> = docs
            .iter()
            .filter(|stored| filters.accepts(&stored.document))
            .map(|stored| SearchHit {
                document: stored.document.clone(),
                score: cosine_similarity(&query, &stored.vector),
            })
            .filter(|hit| threshold.is_none_or(|t| hit.score >= t))
            .collect();

        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        hits.truncate(limit as usize);
        Ok(hits)
    }

    async fn scroll(
        &self,
        collection: &str,
        limit: u32,
        filters: &SearchFilters,
    ) -> Result<Vec<IndexedDocument>, VectorDbError> {
        self.scroll_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate().await;
        if self.failing.load(Ordering::SeqCst) {
            return Err(VectorDbError::ScrollFailed {
                collection: collection.to_string(),
                message: "injected failure".to_string(),
            });
        }

        let collections = self
            .collections
            .read()
            .map_err(|_| VectorDbError::ScrollFailed {
                collection: collection.to_string(),
                message: "lock poisoned".to_string(),
            })?;

        let docs = collections
            .get(collection)
            .ok_or_else(|| VectorDbError::CollectionNotFound {
                collection: collection.to_string(),
            })?;

        Ok(docs
            .iter()
            .filter(|stored| filters.accepts(&stored.document))
            .take(limit as usize)
            .map(|stored| stored.document.clone())
            .collect())
    }
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}
