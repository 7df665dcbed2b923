use qdrant_client::Qdrant;
use qdrant_client::qdrant::{ScrollPointsBuilder, SearchPointsBuilder};
use tracing::debug;

use super::error::VectorDbError;
use super::model::{IndexedDocument, SearchFilters, SearchHit};

#[derive(Clone)]
/// Knowledge index backed by a Qdrant collection.
pub struct QdrantIndex {
    client: Qdrant,
    url: String,
}

impl QdrantIndex {
    /// Creates a client for `url`.
    pub fn new(url: &str) -> Result<Self, VectorDbError> {
        let client =
            Qdrant::from_url(url)
                .build()
                .map_err(|e| VectorDbError::ConnectionFailed {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    /// Returns the configured URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Performs a basic health check request.
    pub async fn health_check(&self) -> Result<(), VectorDbError> {
        self.client
            .health_check()
            .await
            .map_err(|e| VectorDbError::ConnectionFailed {
                url: self.url.clone(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    /// Returns `true` if the collection exists.
    pub async fn collection_exists(&self, name: &str) -> Result<bool, VectorDbError> {
        self.client
            .collection_exists(name)
            .await
            .map_err(|e| VectorDbError::ConnectionFailed {
                url: self.url.clone(),
                message: e.to_string(),
            })
    }

    /// Similarity search with an optional score threshold and payload filters.
    pub async fn search(
        &self,
        collection: &str,
        query: Vec<f32>,
        limit: u64,
        threshold: Option<f32>,
        filters: &SearchFilters,
    ) -> Result<Vec<SearchHit>, VectorDbError> {
        let mut search_builder =
            SearchPointsBuilder::new(collection, query, limit).with_payload(true);

        if let Some(threshold) = threshold {
            search_builder = search_builder.score_threshold(threshold);
        }
        if let Some(filter) = filters.to_qdrant() {
            search_builder = search_builder.filter(filter);
        }

        let response = self
            .client
            .search_points(search_builder)
            .await
            .map_err(|e| VectorDbError::SearchFailed {
                collection: collection.to_string(),
                message: e.to_string(),
            })?;

        let hits: Vec<SearchHit> = response
            .result
            .into_iter()
            .filter_map(SearchHit::from_scored_point)
            .collect();

        debug!(collection, hits = hits.len(), "Qdrant search complete");
        Ok(hits)
    }

    /// Reads one page of the collection.
    pub async fn scroll(
        &self,
        collection: &str,
        limit: u32,
        filters: &SearchFilters,
    ) -> Result<Vec<IndexedDocument>, VectorDbError> {
        let mut scroll_builder = ScrollPointsBuilder::new(collection)
            .limit(limit)
            .with_payload(true);

        if let Some(filter) = filters.to_qdrant() {
            scroll_builder = scroll_builder.filter(filter);
        }

        let response = self
            .client
            .scroll(scroll_builder)
            .await
            .map_err(|e| VectorDbError::ScrollFailed {
                collection: collection.to_string(),
                message: e.to_string(),
            })?;

        let documents: Vec<IndexedDocument> = response
            .result
            .into_iter()
            .filter_map(IndexedDocument::from_retrieved_point)
            .collect();

        debug!(collection, documents = documents.len(), "Qdrant scroll complete");
        Ok(documents)
    }
}

/// Read-only async interface over the knowledge base.
pub trait KnowledgeIndex: Send + Sync {
    /// Succeeds when the backend is reachable and `collection` exists.
    fn is_ready(
        &self,
        collection: &str,
    ) -> impl std::future::Future<Output = Result<(), VectorDbError>> + Send;

    /// Returns hits sorted by descending score.
    fn search(
        &self,
        collection: &str,
        query: Vec<f32>,
        limit: u64,
        threshold: Option<f32>,
        filters: &SearchFilters,
    ) -> impl std::future::Future<Output = Result<Vec<SearchHit>, VectorDbError>> + Send;

    /// Returns at most `limit` documents matching `filters`.
    fn scroll(
        &self,
        collection: &str,
        limit: u32,
        filters: &SearchFilters,
    ) -> impl std::future::Future<Output = Result<Vec<IndexedDocument>, VectorDbError>> + Send;
}

impl KnowledgeIndex for QdrantIndex {
    async fn is_ready(&self, collection: &str) -> Result<(), VectorDbError> {
        self.health_check().await?;
        if !self.collection_exists(collection).await? {
            return Err(VectorDbError::CollectionNotFound {
                collection: collection.to_string(),
            });
        }
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        query: Vec<f32>,
        limit: u64,
        threshold: Option<f32>,
        filters: &SearchFilters,
    ) -> Result<Vec<SearchHit>, VectorDbError> {
        self.search(collection, query, limit, threshold, filters)
            .await
    }

    async fn scroll(
        &self,
        collection: &str,
        limit: u32,
        filters: &SearchFilters,
    ) -> Result<Vec<IndexedDocument>, VectorDbError> {
        self.scroll(collection, limit, filters).await
    }
}

impl<T: KnowledgeIndex> KnowledgeIndex for std::sync::Arc<T> {
    async fn is_ready(&self, collection: &str) -> Result<(), VectorDbError> {
        (**self).is_ready(collection).await
    }

    async fn search(
        &self,
        collection: &str,
        query: Vec<f32>,
        limit: u64,
        threshold: Option<f32>,
        filters: &SearchFilters,
    ) -> Result<Vec<SearchHit>, VectorDbError> {
        (**self)
            .search(collection, query, limit, threshold, filters)
            .await
    }

    async fn scroll(
        &self,
        collection: &str,
        limit: u32,
        filters: &SearchFilters,
    ) -> Result<Vec<IndexedDocument>, VectorDbError> {
        (**self).scroll(collection, limit, filters).await
    }
}
