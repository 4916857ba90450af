//! Search index service implementation.
//!
//! This module provides the main service for interacting with the search index.
//! Application code uses this to index posts and run geo-distance searches.

use std::future::Future;
use std::sync::Arc;

use around_shared::{GeoQuery, IndexedPost};
use tokio::time::timeout;
use tracing::warn;

use crate::config::SearchIndexServiceConfig;
use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::types::GeoSearchResult;

/// The main service for interacting with the search index.
///
/// This is the high-level API that application code should use. It validates
/// input, bounds every backend call with the configured request timeout, and
/// delegates to a `SearchIndexProvider` for the actual backend operations.
/// Failures are returned immediately; nothing is retried.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use around_repository::{IndexConfig, OpenSearchProvider, SearchIndexService};
/// use around_shared::{Coordinate, GeoQuery, IndexedPost, Post};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = OpenSearchProvider::new("http://localhost:9200", IndexConfig::default()).await?;
/// let service = SearchIndexService::new(Arc::new(provider));
/// service.ensure_index_exists().await?;
///
/// let location = Coordinate::new(37.0, -118.0)?;
/// service
///     .index(&IndexedPost::new("post-1", Post::new("jack", "hello", location)))
///     .await?;
///
/// let result = service.geo_search(&GeoQuery::with_default_radius(location)).await?;
/// assert_eq!(result.posts.len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SearchIndexService {
    provider: Arc<dyn SearchIndexProvider>,
    config: SearchIndexServiceConfig,
}

impl SearchIndexService {
    /// Create a new SearchIndexService with default configuration.
    pub fn new(provider: Arc<dyn SearchIndexProvider>) -> Self {
        Self {
            provider,
            config: SearchIndexServiceConfig::default(),
        }
    }

    /// Create a new SearchIndexService with custom configuration.
    pub fn with_config(
        provider: Arc<dyn SearchIndexProvider>,
        config: SearchIndexServiceConfig,
    ) -> Self {
        Self { provider, config }
    }

    async fn bounded<T, F>(&self, operation: &'static str, call: F) -> Result<T, SearchIndexError>
    where
        F: Future<Output = Result<T, SearchIndexError>>,
    {
        let limit = self.config.request_timeout;
        match timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(operation, timeout_ms = limit.as_millis() as u64, "Search index call timed out");
                Err(SearchIndexError::timeout(operation, limit))
            }
        }
    }

    /// Ensure the post index exists with its geo-point mapping.
    ///
    /// Idempotent; intended to run once at startup.
    pub async fn ensure_index_exists(&self) -> Result<(), SearchIndexError> {
        self.bounded("ensure_index_exists", self.provider.ensure_index_exists())
            .await
    }

    /// Index a post under its id.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The post is stored and visible to subsequent searches
    /// * `Err(SearchIndexError::ValidationError)` - If the id is empty
    /// * `Err(SearchIndexError)` - If the backend rejects the write or times out
    pub async fn index(&self, document: &IndexedPost) -> Result<(), SearchIndexError> {
        if document.id.trim().is_empty() {
            return Err(SearchIndexError::validation("Document id is required"));
        }

        self.bounded("index_document", self.provider.index_document(document))
            .await
    }

    /// Run a geo-distance search.
    ///
    /// An empty result is not an error.
    pub async fn geo_search(&self, query: &GeoQuery) -> Result<GeoSearchResult, SearchIndexError> {
        self.bounded("geo_search", self.provider.geo_search(query))
            .await
    }
}
