//! Search index provider trait definition.
//!
//! This module defines the abstract interface for search index operations,
//! allowing for different backend implementations (OpenSearch, Elasticsearch, etc.).

use async_trait::async_trait;

use around_shared::{GeoQuery, IndexedPost};

use crate::errors::SearchIndexError;
use crate::types::GeoSearchResult;

/// Abstracts the underlying geo-enabled search index.
///
/// Implementations are injected into `SearchIndexService` so the pipelines can
/// be tested against in-memory fakes.
///
/// # Index Initialization
///
/// `ensure_index_exists` must run during application startup, before any
/// document is written. Without the geo-point mapping it installs, geo-distance
/// queries over `location` fail.
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// Ensure the index exists with its geo-point mapping, creating it if necessary.
    ///
    /// Calling this repeatedly is safe; an existing index is left untouched.
    async fn ensure_index_exists(&self) -> Result<(), SearchIndexError>;

    /// Write a post under its id and refresh the index.
    ///
    /// When this returns `Ok`, the post is visible to subsequent `geo_search`
    /// calls from this process.
    async fn index_document(&self, document: &IndexedPost) -> Result<(), SearchIndexError>;

    /// Return every post whose location lies within the query radius.
    ///
    /// Hits are returned in the engine's order. Hits that cannot be decoded as
    /// a post are skipped and counted in `GeoSearchResult::skipped`.
    async fn geo_search(&self, query: &GeoQuery) -> Result<GeoSearchResult, SearchIndexError>;
}
