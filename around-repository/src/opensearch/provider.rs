//! OpenSearch provider implementation.
//!
//! This module provides the concrete implementation of `SearchIndexProvider`
//! using the OpenSearch Rust crate.

use async_trait::async_trait;
use opensearch::{
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesCreateParts, IndicesExistsParts},
    params::Refresh,
    IndexParts, OpenSearch, SearchParts,
};
use serde_json::Value;
use tracing::{debug, error, info};
use url::Url;

use around_shared::{GeoQuery, IndexedPost};

use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::opensearch::index_config::{get_index_settings, IndexConfig};
use crate::opensearch::query::geo_distance_query;
use crate::types::GeoSearchResult;
use crate::utils;

/// Error type reported by the engine when a concurrent creator won the race.
const ALREADY_EXISTS: &str = "resource_already_exists_exception";

/// OpenSearch provider implementation.
///
/// Stores posts in a single index whose `location` field is mapped as a
/// geo-point, and answers geo-distance queries against it.
///
/// # Example
///
/// ```ignore
/// use around_repository::opensearch::{IndexConfig, OpenSearchProvider};
/// use around_shared::{Coordinate, GeoQuery, IndexedPost, Post};
///
/// let provider = OpenSearchProvider::new("http://localhost:9200", IndexConfig::default()).await?;
/// provider.ensure_index_exists().await?;
///
/// let location = Coordinate::new(37.0, -118.0)?;
/// let post = Post::new("jack", "hello", location);
/// provider.index_document(&IndexedPost::new("post-1", post)).await?;
///
/// let result = provider.geo_search(&GeoQuery::with_default_radius(location)).await?;
/// ```
pub struct OpenSearchProvider {
    client: OpenSearch,
    index_config: IndexConfig,
}

impl OpenSearchProvider {
    /// Create a new OpenSearch provider connected to the specified URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    /// * `index_config` - The index name and hit cap
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchProvider)` - A new provider instance
    /// * `Err(SearchIndexError)` - If connection setup fails
    pub async fn new(url: &str, index_config: IndexConfig) -> Result<Self, SearchIndexError> {
        let parsed_url =
            Url::parse(url).map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(
            url = %url,
            index = %index_config.index,
            max_results = index_config.max_results,
            "Created OpenSearch provider"
        );

        Ok(Self {
            client,
            index_config,
        })
    }

    /// Check that the cluster answers.
    ///
    /// Creating the provider does not open a connection, so startup code calls
    /// this to find out whether OpenSearch is actually reachable.
    pub async fn ping(&self) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .ping()
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            return Err(SearchIndexError::connection(format!(
                "Ping returned status {}",
                status
            )));
        }
        Ok(())
    }

    fn index_name(&self) -> &str {
        &self.index_config.index
    }

    async fn index_exists(&self) -> Result<bool, SearchIndexError> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[self.index_name()]))
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let status = response.status_code();
        match status.as_u16() {
            200 => Ok(true),
            404 => Ok(false),
            _ => Err(SearchIndexError::connection(format!(
                "Index exists check returned status {}",
                status
            ))),
        }
    }

    async fn create_index(&self) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(self.index_name()))
            .body(get_index_settings())
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let status = response.status_code();
        if status.is_success() {
            info!(index = %self.index_name(), "Created search index with geo-point mapping");
            return Ok(());
        }

        let error_body = response.text().await.unwrap_or_default();
        if error_body.contains(ALREADY_EXISTS) {
            info!(index = %self.index_name(), "Search index was created concurrently");
            return Ok(());
        }

        error!(status = %status, body = %error_body, "Create index request failed");
        Err(SearchIndexError::index_creation(format!(
            "Create index failed with status {}: {}",
            status, error_body
        )))
    }
}

#[async_trait]
impl SearchIndexProvider for OpenSearchProvider {
    async fn ensure_index_exists(&self) -> Result<(), SearchIndexError> {
        if self.index_exists().await? {
            debug!(index = %self.index_name(), "Search index already exists");
            return Ok(());
        }

        self.create_index().await
    }

    /// Write a post and force a refresh so the next search can see it.
    async fn index_document(&self, document: &IndexedPost) -> Result<(), SearchIndexError> {
        let body = serde_json::to_value(&document.post)
            .map_err(|e| SearchIndexError::serialization(e.to_string()))?;

        let response = self
            .client
            .index(IndexParts::IndexId(self.index_name(), &document.id))
            .body(body)
            .refresh(Refresh::True)
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Index request failed");
            return Err(SearchIndexError::index(format!(
                "Index failed with status {}: {}",
                status, error_body
            )));
        }

        debug!(doc_id = %document.id, "Document indexed");
        Ok(())
    }

    async fn geo_search(&self, query: &GeoQuery) -> Result<GeoSearchResult, SearchIndexError> {
        let body = geo_distance_query(query, self.index_config.max_results);

        let response = self
            .client
            .search(SearchParts::Index(&[self.index_name()]))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Search request failed");
            let message = format!("Search failed with status {}: {}", status, error_body);
            return Err(if status.as_u16() == 400 {
                SearchIndexError::query(message)
            } else {
                SearchIndexError::search(message)
            });
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;

        let result = utils::parse_search_response(body)?;

        debug!(
            total_hits = result.total_hits,
            returned = result.posts.len(),
            skipped = result.skipped,
            took_ms = result.took_ms,
            "Geo search completed"
        );
        Ok(result)
    }
}
