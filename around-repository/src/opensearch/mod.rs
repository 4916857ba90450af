//! OpenSearch implementation of the search index provider.
//!
//! This module provides a concrete implementation of `SearchIndexProvider`
//! using OpenSearch as the backend.

mod index_config;
mod provider;
mod query;

pub use index_config::{get_index_settings, IndexConfig, DEFAULT_MAX_RESULTS, INDEX_NAME};
pub use provider::OpenSearchProvider;
pub use query::geo_distance_query;
