//! OpenSearch index configuration and mappings.
//!
//! This module defines the index settings and mappings for the post index.

use serde_json::{json, Value};

/// The default name of the post index.
pub const INDEX_NAME: &str = "around";

/// Default cap on the number of hits returned by a geo search.
pub const DEFAULT_MAX_RESULTS: usize = 100;

/// Configuration for the search index.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// The index that holds posts.
    pub index: String,
    /// Maximum number of hits requested from the engine per search.
    pub max_results: usize,
}

impl IndexConfig {
    /// Create a new index configuration.
    ///
    /// # Arguments
    ///
    /// * `index` - The index name
    /// * `max_results` - Hit cap per search
    pub fn new(index: impl Into<String>, max_results: usize) -> Self {
        Self {
            index: index.into(),
            max_results,
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self::new(INDEX_NAME, DEFAULT_MAX_RESULTS)
    }
}

/// Get the index settings and mappings for the post index.
///
/// The configuration includes:
/// - **geo_point**: `location`, required for geo-distance queries
/// - **keyword**: `user` for exact filtering, `url` stored but not indexed
/// - **text**: `message` for full-text matching
///
/// # Sharding Configuration
///
/// - 1 primary shard
/// - 1 replica for redundancy
pub fn get_index_settings() -> Value {
    json!({
        "settings": {
            "number_of_shards": 1,
            "number_of_replicas": 1
        },
        "mappings": {
            "properties": {
                "user": {
                    "type": "keyword"
                },
                "message": {
                    "type": "text"
                },
                "location": {
                    "type": "geo_point"
                },
                "url": {
                    "type": "keyword",
                    "index": false
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_settings_structure() {
        let settings = get_index_settings();

        assert!(settings["settings"]["number_of_shards"].is_number());
        assert!(settings["settings"]["number_of_replicas"].is_number());

        // The geo-distance query depends on this mapping
        assert_eq!(
            settings["mappings"]["properties"]["location"]["type"],
            "geo_point"
        );
        assert_eq!(settings["mappings"]["properties"]["user"]["type"], "keyword");
        assert_eq!(settings["mappings"]["properties"]["message"]["type"], "text");
        assert_eq!(settings["mappings"]["properties"]["url"]["index"], false);
    }

    #[test]
    fn test_index_settings_are_stable() {
        assert_eq!(get_index_settings(), get_index_settings());
    }

    #[test]
    fn test_default_config() {
        let config = IndexConfig::default();
        assert_eq!(config.index, "around");
        assert_eq!(config.max_results, DEFAULT_MAX_RESULTS);
    }
}
