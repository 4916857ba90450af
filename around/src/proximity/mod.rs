//! Proximity query pipeline.
//!
//! Turns raw `lat`/`lon`/`range` parameters into a geo-distance search and
//! returns matching posts in the engine's order.

use around_repository::SearchIndexService;
use around_shared::{Coordinate, Distance, GeoQuery, Post};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::errors::PostError;

/// Search parameters as received from the query string.
///
/// `range` is a unit-less number of kilometres.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub range: Option<String>,
}

impl SearchParams {
    pub fn new(lat: impl Into<String>, lon: impl Into<String>) -> Self {
        Self {
            lat: Some(lat.into()),
            lon: Some(lon.into()),
            range: None,
        }
    }

    pub fn with_range(mut self, range: impl Into<String>) -> Self {
        self.range = Some(range.into());
        self
    }

    /// Validate the parameters into a geo query.
    ///
    /// Missing or malformed coordinates and ranges are `InvalidQuery`. An
    /// absent or blank range falls back to the default radius.
    pub fn to_query(&self) -> Result<GeoQuery, PostError> {
        let lat = self
            .lat
            .as_deref()
            .ok_or_else(|| PostError::InvalidQuery("lat is required".to_string()))?;
        let lon = self
            .lon
            .as_deref()
            .ok_or_else(|| PostError::InvalidQuery("lon is required".to_string()))?;

        let center =
            Coordinate::parse(lat, lon).map_err(|e| PostError::InvalidQuery(e.to_string()))?;

        let radius = match self.range.as_deref().map(str::trim) {
            None | Some("") => Distance::default(),
            Some(raw) => Distance::parse_km(raw).map_err(|e| PostError::InvalidQuery(e.to_string()))?,
        };

        Ok(GeoQuery::new(center, radius))
    }
}

/// Answers "posts near here" requests.
pub struct ProximityQueryPipeline {
    search: SearchIndexService,
}

impl ProximityQueryPipeline {
    pub fn new(search: SearchIndexService) -> Self {
        Self { search }
    }

    /// Find posts within the requested radius.
    ///
    /// Parameters are validated before the index is contacted. An empty result
    /// is returned as an empty list.
    #[instrument(skip(self))]
    pub async fn search(&self, params: &SearchParams) -> Result<Vec<Post>, PostError> {
        let query = params.to_query()?;

        info!(
            lat = query.center.lat(),
            lon = query.center.lon(),
            radius = %query.radius,
            "Search received"
        );

        let result = self
            .search
            .geo_search(&query)
            .await
            .map_err(PostError::from_search)?;

        info!(
            took_ms = result.took_ms,
            total_hits = result.total_hits,
            returned = result.posts.len(),
            skipped = result.skipped,
            "Found posts"
        );

        Ok(result.posts)
    }
}
