//! Proximity query types.
//!
//! A `GeoQuery` pairs a center coordinate with a `Distance` radius. The radius
//! is always kilometre-qualified by this module; callers supply a bare number.

use std::fmt;

use crate::errors::ModelError;
use crate::types::coordinate::Coordinate;

/// Radius used when a search request does not specify one.
pub const DEFAULT_RADIUS_KM: f64 = 200.0;

/// A strictly positive search radius in kilometres.
///
/// `Display` renders the unit-qualified form understood by the search engine,
/// e.g. `200km`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Distance {
    km: f64,
}

impl Distance {
    /// Create a radius from a number of kilometres.
    pub fn km(value: f64) -> Result<Self, ModelError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(ModelError::invalid_distance(format!(
                "range must be a positive number of kilometres, got {}",
                value
            )));
        }
        Ok(Self { km: value })
    }

    /// Parse a unit-less radius supplied by a client and qualify it with `km`.
    ///
    /// Values that already carry a unit (`"10km"`, `"5mi"`) are rejected.
    pub fn parse_km(raw: &str) -> Result<Self, ModelError> {
        let trimmed = raw.trim();
        let value = trimmed.parse::<f64>().map_err(|_| {
            ModelError::invalid_distance(format!(
                "range must be a unit-less number of kilometres, got '{}'",
                trimmed
            ))
        })?;
        Self::km(value)
    }

    pub fn as_km(&self) -> f64 {
        self.km
    }
}

impl Default for Distance {
    fn default() -> Self {
        Self {
            km: DEFAULT_RADIUS_KM,
        }
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}km", self.km)
    }
}

/// A geo-distance search: every post within `radius` of `center`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoQuery {
    pub center: Coordinate,
    pub radius: Distance,
}

impl GeoQuery {
    pub fn new(center: Coordinate, radius: Distance) -> Self {
        Self { center, radius }
    }

    /// Query around `center` using [`DEFAULT_RADIUS_KM`].
    pub fn with_default_radius(center: Coordinate) -> Self {
        Self::new(center, Distance::default())
    }

    /// Whether `point` falls inside this query's radius.
    pub fn contains(&self, point: &Coordinate) -> bool {
        self.center.distance_km(point) <= self.radius.as_km()
    }
}
