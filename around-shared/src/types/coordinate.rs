//! Geographic coordinate type.
//!
//! A `Coordinate` serializes as `{"lat": .., "lon": ..}`, which is the object
//! form of a search engine geo-point.

use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// A validated latitude/longitude pair in decimal degrees.
///
/// Latitude is always within [-90, 90] and longitude within [-180, 180].
/// Values can only be built through [`Coordinate::new`] or
/// [`Coordinate::parse`], and deserialization runs the same checks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    lat: f64,
    lon: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = ModelError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Coordinate::new(raw.lat, raw.lon)
    }
}

impl Coordinate {
    /// Create a coordinate, rejecting non-finite or out-of-range values.
    pub fn new(lat: f64, lon: f64) -> Result<Self, ModelError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(ModelError::invalid_coordinate(format!(
                "lat must be between -90 and 90, got {}",
                lat
            )));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(ModelError::invalid_coordinate(format!(
                "lon must be between -180 and 180, got {}",
                lon
            )));
        }
        Ok(Self { lat, lon })
    }

    /// Parse a coordinate from the decimal strings sent by clients.
    ///
    /// Empty or unparsable input is an error; it is never read as zero.
    pub fn parse(lat: &str, lon: &str) -> Result<Self, ModelError> {
        let lat = parse_degrees("lat", lat)?;
        let lon = parse_degrees("lon", lon)?;
        Self::new(lat, lon)
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Great-circle distance to `other` in kilometres (haversine).
    pub fn distance_km(&self, other: &Coordinate) -> f64 {
        let dlat = (other.lat - self.lat).to_radians();
        let dlon = (other.lon - self.lon).to_radians();

        let a = (dlat / 2.0).sin().powi(2)
            + self.lat.to_radians().cos() * other.lat.to_radians().cos() * (dlon / 2.0).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_KM * c
    }
}

fn parse_degrees(field: &str, raw: &str) -> Result<f64, ModelError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ModelError::invalid_coordinate(format!("{} is required", field)));
    }
    trimmed.parse::<f64>().map_err(|_| {
        ModelError::invalid_coordinate(format!(
            "{} must be a decimal number, got '{}'",
            field, trimmed
        ))
    })
}
