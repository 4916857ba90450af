//! Query DSL builders for the post index.

use around_shared::GeoQuery;
use serde_json::{json, Value};

/// Build the search body for a geo-distance query.
///
/// Matches every document and filters on `location`, so hits come back in the
/// engine's default order. `size` bounds the number of returned hits.
pub fn geo_distance_query(query: &GeoQuery, size: usize) -> Value {
    json!({
        "size": size,
        "query": {
            "bool": {
                "must": { "match_all": {} },
                "filter": {
                    "geo_distance": {
                        "distance": query.radius.to_string(),
                        "location": {
                            "lat": query.center.lat(),
                            "lon": query.center.lon()
                        }
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use around_shared::{Coordinate, Distance};

    #[test]
    fn test_geo_distance_query_shape() {
        let query = GeoQuery::new(
            Coordinate::new(37.0, -118.0).unwrap(),
            Distance::km(10.0).unwrap(),
        );

        let body = geo_distance_query(&query, 50);
        let geo = &body["query"]["bool"]["filter"]["geo_distance"];

        assert_eq!(body["size"], 50);
        assert_eq!(geo["distance"], "10km");
        assert_eq!(geo["location"]["lat"], 37.0);
        assert_eq!(geo["location"]["lon"], -118.0);
        assert!(body["query"]["bool"]["must"]["match_all"].is_object());
    }

    #[test]
    fn test_geo_distance_query_default_radius() {
        let query = GeoQuery::with_default_radius(Coordinate::new(0.0, 0.0).unwrap());
        let body = geo_distance_query(&query, 10);
        assert_eq!(
            body["query"]["bool"]["filter"]["geo_distance"]["distance"],
            "200km"
        );
    }
}
