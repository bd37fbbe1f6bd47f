//! Search result models.

use serde::{Deserialize, Serialize};

use crate::grid::Coordinate;

/// Position of an indexed point, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

/// Nearest administrative/postal point resolved for a grid coordinate.
///
/// This is also the cache value format: the JSON encoding of this struct is
/// what gets stored under the coordinate's key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub location: Location,
    #[serde(default)]
    pub state: String,
    #[serde(rename = "zipcode", default)]
    pub zip: String,
    #[serde(default)]
    pub city: String,
    /// Opaque index carried over from the source data set
    #[serde(default)]
    pub index: i64,
}

/// The part of a search response envelope the lookup needs.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope {
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "_source")]
    source: GeoPoint,
}

impl SearchResponse {
    /// Highest-ranked hit, if any.
    pub(crate) fn into_first_point(self) -> Option<GeoPoint> {
        self.hits.hits.into_iter().next().map(|hit| hit.source)
    }
}

/// Single-result, distance-filtered query centred on `coordinate`.
pub fn nearest_point_query(coordinate: Coordinate, radius: &str) -> serde_json::Value {
    serde_json::json!({
        "size": 1,
        "query": {
            "bool": {
                "filter": {
                    "geo_distance": {
                        "distance": radius,
                        "location": {
                            "lat": coordinate.lat_degrees(),
                            "lon": coordinate.lon_degrees(),
                        }
                    }
                }
            }
        }
    })
}
