//! Nearest-point lookups against the geo search backend.
//!
//! `GeoSearch` is the seam the population run depends on; `ElasticClient`
//! is the production implementation. Tests substitute their own.

mod elastic;
mod models;

use async_trait::async_trait;

use crate::error_handling::LookupError;
use crate::grid::Coordinate;

pub use elastic::ElasticClient;
pub use models::{nearest_point_query, GeoPoint, Location};

/// One nearest-neighbour query per call, no retries.
#[async_trait]
pub trait GeoSearch: Send + Sync {
    /// Returns the best point within `radius` of `coordinate`.
    ///
    /// # Errors
    ///
    /// `LookupError::NoMatch` when nothing is in range, `LookupError::Transport`
    /// for network, HTTP or response-format failures.
    async fn nearest(&self, coordinate: Coordinate, radius: &str) -> Result<GeoPoint, LookupError>;
}
