// Shared test helpers for stub search backends and configurations.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::time::Duration;

use httptest::Server;
use serde_json::{json, Value};

use geo_cache::{Config, GridBounds, RetryPolicy, SearchConfig};

/// Path the stub search backend listens on.
pub const SEARCH_PATH: &str = "/zip/_search";

/// Search response with a single hit whose `_source` is `source`.
pub fn hit_response(source: Value) -> Value {
    json!({
        "took": 2,
        "timed_out": false,
        "hits": {
            "total": {"value": 1, "relation": "eq"},
            "hits": [{"_index": "zip", "_id": "1", "_score": 1.0, "_source": source}]
        }
    })
}

/// Search response with no hits.
pub fn empty_response() -> Value {
    json!({
        "took": 1,
        "timed_out": false,
        "hits": {"total": {"value": 0, "relation": "eq"}, "hits": []}
    })
}

/// A postal point as stored in the index.
pub fn point_source(lat: f64, lon: f64, zip: &str, city: &str) -> Value {
    json!({
        "location": {"lat": lat, "lon": lon},
        "state": "Kerala",
        "zipcode": zip,
        "city": city,
        "index": 17
    })
}

/// Regex matching a query body for the given grid longitude in degrees.
pub fn lon_pattern(lon: &str) -> String {
    format!(r#""lon":{}\}}"#, lon.replace('.', r"\."))
}

/// Population config pointed at `server`, with fast retries and no rate limit.
#[allow(dead_code)] // Not every test file uses it
pub fn stub_config(server: &Server, grid: GridBounds) -> Config {
    let mut config = Config::new(grid);
    config.rate_limit_rps = 0;
    config.retry = RetryPolicy::new(3, Duration::from_millis(10));
    config.search = SearchConfig {
        endpoint: server.url_str(SEARCH_PATH),
        timeout_seconds: 5,
        ..SearchConfig::default()
    };
    config
}
