//! Heuristic geo-restriction hint from response metadata.

use serde_json::Value;

const GEO_HEADERS: [&str; 3] = ["cf-ray", "x-country-code", "x-geoip-country"];

/// True if a response hints that the content may be region-locked:
/// status 403/451, or a CDN/geo header present.
pub fn looks_geo_restricted(status: i64, headers: &Value) -> bool {
    if status == 403 || status == 451 {
        return true;
    }
    match headers.as_object() {
        Some(map) => map
            .keys()
            .any(|k| GEO_HEADERS.iter().any(|g| k.eq_ignore_ascii_case(g))),
        None => false,
    }
}
