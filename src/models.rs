use serde::{Deserialize, Serialize};

/// Geolocation data resolved for a single IPv4 address.
///
/// The `ip` field is the sole lookup key across every cache tier. A record
/// is immutable once constructed: saving a record for an already-known key
/// replaces the previous record wholesale, there are no partial updates.
///
/// The JSON shape is shared by every repository's serialization and by the
/// HTTP layer: `city`, `latitude` and `longitude` are omitted when unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoRecord {
    pub ip: String,
    #[serde(default)]
    pub country_code: String,
    #[serde(default)]
    pub country_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub city: String,
    #[serde(default, skip_serializing_if = "coordinate_unset")]
    pub latitude: f64,
    #[serde(default, skip_serializing_if = "coordinate_unset")]
    pub longitude: f64,
}

/// `0.0` means "unset" for both latitude and longitude.
fn coordinate_unset(v: &f64) -> bool {
    *v == 0.0
}
