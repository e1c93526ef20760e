//! Stage results: coordinates from forward geocoding, FIPS codes from reverse geocoding.

use serde::{Deserialize, Serialize};

/// Geographic point (WGS84)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Build from a GeoJSON-style `[lng, lat]` pair
    pub fn from_lng_lat(pair: [f64; 2]) -> Self {
        Self {
            lat: pair[1],
            lng: pair[0],
        }
    }
}

/// Incorporated place containing a point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncorporatedPlace {
    /// Place FIPS code
    pub fips: String,
    pub name: String,
}

/// FIPS identifiers for the census geography containing a point.
///
/// Holding one of these is what it means for a location to be "geocoded".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FipsGeography {
    pub coordinates: Coordinates,
    pub state: String,
    pub county: String,
    pub tract: String,
    pub block_group: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place: Option<IncorporatedPlace>,
}

/// Output of the full forward + reverse chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodedLocation {
    pub coordinates: Coordinates,
    pub fips: FipsGeography,
}
