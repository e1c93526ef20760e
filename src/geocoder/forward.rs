//! Address → coordinates, over three mutually incompatible geocoders.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::{encode, join_path, number_or_string};
use crate::config::Endpoints;
use crate::error::{Error, Result};
use crate::models::{AddressLocality, Coordinates, GeocoderSelection};

/// A selected address geocoder, ready to build requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForwardBackend {
    Census,
    Nominatim,
    Mapzen { api_key: String },
}

#[derive(Debug, Deserialize)]
struct CensusAddressResponse {
    result: CensusAddressResult,
}

#[derive(Debug, Deserialize)]
struct CensusAddressResult {
    #[serde(rename = "addressMatches", default)]
    address_matches: Vec<CensusAddressMatch>,
}

#[derive(Debug, Deserialize)]
struct CensusAddressMatch {
    coordinates: CensusXy,
}

#[derive(Debug, Deserialize)]
struct CensusXy {
    #[serde(deserialize_with = "number_or_string")]
    x: f64,
    #[serde(deserialize_with = "number_or_string")]
    y: f64,
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    #[serde(deserialize_with = "number_or_string")]
    lat: f64,
    #[serde(deserialize_with = "number_or_string")]
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct MapzenResponse {
    #[serde(default)]
    features: Vec<MapzenFeature>,
}

#[derive(Debug, Deserialize)]
struct MapzenFeature {
    geometry: MapzenGeometry,
}

#[derive(Debug, Deserialize)]
struct MapzenGeometry {
    #[serde(rename = "type")]
    geo_type: String,
    coordinates: Vec<f64>,
}

impl ForwardBackend {
    /// Pick the backend for a selection. Mapzen fails here without a key,
    /// whatever the address looks like.
    pub fn select(selection: GeocoderSelection, mapzen_api_key: Option<&str>) -> Result<Self> {
        match selection {
            GeocoderSelection::Census => Ok(ForwardBackend::Census),
            GeocoderSelection::Nominatim => Ok(ForwardBackend::Nominatim),
            GeocoderSelection::Mapzen => match mapzen_api_key.filter(|k| !k.trim().is_empty()) {
                Some(key) => Ok(ForwardBackend::Mapzen {
                    api_key: key.to_string(),
                }),
                None => Err(Error::MissingApiKey("mapzen")),
            },
        }
    }

    pub fn service(&self) -> &'static str {
        match self {
            ForwardBackend::Census => "Census geocoder",
            ForwardBackend::Nominatim => "Nominatim",
            ForwardBackend::Mapzen { .. } => "Mapzen",
        }
    }

    /// Only the Census geocoder is queried as JSONP
    pub fn is_jsonp(&self) -> bool {
        matches!(self, ForwardBackend::Census)
    }

    pub fn build_url(
        &self,
        endpoints: &Endpoints,
        street: &str,
        locality: AddressLocality<'_>,
    ) -> String {
        match self {
            ForwardBackend::Census => {
                let base = join_path(&endpoints.census_geocoder, "locations/address");
                let mut url = format!("{}?benchmark=4&format=jsonp&street={}", base, encode(street));
                match locality {
                    AddressLocality::Zip(zip) => {
                        url.push_str(&format!("&zip={}", encode(zip)));
                    }
                    AddressLocality::CityState { city, state } => {
                        url.push_str(&format!("&city={}&state={}", encode(city), encode(state)));
                    }
                }
                url
            }
            ForwardBackend::Nominatim => {
                let mut url = format!(
                    "{}?format=jsonv2&limit=1&countrycodes=us,pr&street={}",
                    endpoints.nominatim,
                    encode(street)
                );
                match locality {
                    AddressLocality::Zip(zip) => {
                        url.push_str(&format!("&postalcode={}", encode(zip)));
                    }
                    AddressLocality::CityState { city, state } => {
                        url.push_str(&format!("&city={}&county={}", encode(city), encode(state)));
                    }
                }
                url
            }
            ForwardBackend::Mapzen { api_key } => {
                let text = match locality {
                    AddressLocality::Zip(zip) => format!("{} {}", street, zip),
                    AddressLocality::CityState { city, state } => {
                        format!("{} {},{}", street, city, state)
                    }
                };
                format!(
                    "{}?size=1&boundary.country=USA&text={}&api_key={}",
                    endpoints.mapzen,
                    encode(&text),
                    encode(api_key)
                )
            }
        }
    }

    /// Read coordinates out of this backend's response envelope
    pub fn normalize(&self, response: Value) -> Result<Coordinates> {
        let service = self.service();
        let coordinates = match self {
            ForwardBackend::Census => {
                let parsed: CensusAddressResponse = serde_json::from_value(response)
                    .map_err(|e| Error::unexpected(service, e.to_string()))?;
                let first = parsed
                    .result
                    .address_matches
                    .into_iter()
                    .next()
                    .ok_or_else(|| Error::unexpected(service, "no address matches"))?;
                Coordinates::new(first.coordinates.y, first.coordinates.x)
            }
            ForwardBackend::Nominatim => {
                let places: Vec<NominatimPlace> = serde_json::from_value(response)
                    .map_err(|e| Error::unexpected(service, e.to_string()))?;
                let first = places
                    .into_iter()
                    .next()
                    .ok_or_else(|| Error::unexpected(service, "empty result list"))?;
                Coordinates::new(first.lat, first.lon)
            }
            ForwardBackend::Mapzen { .. } => {
                let parsed: MapzenResponse = serde_json::from_value(response)
                    .map_err(|e| Error::unexpected(service, e.to_string()))?;
                let geometry = parsed
                    .features
                    .into_iter()
                    .next()
                    .map(|f| f.geometry)
                    .ok_or_else(|| Error::unexpected(service, "no features"))?;
                if geometry.geo_type != "Point" || geometry.coordinates.len() < 2 {
                    warn!("Mapzen returned a {} geometry", geometry.geo_type);
                    return Err(Error::unexpected(
                        service,
                        format!("expected a Point geometry, got {}", geometry.geo_type),
                    ));
                }
                Coordinates::from_lng_lat([geometry.coordinates[0], geometry.coordinates[1]])
            }
        };

        debug!(
            "{} resolved to ({}, {})",
            service, coordinates.lat, coordinates.lng
        );
        Ok(coordinates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn zip() -> AddressLocality<'static> {
        AddressLocality::Zip("20500")
    }

    fn city_state() -> AddressLocality<'static> {
        AddressLocality::CityState {
            city: "Washington",
            state: "DC",
        }
    }

    #[test]
    fn test_select_mapzen_requires_key() {
        assert!(matches!(
            ForwardBackend::select(GeocoderSelection::Mapzen, None),
            Err(Error::MissingApiKey("mapzen"))
        ));
        assert!(matches!(
            ForwardBackend::select(GeocoderSelection::Mapzen, Some("  ")),
            Err(Error::MissingApiKey(_))
        ));
        assert_eq!(
            ForwardBackend::select(GeocoderSelection::Mapzen, Some("k")).unwrap(),
            ForwardBackend::Mapzen {
                api_key: "k".to_string()
            }
        );
        assert_eq!(
            ForwardBackend::select(GeocoderSelection::Census, None).unwrap(),
            ForwardBackend::Census
        );
    }

    #[test]
    fn test_census_urls() {
        let endpoints = Endpoints::default();
        assert_eq!(
            ForwardBackend::Census.build_url(&endpoints, "1600 Pennsylvania Ave", zip()),
            "https://geocoding.geo.census.gov/geocoder/locations/address?benchmark=4&format=jsonp&street=1600+Pennsylvania+Ave&zip=20500"
        );
        assert_eq!(
            ForwardBackend::Census.build_url(&endpoints, "1600 Pennsylvania Ave", city_state()),
            "https://geocoding.geo.census.gov/geocoder/locations/address?benchmark=4&format=jsonp&street=1600+Pennsylvania+Ave&city=Washington&state=DC"
        );
    }

    #[test]
    fn test_nominatim_urls() {
        let endpoints = Endpoints::default();
        assert_eq!(
            ForwardBackend::Nominatim.build_url(&endpoints, "1 Main St", zip()),
            "https://nominatim.openstreetmap.org/search?format=jsonv2&limit=1&countrycodes=us,pr&street=1+Main+St&postalcode=20500"
        );
        assert!(ForwardBackend::Nominatim
            .build_url(&endpoints, "1 Main St", city_state())
            .ends_with("&street=1+Main+St&city=Washington&county=DC"));
    }

    #[test]
    fn test_mapzen_url() {
        let backend = ForwardBackend::Mapzen {
            api_key: "search-xyz".to_string(),
        };
        assert_eq!(
            backend.build_url(&Endpoints::default(), "1 Main St", city_state()),
            "https://search.mapzen.com/v1/search?size=1&boundary.country=USA&text=1+Main+St+Washington%2CDC&api_key=search-xyz"
        );
    }

    #[test]
    fn test_normalize_census() {
        let response = json!({
            "result": {
                "input": {},
                "addressMatches": [
                    {"matchedAddress": "1600 PENNSYLVANIA AVE NW", "coordinates": {"x": -77.03535, "y": 38.898754}},
                    {"coordinates": {"x": 0.0, "y": 0.0}}
                ]
            }
        });
        let coords = ForwardBackend::Census.normalize(response).unwrap();
        assert_eq!(coords, Coordinates::new(38.898754, -77.03535));
    }

    #[test]
    fn test_normalize_census_no_match() {
        let response = json!({"result": {"addressMatches": []}});
        assert!(matches!(
            ForwardBackend::Census.normalize(response),
            Err(Error::UnexpectedResponse { .. })
        ));
    }

    #[test]
    fn test_normalize_nominatim_string_coordinates() {
        let response = json!([{"place_id": 1, "lat": "38.8976", "lon": "-77.0365"}]);
        let coords = ForwardBackend::Nominatim.normalize(response).unwrap();
        assert_eq!(coords, Coordinates::new(38.8976, -77.0365));
    }

    #[test]
    fn test_normalize_nominatim_empty() {
        assert!(matches!(
            ForwardBackend::Nominatim.normalize(json!([])),
            Err(Error::UnexpectedResponse { service: "Nominatim", .. })
        ));
    }

    #[test]
    fn test_normalize_mapzen() {
        let backend = ForwardBackend::Mapzen {
            api_key: "k".to_string(),
        };
        let response = json!({
            "type": "FeatureCollection",
            "features": [{"type": "Feature", "geometry": {"type": "Point", "coordinates": [-77.0365, 38.8976]}}]
        });
        assert_eq!(
            backend.normalize(response).unwrap(),
            Coordinates::new(38.8976, -77.0365)
        );

        let polygon = json!({
            "features": [{"geometry": {"type": "Polygon", "coordinates": []}}]
        });
        assert!(matches!(
            backend.normalize(polygon),
            Err(Error::UnexpectedResponse { .. })
        ));
        assert!(backend.normalize(json!({"features": []})).is_err());
    }
}
