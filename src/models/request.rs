//! Caller-supplied location descriptions.

use serde::{Deserialize, Serialize};

use super::Coordinates;
use crate::error::{Error, Result};

/// Which forward geocoder resolves street addresses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeocoderSelection {
    /// US Census address geocoder
    #[default]
    Census,
    Nominatim,
    /// Requires an API key
    Mapzen,
}

/// Street address to geocode.
///
/// `street` is always required, plus either `zip` or both `city` and `state`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
}

/// The part of an address that narrows the street down to a locality
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressLocality<'a> {
    Zip(&'a str),
    CityState { city: &'a str, state: &'a str },
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl Address {
    pub fn with_zip(street: &str, zip: &str) -> Self {
        Self {
            street: street.to_string(),
            zip: Some(zip.to_string()),
            ..Default::default()
        }
    }

    pub fn with_city_state(street: &str, city: &str, state: &str) -> Self {
        Self {
            street: street.to_string(),
            city: Some(city.to_string()),
            state: Some(state.to_string()),
            ..Default::default()
        }
    }

    /// Check the required fields and pick the locality to query with.
    /// A zip wins over city/state when both are given.
    pub fn validate(&self) -> Result<(&str, AddressLocality<'_>)> {
        let street = self.street.trim();
        if street.is_empty() {
            return Err(Error::MissingField("address.street".to_string()));
        }

        if let Some(zip) = present(&self.zip) {
            return Ok((street, AddressLocality::Zip(zip)));
        }

        match (present(&self.city), present(&self.state)) {
            (Some(city), Some(state)) => Ok((street, AddressLocality::CityState { city, state })),
            (None, _) => Err(Error::MissingField(
                "address.zip or address.city and address.state".to_string(),
            )),
            (Some(_), None) => Err(Error::MissingField("address.state".to_string())),
        }
    }
}

/// A location request as supplied by the caller.
///
/// Never mutated by this crate: each stage returns a new value instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    #[serde(default)]
    pub geocoder_selection: GeocoderSelection,
    /// Census API name, e.g. `acs5`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
}

/// How a request will be located, in priority order
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationQuery<'a> {
    Coordinates(Coordinates),
    Address(&'a Address),
    Zip(&'a str),
    State(&'a str),
}

impl GeoRequest {
    pub fn from_address(address: Address) -> Self {
        Self {
            address: Some(address),
            ..Default::default()
        }
    }

    pub fn from_zip(zip: &str) -> Self {
        Self {
            zip: Some(zip.to_string()),
            ..Default::default()
        }
    }

    pub fn from_state(state: &str) -> Self {
        Self {
            state: Some(state.to_string()),
            ..Default::default()
        }
    }

    pub fn from_coordinates(coordinates: Coordinates) -> Self {
        Self {
            lat: Some(coordinates.lat),
            lng: Some(coordinates.lng),
            ..Default::default()
        }
    }

    pub fn with_geocoder(mut self, selection: GeocoderSelection) -> Self {
        self.geocoder_selection = selection;
        self
    }

    /// Coordinates already on the request, if both halves are present
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
            _ => None,
        }
    }

    /// Decide how to locate this request: coordinates, then address, zip, state.
    pub fn query(&self) -> Result<LocationQuery<'_>> {
        if let Some(coordinates) = self.coordinates() {
            return Ok(LocationQuery::Coordinates(coordinates));
        }
        if let Some(address) = &self.address {
            return Ok(LocationQuery::Address(address));
        }
        if let Some(zip) = present(&self.zip) {
            return Ok(LocationQuery::Zip(zip));
        }
        if let Some(state) = present(&self.state) {
            return Ok(LocationQuery::State(state));
        }
        Err(Error::MissingLocation)
    }
}
