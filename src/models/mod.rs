//! Core data models: request inputs and the immutable result of each stage.

pub mod geography;
pub mod request;

pub use geography::{Coordinates, FipsGeography, GeocodedLocation, IncorporatedPlace};
pub use request::{Address, AddressLocality, GeoRequest, GeocoderSelection, LocationQuery};
