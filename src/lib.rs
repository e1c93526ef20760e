//! Census Geocode - request construction and response normalization for
//! US geocoding and census-geography services.
//!
//! Resolves addresses, ZIP codes and state codes to coordinates (Census,
//! Nominatim, Mapzen, ZCTA table), coordinates to FIPS codes (Census, FCC),
//! and Census variable aliases to canonical names.

pub mod config;
pub mod data;
pub mod error;
pub mod geocoder;
pub mod geometry;
pub mod http;
pub mod models;
pub mod request_utils;

pub use config::Config;
pub use error::{Error, Result};
pub use geocoder::{ForwardBackend, ReverseBackend};
pub use http::{HttpClient, ReqwestClient};
pub use models::{Address, Coordinates, FipsGeography, GeoRequest, GeocodedLocation, GeocoderSelection};
pub use request_utils::RequestUtils;
