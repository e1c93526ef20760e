//! Entry point tying aliases, geocoders and geometry conversion together.
//!
//! Every operation validates its input first, issues at most one HTTP request,
//! and returns a new value; nothing the caller passes in is modified.

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::Config;
use crate::data::{AliasDictionary, StateCapitals};
use crate::error::{Error, Result};
use crate::geocoder::{join_path, zcta, ForwardBackend, ReverseBackend};
use crate::geometry;
use crate::http::{HttpClient, ReqwestClient};
use crate::models::{
    Address, Coordinates, FipsGeography, GeoRequest, GeocodedLocation, GeocoderSelection,
    LocationQuery,
};

pub struct RequestUtils<C = ReqwestClient> {
    client: C,
    config: Config,
    aliases: Arc<AliasDictionary>,
    capitals: Arc<StateCapitals>,
}

impl RequestUtils<ReqwestClient> {
    /// Build with a reqwest client configured from `config.http`
    pub fn new(config: Config) -> Result<Self> {
        let client = ReqwestClient::new(&config.http)?;
        Ok(Self::with_client(client, config))
    }
}

impl<C: HttpClient> RequestUtils<C> {
    /// Use a custom HTTP collaborator and the bundled lookup tables
    pub fn with_client(client: C, config: Config) -> Self {
        Self {
            client,
            config,
            aliases: Arc::new(AliasDictionary::bundled().clone()),
            capitals: Arc::new(StateCapitals::bundled().clone()),
        }
    }

    /// Replace the bundled lookup tables
    pub fn with_data(mut self, aliases: Arc<AliasDictionary>, capitals: Arc<StateCapitals>) -> Self {
        self.aliases = aliases;
        self.capitals = capitals;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn aliases(&self) -> &AliasDictionary {
        &self.aliases
    }

    // ---- aliases ----

    pub fn resolve_variable<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases.resolve(name)
    }

    pub fn resolve_validated_variable(&self, name: &str, api: &str, year: u16) -> Result<String> {
        self.aliases.resolve_validated(name, api, year)
    }

    pub fn is_normalizable(&self, name: &str) -> bool {
        self.aliases.is_normalizable(name)
    }

    // ---- forward geocoding ----

    /// Locate a request: address, then zip, then state. A request that already
    /// carries both coordinates is returned as is.
    pub async fn get_lat_lng(&self, request: &GeoRequest) -> Result<Coordinates> {
        match request.query()? {
            LocationQuery::Coordinates(coordinates) => Ok(coordinates),
            LocationQuery::Address(address) => {
                self.lat_lng_from_address(address, request.geocoder_selection)
                    .await
            }
            LocationQuery::Zip(zip) => self
                .lat_lng_from_zip(zip)
                .await?
                .ok_or_else(|| Error::LocationNotFound(format!("zip {}", zip))),
            LocationQuery::State(state) => self
                .lat_lng_from_state_code(state)
                .await
                .ok_or_else(|| Error::LocationNotFound(format!("state {}", state))),
        }
    }

    /// State capital coordinates; `None` for an unknown code
    pub async fn lat_lng_from_state_code(&self, state_code: &str) -> Option<Coordinates> {
        let found = self.capitals.lookup(state_code);
        debug!("State {} resolved to {:?}", state_code, found);
        found
    }

    /// Fetch the ZCTA table and look the ZIP up in it. `Ok(None)` when absent.
    pub async fn lat_lng_from_zip(&self, zip: &str) -> Result<Option<Coordinates>> {
        let table = self
            .client
            .get(&self.config.endpoints.zcta_coordinates, false)
            .await?;
        let found = zcta::lookup(&table, zip)?;
        debug!("Zip {} resolved to {:?}", zip, found);
        Ok(found)
    }

    /// Geocode a street address with exactly one backend
    pub async fn lat_lng_from_address(
        &self,
        address: &Address,
        selection: GeocoderSelection,
    ) -> Result<Coordinates> {
        let backend = ForwardBackend::select(selection, self.config.mapzen_api_key.as_deref())?;
        let (street, locality) = address.validate()?;

        let url = backend.build_url(&self.config.endpoints, street, locality);
        debug!("Geocoding address via {}", backend.service());
        let response = self.client.get(&url, backend.is_jsonp()).await?;
        backend.normalize(response)
    }

    // ---- reverse geocoding ----

    pub async fn fips_from_lat_lng(
        &self,
        at: Coordinates,
        backend: ReverseBackend,
    ) -> Result<FipsGeography> {
        let url = backend.build_url(&self.config.endpoints, at);
        let response = self.client.get(&url, backend.is_jsonp()).await?;
        backend.normalize(at, response)
    }

    /// FIPS codes from the Census geocoder, including the incorporated place
    pub async fn census_fips(&self, at: Coordinates) -> Result<FipsGeography> {
        self.fips_from_lat_lng(at, ReverseBackend::Census).await
    }

    /// FIPS codes from the FCC block API
    pub async fn fcc_fips(&self, at: Coordinates) -> Result<FipsGeography> {
        self.fips_from_lat_lng(at, ReverseBackend::Fcc).await
    }

    /// Forward geocode (unless coordinates are given) and then reverse geocode
    pub async fn geocode(
        &self,
        request: &GeoRequest,
        backend: ReverseBackend,
    ) -> Result<GeocodedLocation> {
        let coordinates = self.get_lat_lng(request).await?;
        let fips = self.fips_from_lat_lng(coordinates, backend).await?;
        info!(
            "Geocoded ({}, {}) to tract {}{}{}",
            coordinates.lat, coordinates.lng, fips.state, fips.county, fips.tract
        );
        Ok(GeocodedLocation { coordinates, fips })
    }

    // ---- metadata ----

    /// Raw geography metadata for a Census API and year
    pub async fn geography_variables(&self, request: &GeoRequest) -> Result<Value> {
        let api = request
            .api
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .ok_or_else(|| Error::MissingField("api".to_string()))?;
        let year = request
            .year
            .ok_or_else(|| Error::MissingField("year".to_string()))?;

        let url = join_path(
            &self.config.endpoints.census_api,
            &format!("{}/{}/geography.json", year, api),
        );
        self.client.get(&url, false).await
    }

    // ---- geometry ----

    pub fn esri_to_geojson(&self, esri: &Value) -> Result<Value> {
        geometry::esri_to_geojson(esri)
    }

    pub fn geojson_to_esri(&self, geojson: &Value) -> Result<Value> {
        geometry::geojson_to_esri(geojson)
    }
}
