use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub endpoints: Endpoints,
    pub http: HttpSettings,
    /// Required only when the Mapzen geocoder is selected
    pub mapzen_api_key: Option<String>,
}

/// Base URLs of the upstream services
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Endpoints {
    pub census_geocoder: String,
    pub fcc_block: String,
    pub nominatim: String,
    pub mapzen: String,
    pub zcta_coordinates: String,
    pub census_api: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            census_geocoder: "https://geocoding.geo.census.gov/geocoder/".to_string(),
            fcc_block: "https://data.fcc.gov/api/block/find".to_string(),
            nominatim: "https://nominatim.openstreetmap.org/search".to_string(),
            mapzen: "https://search.mapzen.com/v1/search".to_string(),
            zcta_coordinates: "https://s3.amazonaws.com/citysdk/zipcode-to-coordinates.json"
                .to_string(),
            census_api: "https://api.census.gov/data/".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HttpSettings {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: concat!("census-geocode/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse config file")?;
        Ok(config)
    }
}
