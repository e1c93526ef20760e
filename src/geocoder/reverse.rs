//! Coordinates → FIPS codes, via the Census geocoder or the FCC block API.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::join_path;
use crate::config::Endpoints;
use crate::error::{Error, Result};
use crate::models::{Coordinates, FipsGeography, IncorporatedPlace};

/// Census layers: blocks, tracts, counties, states, incorporated places
const CENSUS_LAYERS: &str = "8,12,28,84,86";
const CENSUS_BLOCKS: &str = "2010 Census Blocks";
const INCORPORATED_PLACES: &str = "Incorporated Places";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReverseBackend {
    #[default]
    Census,
    Fcc,
}

#[derive(Debug, Deserialize)]
struct CensusCoordinatesResponse {
    result: CensusCoordinatesResult,
}

#[derive(Debug, Deserialize)]
struct CensusCoordinatesResult {
    geographies: CensusGeographies,
}

#[derive(Debug, Deserialize)]
struct CensusGeographies {
    #[serde(rename = "2010 Census Blocks", default)]
    blocks: Vec<CensusBlock>,
    #[serde(rename = "Incorporated Places", default)]
    places: Vec<CensusPlace>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
struct CensusBlock {
    state: String,
    county: String,
    tract: String,
    #[serde(rename = "BLKGRP")]
    block_group: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
struct CensusPlace {
    place: String,
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct FccResponse {
    block: FccFips,
    county: FccFips,
    state: FccFips,
}

#[derive(Debug, Deserialize)]
struct FccFips {
    #[serde(rename = "FIPS")]
    fips: String,
}

impl ReverseBackend {
    pub fn service(&self) -> &'static str {
        match self {
            ReverseBackend::Census => "Census geocoder",
            ReverseBackend::Fcc => "FCC block API",
        }
    }

    pub fn is_jsonp(&self) -> bool {
        matches!(self, ReverseBackend::Census)
    }

    pub fn build_url(&self, endpoints: &Endpoints, at: Coordinates) -> String {
        match self {
            ReverseBackend::Census => format!(
                "{}?x={}&y={}&benchmark=4&vintage=4&layers={}&format=jsonp",
                join_path(&endpoints.census_geocoder, "geographies/coordinates"),
                at.lng,
                at.lat,
                CENSUS_LAYERS
            ),
            ReverseBackend::Fcc => format!(
                "{}?format=json&longitude={}&latitude={}",
                endpoints.fcc_block, at.lng, at.lat
            ),
        }
    }

    pub fn normalize(&self, at: Coordinates, response: Value) -> Result<FipsGeography> {
        let fips = match self {
            ReverseBackend::Census => normalize_census(at, response)?,
            ReverseBackend::Fcc => normalize_fcc(at, response)?,
        };
        debug!(
            "{} placed ({}, {}) in state {} county {} tract {}",
            self.service(),
            at.lat,
            at.lng,
            fips.state,
            fips.county,
            fips.tract
        );
        Ok(fips)
    }
}

fn normalize_census(at: Coordinates, response: Value) -> Result<FipsGeography> {
    let service = ReverseBackend::Census.service();
    let parsed: CensusCoordinatesResponse = serde_json::from_value(response)
        .map_err(|e| Error::unexpected(service, e.to_string()))?;
    let geographies = parsed.result.geographies;

    let block = geographies
        .blocks
        .into_iter()
        .next()
        .ok_or_else(|| Error::unexpected(service, format!("no {} match", CENSUS_BLOCKS)))?;

    // Points outside any incorporated place simply have no place
    let place = geographies
        .places
        .into_iter()
        .next()
        .map(|p| IncorporatedPlace {
            fips: p.place,
            name: p.name,
        });
    if place.is_none() {
        debug!("({}, {}) is not within any of the {}", at.lat, at.lng, INCORPORATED_PLACES);
    }

    Ok(FipsGeography {
        coordinates: at,
        state: block.state,
        county: block.county,
        tract: block.tract,
        block_group: block.block_group,
        place,
    })
}

fn slice<'a>(service: &'static str, fips: &'a str, range: std::ops::Range<usize>) -> Result<&'a str> {
    fips.get(range.clone()).ok_or_else(|| {
        Error::unexpected(
            service,
            format!("FIPS code {:?} too short for characters {:?}", fips, range),
        )
    })
}

fn normalize_fcc(at: Coordinates, response: Value) -> Result<FipsGeography> {
    let service = ReverseBackend::Fcc.service();

    let status = response
        .get("status")
        .and_then(Value::as_str)
        .unwrap_or("missing");
    if status != "OK" {
        warn!("FCC block API returned status {}", status);
        return Err(Error::UpstreamStatus {
            service,
            status: status.to_string(),
        });
    }

    let parsed: FccResponse = serde_json::from_value(response)
        .map_err(|e| Error::unexpected(service, e.to_string()))?;

    // Block FIPS is SS CCC TTTTTT B BBB; county FIPS is SS CCC
    let block = parsed.block.fips.as_str();
    Ok(FipsGeography {
        coordinates: at,
        state: parsed.state.fips.clone(),
        county: slice(service, &parsed.county.fips, 2..parsed.county.fips.len())?.to_string(),
        tract: slice(service, block, 5..11)?.to_string(),
        block_group: slice(service, block, 11..12)?.to_string(),
        place: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn white_house() -> Coordinates {
        Coordinates::new(38.8976, -77.0365)
    }

    #[test]
    fn test_census_url() {
        assert_eq!(
            ReverseBackend::Census.build_url(&Endpoints::default(), white_house()),
            "https://geocoding.geo.census.gov/geocoder/geographies/coordinates?x=-77.0365&y=38.8976&benchmark=4&vintage=4&layers=8,12,28,84,86&format=jsonp"
        );
    }

    #[test]
    fn test_fcc_url() {
        assert_eq!(
            ReverseBackend::Fcc.build_url(&Endpoints::default(), white_house()),
            "https://data.fcc.gov/api/block/find?format=json&longitude=-77.0365&latitude=38.8976"
        );
    }

    #[test]
    fn test_census_with_place() {
        let response = json!({
            "result": {
                "geographies": {
                    "2010 Census Blocks": [{
                        "STATE": "11", "COUNTY": "001", "TRACT": "006202",
                        "BLKGRP": "1", "BLOCK": "1031"
                    }],
                    "Incorporated Places": [{"PLACE": "50000", "NAME": "Washington city"}]
                }
            }
        });
        let fips = ReverseBackend::Census.normalize(white_house(), response).unwrap();
        assert_eq!(fips.state, "11");
        assert_eq!(fips.county, "001");
        assert_eq!(fips.tract, "006202");
        assert_eq!(fips.block_group, "1");
        assert_eq!(
            fips.place,
            Some(IncorporatedPlace {
                fips: "50000".to_string(),
                name: "Washington city".to_string()
            })
        );
        assert_eq!(fips.coordinates, white_house());
    }

    #[test]
    fn test_census_outside_places() {
        let response = json!({
            "result": {
                "geographies": {
                    "2010 Census Blocks": [{"STATE": "30", "COUNTY": "049", "TRACT": "000100", "BLKGRP": "2"}],
                    "Incorporated Places": []
                }
            }
        });
        let fips = ReverseBackend::Census.normalize(white_house(), response).unwrap();
        assert!(fips.place.is_none());
        assert_eq!(fips.block_group, "2");
    }

    #[test]
    fn test_census_without_blocks() {
        let response = json!({"result": {"geographies": {}}});
        assert!(matches!(
            ReverseBackend::Census.normalize(white_house(), response),
            Err(Error::UnexpectedResponse { .. })
        ));
    }

    #[test]
    fn test_fcc_fips_offsets() {
        // 12 086 012300 1 002
        let response = json!({
            "Block": {"FIPS": "120860123001002"},
            "County": {"FIPS": "12086", "name": "Miami-Dade"},
            "State": {"FIPS": "12", "code": "FL", "name": "Florida"},
            "status": "OK"
        });
        let fips = ReverseBackend::Fcc.normalize(white_house(), response).unwrap();
        assert_eq!(fips.state, "12");
        assert_eq!(fips.county, "086");
        assert_eq!(fips.tract, "012300");
        assert_eq!(fips.block_group, "1");
        assert!(fips.place.is_none());
    }

    #[test]
    fn test_fcc_offsets_with_synthetic_fips() {
        let response = json!({
            "Block": {"FIPS": "ABCDEFGHIJKLMNO"},
            "County": {"FIPS": "ABCDE"},
            "State": {"FIPS": "AB"},
            "status": "OK"
        });
        let fips = ReverseBackend::Fcc.normalize(white_house(), response).unwrap();
        assert_eq!(fips.county, "CDE");
        assert_eq!(fips.tract, "FGHIJK");
        assert_eq!(fips.block_group, "L");
    }

    #[test]
    fn test_fcc_status_not_ok() {
        let response = json!({"status": "Fail", "Block": {"FIPS": null}});
        match ReverseBackend::Fcc.normalize(white_house(), response) {
            Err(Error::UpstreamStatus { status, .. }) => assert_eq!(status, "Fail"),
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[test]
    fn test_fcc_short_block_fips() {
        let response = json!({
            "Block": {"FIPS": "1208601"},
            "County": {"FIPS": "12086"},
            "State": {"FIPS": "12"},
            "status": "OK"
        });
        assert!(matches!(
            ReverseBackend::Fcc.normalize(white_house(), response),
            Err(Error::UnexpectedResponse { .. })
        ));
    }
}
