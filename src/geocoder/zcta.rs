//! ZIP code → coordinates through the static ZCTA centroid table.

use serde::Deserialize;
use serde_json::Value;

use super::number_or_string;
use crate::error::{Error, Result};
use crate::models::Coordinates;

const SERVICE: &str = "ZCTA table";

/// Table entries are `[lat, lng]` pairs; object entries are accepted too
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ZctaEntry {
    Pair([f64; 2]),
    Object {
        #[serde(deserialize_with = "number_or_string")]
        lat: f64,
        #[serde(alias = "lon", deserialize_with = "number_or_string")]
        lng: f64,
    },
}

/// Find `zip` in the fetched table. `Ok(None)` means the table has no such ZIP.
pub fn lookup(table: &Value, zip: &str) -> Result<Option<Coordinates>> {
    let map = table
        .as_object()
        .ok_or_else(|| Error::unexpected(SERVICE, "table is not a JSON object"))?;

    let Some(entry) = map.get(zip.trim()) else {
        return Ok(None);
    };

    let entry: ZctaEntry = serde_json::from_value(entry.clone())
        .map_err(|e| Error::unexpected(SERVICE, format!("entry for {}: {}", zip, e)))?;

    Ok(Some(match entry {
        ZctaEntry::Pair([lat, lng]) => Coordinates::new(lat, lng),
        ZctaEntry::Object { lat, lng } => Coordinates::new(lat, lng),
    }))
}
