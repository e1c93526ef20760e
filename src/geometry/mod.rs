//! ESRI JSON ⇄ GeoJSON conversion.
//!
//! Both formats are parsed into `geo_types` geometries and written back out,
//! so ring orientation is fixed up in one place: ESRI wants clockwise outer
//! rings, GeoJSON (RFC 7946) wants counter-clockwise ones.

mod esri;
mod geojson;

use geo_types::Coord;
use serde_json::{json, Map, Value};

use crate::error::{Error, Result};

/// Attributes ESRI services use as a feature id
const ID_ATTRIBUTES: &[&str] = &["OBJECTID", "FID"];

/// Convert an ESRI geometry, feature, or feature set to GeoJSON
pub fn esri_to_geojson(value: &Value) -> Result<Value> {
    if let Some(features) = value.get("features").and_then(Value::as_array) {
        let features = features
            .iter()
            .map(esri_feature_to_geojson)
            .collect::<Result<Vec<_>>>()?;
        return Ok(json!({ "type": "FeatureCollection", "features": features }));
    }

    if value.get("geometry").is_some() || value.get("attributes").is_some() {
        return esri_feature_to_geojson(value);
    }

    geojson::to_value(esri::parse(value)?.as_ref())
}

/// Convert a GeoJSON geometry, Feature, or FeatureCollection to ESRI JSON
pub fn geojson_to_esri(value: &Value) -> Result<Value> {
    match value.get("type").and_then(Value::as_str) {
        Some("FeatureCollection") => {
            let features = value
                .get("features")
                .and_then(Value::as_array)
                .ok_or_else(|| Error::Geometry("FeatureCollection without features".into()))?
                .iter()
                .map(geojson_feature_to_esri)
                .collect::<Result<Vec<_>>>()?;
            Ok(json!({ "features": features }))
        }
        Some("Feature") => geojson_feature_to_esri(value),
        Some(_) => esri::to_value(&geojson::parse(value)?),
        None => Err(Error::Geometry("GeoJSON object has no type".into())),
    }
}

fn esri_feature_to_geojson(feature: &Value) -> Result<Value> {
    let geometry = match feature.get("geometry") {
        Some(g) if !g.is_null() => geojson::to_value(esri::parse(g)?.as_ref())?,
        _ => Value::Null,
    };
    let properties = feature.get("attributes").cloned().unwrap_or(Value::Null);

    let mut out = Map::new();
    out.insert("type".into(), "Feature".into());
    out.insert("geometry".into(), geometry);
    if let Some(id) = ID_ATTRIBUTES
        .iter()
        .find_map(|key| properties.get(*key))
        .cloned()
    {
        out.insert("id".into(), id);
    }
    out.insert("properties".into(), properties);
    Ok(Value::Object(out))
}

fn geojson_feature_to_esri(feature: &Value) -> Result<Value> {
    let geometry = match feature.get("geometry") {
        Some(g) if !g.is_null() => esri::to_value(&geojson::parse(g)?)?,
        _ => Value::Null,
    };
    let attributes = match feature.get("properties") {
        Some(p) if !p.is_null() => p.clone(),
        _ => json!({}),
    };
    Ok(json!({ "geometry": geometry, "attributes": attributes }))
}

fn coord(value: &Value) -> Result<Coord<f64>> {
    let pair = value
        .as_array()
        .filter(|a| a.len() >= 2)
        .ok_or_else(|| Error::Geometry(format!("expected a position, got {}", value)))?;
    match (pair[0].as_f64(), pair[1].as_f64()) {
        (Some(x), Some(y)) => Ok(Coord { x, y }),
        _ => Err(Error::Geometry(format!("non-numeric position {}", value))),
    }
}

fn coord_list(value: &Value) -> Result<Vec<Coord<f64>>> {
    value
        .as_array()
        .ok_or_else(|| Error::Geometry(format!("expected a position list, got {}", value)))?
        .iter()
        .map(coord)
        .collect()
}

fn coord_lists(value: &Value) -> Result<Vec<Vec<Coord<f64>>>> {
    value
        .as_array()
        .ok_or_else(|| Error::Geometry(format!("expected nested position lists, got {}", value)))?
        .iter()
        .map(coord_list)
        .collect()
}
