use geo_types::{
    Geometry, LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon,
};
use serde_json::{json, Value};

use super::{coord, coord_list, coord_lists};
use crate::error::{Error, Result};

fn positions(line: &LineString<f64>) -> Vec<[f64; 2]> {
    line.coords().map(|c| [c.x, c.y]).collect()
}

fn polygon_positions(polygon: &Polygon<f64>) -> Vec<Vec<[f64; 2]>> {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(positions)
        .collect()
}

fn polygon(rings: Vec<Vec<geo_types::Coord<f64>>>) -> Result<Polygon<f64>> {
    let mut rings = rings.into_iter().map(LineString::new);
    let exterior = rings
        .next()
        .ok_or_else(|| Error::Geometry("Polygon without rings".into()))?;
    Ok(Polygon::new(exterior, rings.collect()))
}

/// Parse a GeoJSON geometry object
pub(super) fn parse(value: &Value) -> Result<Geometry<f64>> {
    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::Geometry("GeoJSON geometry has no type".into()))?;
    let coordinates = value
        .get("coordinates")
        .ok_or_else(|| Error::Geometry(format!("{} has no coordinates", kind)))?;

    let geometry: Geometry<f64> = match kind {
        "Point" => Point::from(coord(coordinates)?).into(),
        "MultiPoint" => {
            MultiPoint::new(coord_list(coordinates)?.into_iter().map(Point::from).collect()).into()
        }
        "LineString" => LineString::new(coord_list(coordinates)?).into(),
        "MultiLineString" => MultiLineString::new(
            coord_lists(coordinates)?
                .into_iter()
                .map(LineString::new)
                .collect(),
        )
        .into(),
        "Polygon" => polygon(coord_lists(coordinates)?)?.into(),
        "MultiPolygon" => {
            let polygons = coordinates
                .as_array()
                .ok_or_else(|| Error::Geometry("MultiPolygon coordinates must be an array".into()))?
                .iter()
                .map(|p| coord_lists(p).and_then(polygon))
                .collect::<Result<Vec<_>>>()?;
            MultiPolygon::new(polygons).into()
        }
        other => {
            return Err(Error::Geometry(format!(
                "unsupported GeoJSON geometry type {}",
                other
            )))
        }
    };
    Ok(geometry)
}

/// Write a geometry as GeoJSON; `None` becomes `null`
pub(super) fn to_value(geometry: Option<&Geometry<f64>>) -> Result<Value> {
    let Some(geometry) = geometry else {
        return Ok(Value::Null);
    };

    let (kind, coordinates) = match geometry {
        Geometry::Point(p) => ("Point", json!([p.x(), p.y()])),
        Geometry::MultiPoint(mp) => (
            "MultiPoint",
            json!(mp.iter().map(|p| [p.x(), p.y()]).collect::<Vec<_>>()),
        ),
        Geometry::LineString(ls) => ("LineString", json!(positions(ls))),
        Geometry::MultiLineString(mls) => (
            "MultiLineString",
            json!(mls.iter().map(positions).collect::<Vec<_>>()),
        ),
        Geometry::Polygon(p) => ("Polygon", json!(polygon_positions(p))),
        Geometry::MultiPolygon(mp) => (
            "MultiPolygon",
            json!(mp.iter().map(polygon_positions).collect::<Vec<_>>()),
        ),
        other => {
            return Err(Error::Geometry(format!(
                "cannot express {:?} as GeoJSON",
                other
            )))
        }
    };
    Ok(json!({ "type": kind, "coordinates": coordinates }))
}
