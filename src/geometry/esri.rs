use geo::orient::{Direction, Orient};
use geo::{Contains, Winding};
use geo_types::{Geometry, LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon};
use serde_json::{json, Map, Value};

use super::{coord_list, coord_lists};
use crate::error::{Error, Result};

const WGS84_WKID: u32 = 4326;

/// Parse an ESRI geometry. Empty geometries come back as `None`.
pub(super) fn parse(value: &Value) -> Result<Option<Geometry<f64>>> {
    let obj = value
        .as_object()
        .ok_or_else(|| Error::Geometry("ESRI geometry must be an object".into()))?;

    if obj.contains_key("x") {
        let x = obj.get("x").and_then(Value::as_f64);
        let y = obj.get("y").and_then(Value::as_f64);
        return Ok(match (x, y) {
            (Some(x), Some(y)) => Some(Point::new(x, y).into()),
            _ => None,
        });
    }

    if let Some(points) = obj.get("points") {
        let points: Vec<Point<f64>> = coord_list(points)?.into_iter().map(Point::from).collect();
        return Ok((!points.is_empty()).then(|| MultiPoint::new(points).into()));
    }

    if let Some(paths) = obj.get("paths") {
        let mut lines: Vec<LineString<f64>> =
            coord_lists(paths)?.into_iter().map(LineString::new).collect();
        return Ok(match lines.len() {
            0 => None,
            1 => lines.pop().map(Geometry::LineString),
            _ => Some(MultiLineString::new(lines).into()),
        });
    }

    if let Some(rings) = obj.get("rings") {
        let rings = coord_lists(rings)?
            .into_iter()
            .filter(|r| r.len() >= 3)
            .map(|coords| {
                let mut ring = LineString::new(coords);
                ring.close();
                ring
            })
            .collect();
        return Ok(rings_to_geometry(rings));
    }

    Err(Error::Geometry(format!(
        "unrecognized ESRI geometry with keys {:?}",
        obj.keys().collect::<Vec<_>>()
    )))
}

/// Group ESRI rings into polygons: clockwise rings are exteriors, and each
/// counter-clockwise ring becomes a hole of the first exterior containing it.
fn rings_to_geometry(rings: Vec<LineString<f64>>) -> Option<Geometry<f64>> {
    let (mut outers, mut holes): (Vec<_>, Vec<_>) = rings.into_iter().partition(|r| r.is_cw());
    if outers.is_empty() {
        std::mem::swap(&mut outers, &mut holes);
    }

    let mut shells: Vec<(Polygon<f64>, Vec<LineString<f64>>)> = outers
        .into_iter()
        .map(|outer| (Polygon::new(outer, vec![]), Vec::new()))
        .collect();

    for hole in holes {
        match shells.iter_mut().find(|(shell, _)| shell.contains(&hole)) {
            Some((_, interiors)) => interiors.push(hole),
            // An orphan hole stands on its own
            None => shells.push((Polygon::new(hole, vec![]), Vec::new())),
        }
    }

    let mut polygons: Vec<Polygon<f64>> = shells
        .into_iter()
        .map(|(shell, interiors)| {
            let (exterior, _) = shell.into_inner();
            Polygon::new(exterior, interiors).orient(Direction::Default)
        })
        .collect();

    match polygons.len() {
        0 => None,
        1 => polygons.pop().map(Geometry::Polygon),
        _ => Some(MultiPolygon::new(polygons).into()),
    }
}

fn positions(line: &LineString<f64>) -> Vec<[f64; 2]> {
    line.coords().map(|c| [c.x, c.y]).collect()
}

fn polygon_rings(polygon: &Polygon<f64>) -> Vec<Vec<[f64; 2]>> {
    // ESRI: clockwise exterior, counter-clockwise holes
    let polygon = polygon.orient(Direction::Reversed);
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(positions)
        .collect()
}

/// Write a geometry as ESRI JSON in WGS84
pub(super) fn to_value(geometry: &Geometry<f64>) -> Result<Value> {
    let mut out = Map::new();
    match geometry {
        Geometry::Point(p) => {
            out.insert("x".into(), json!(p.x()));
            out.insert("y".into(), json!(p.y()));
        }
        Geometry::MultiPoint(mp) => {
            let points: Vec<[f64; 2]> = mp.iter().map(|p| [p.x(), p.y()]).collect();
            out.insert("points".into(), json!(points));
        }
        Geometry::LineString(ls) => {
            out.insert("paths".into(), json!([positions(ls)]));
        }
        Geometry::MultiLineString(mls) => {
            let paths: Vec<_> = mls.iter().map(positions).collect();
            out.insert("paths".into(), json!(paths));
        }
        Geometry::Polygon(p) => {
            out.insert("rings".into(), json!(polygon_rings(p)));
        }
        Geometry::MultiPolygon(mp) => {
            let rings: Vec<_> = mp.iter().flat_map(polygon_rings).collect();
            out.insert("rings".into(), json!(rings));
        }
        other => {
            return Err(Error::Geometry(format!(
                "cannot express {:?} as ESRI JSON",
                other
            )))
        }
    }
    out.insert("spatialReference".into(), json!({ "wkid": WGS84_WKID }));
    Ok(Value::Object(out))
}
