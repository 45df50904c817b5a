//! Boundary geometry: GeoJSON parsing and even-odd ray casting.
//!
//! Coordinates follow GeoJSON order, `x = longitude`, `y = latitude`.

use geo::{Coord, CoordsIter, LineString, MultiPolygon, Polygon};
use serde::Deserialize;
use serde_json::Value;

use super::BoundaryError;
use crate::models::BoundingBox;

/// Geometry read from the boundary file
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Polygon(Polygon<f64>),
    MultiPolygon(MultiPolygon<f64>),
    /// Any other GeoJSON type. The box is derived from whatever positions
    /// the coordinates contain, if any.
    Unsupported {
        kind: String,
        bbox: Option<BoundingBox>,
    },
}

impl Geometry {
    pub fn kind(&self) -> &str {
        match self {
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiPolygon(_) => "MultiPolygon",
            Geometry::Unsupported { kind, .. } => kind,
        }
    }

    /// Box over every vertex of every ring, holes included
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        match self {
            Geometry::Polygon(p) => BoundingBox::enclosing(p.coords_iter()),
            Geometry::MultiPolygon(mp) => BoundingBox::enclosing(mp.coords_iter()),
            Geometry::Unsupported { bbox, .. } => *bbox,
        }
    }

    /// Parse a GeoJSON Feature or bare Geometry
    pub fn from_geojson(value: &Value) -> Result<Self, BoundaryError> {
        let geometry = match value.get("geometry") {
            Some(g) if g.is_object() => g,
            _ if value.get("coordinates").is_some() => value,
            _ => return Err(BoundaryError::MissingGeometry),
        };

        let raw = RawGeometry::deserialize(geometry)?;
        let coordinates = raw.coordinates.ok_or(BoundaryError::MissingGeometry)?;

        match raw.geo_type.as_str() {
            "Polygon" => {
                let rings: Vec<Vec<Vec<f64>>> = serde_json::from_value(coordinates)
                    .map_err(|e| invalid("Polygon", e.to_string()))?;
                Ok(Geometry::Polygon(build_polygon(rings)?))
            }
            "MultiPolygon" => {
                let polygons: Vec<Vec<Vec<Vec<f64>>>> = serde_json::from_value(coordinates)
                    .map_err(|e| invalid("MultiPolygon", e.to_string()))?;
                build_multi_polygon(polygons)
            }
            other => {
                let mut positions = Vec::new();
                collect_positions(&coordinates, &mut positions);
                Ok(Geometry::Unsupported {
                    kind: other.to_string(),
                    bbox: BoundingBox::enclosing(positions),
                })
            }
        }
    }
}

#[derive(Deserialize)]
struct RawGeometry {
    #[serde(rename = "type")]
    geo_type: String,
    coordinates: Option<Value>,
}

fn invalid(geometry: &'static str, reason: String) -> BoundaryError {
    BoundaryError::InvalidCoordinates { geometry, reason }
}

fn build_ring(positions: Vec<Vec<f64>>) -> Result<LineString<f64>, BoundaryError> {
    positions
        .into_iter()
        .map(|p| match p.as_slice() {
            [x, y, ..] => Ok(Coord { x: *x, y: *y }),
            _ => Err(invalid("Polygon", format!("position has {} values", p.len()))),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(LineString::new)
}

fn distinct_vertices(ring: &LineString<f64>) -> usize {
    let mut keys: Vec<(u64, u64)> = ring
        .coords()
        .map(|c| (c.x.to_bits(), c.y.to_bits()))
        .collect();
    keys.sort_unstable();
    keys.dedup();
    keys.len()
}

fn build_polygon(rings: Vec<Vec<Vec<f64>>>) -> Result<Polygon<f64>, BoundaryError> {
    let mut rings = rings.into_iter().map(build_ring);
    let exterior = rings.next().transpose()?.unwrap_or_else(|| LineString::new(vec![]));

    let distinct = distinct_vertices(&exterior);
    if distinct < 3 {
        return Err(BoundaryError::DegenerateRing { distinct });
    }

    let interiors = rings.collect::<Result<Vec<_>, _>>()?;
    Ok(Polygon::new(exterior, interiors))
}

fn build_multi_polygon(polygons: Vec<Vec<Vec<Vec<f64>>>>) -> Result<Geometry, BoundaryError> {
    let mut kept = Vec::with_capacity(polygons.len());
    let mut last_error = None;

    for (i, rings) in polygons.into_iter().enumerate() {
        match build_polygon(rings) {
            Ok(p) => kept.push(p),
            Err(e) => {
                tracing::warn!("Dropping MultiPolygon member {}: {}", i, e);
                last_error = Some(e);
            }
        }
    }

    if kept.is_empty() {
        return Err(last_error.unwrap_or(BoundaryError::DegenerateRing { distinct: 0 }));
    }

    Ok(Geometry::MultiPolygon(MultiPolygon::new(kept)))
}

/// Gather every `[x, y, ...]` leaf array in arbitrarily nested coordinates
fn collect_positions(value: &Value, out: &mut Vec<Coord<f64>>) {
    let Some(items) = value.as_array() else {
        return;
    };
    match (items.first().and_then(Value::as_f64), items.get(1).and_then(Value::as_f64)) {
        (Some(x), Some(y)) => out.push(Coord { x, y }),
        _ => {
            for item in items {
                collect_positions(item, out);
            }
        }
    }
}

/// Even-odd ray cast against a single ring.
///
/// An edge `(i, j)` is crossed when `(yi > y) != (yj > y)` and
/// `x < (xj - xi) * (y - yi) / (yj - yi) + xi`. Points exactly on an edge may
/// land on either side.
pub fn point_in_ring(point: Coord<f64>, ring: &LineString<f64>) -> bool {
    let (x, y) = (point.x, point.y);
    let coords = &ring.0;
    let mut inside = false;
    if coords.is_empty() {
        return inside;
    }

    let mut j = coords.len() - 1;
    for i in 0..coords.len() {
        let (xi, yi) = (coords[i].x, coords[i].y);
        let (xj, yj) = (coords[j].x, coords[j].y);

        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// Outer ring minus holes
pub fn point_in_polygon(point: Coord<f64>, polygon: &Polygon<f64>) -> bool {
    if !point_in_ring(point, polygon.exterior()) {
        return false;
    }
    !polygon
        .interiors()
        .iter()
        .any(|hole| point_in_ring(point, hole))
}
