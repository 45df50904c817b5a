//! Coordinate and bounding box value types.

use geo::Coord;
use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in degrees.
///
/// Argument order everywhere in this crate is `(lat, lng)`; GeoJSON stores
/// `[lng, lat]`. Conversions live in [`Coordinate::from_geo`] and
/// [`Coordinate::to_geo`] only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Finite and within [-90, 90] / [-180, 180]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    pub fn from_geo(coord: Coord<f64>) -> Self {
        Self::new(coord.y, coord.x)
    }

    pub fn to_geo(self) -> Coord<f64> {
        Coord {
            x: self.longitude,
            y: self.latitude,
        }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// Axis-aligned bounding box in degrees. Edges are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    pub const fn new(min_lat: f64, max_lat: f64, min_lng: f64, max_lng: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lng,
            max_lng,
        }
    }

    /// Smallest box enclosing every coordinate, `None` for an empty iterator
    pub fn enclosing<I>(coords: I) -> Option<Self>
    where
        I: IntoIterator<Item = Coord<f64>>,
    {
        let mut iter = coords.into_iter().map(Coordinate::from_geo);
        let first = iter.next()?;
        let mut bbox = Self::new(
            first.latitude,
            first.latitude,
            first.longitude,
            first.longitude,
        );
        for c in iter {
            bbox.min_lat = bbox.min_lat.min(c.latitude);
            bbox.max_lat = bbox.max_lat.max(c.latitude);
            bbox.min_lng = bbox.min_lng.min(c.longitude);
            bbox.max_lng = bbox.max_lng.max(c.longitude);
        }
        Some(bbox)
    }

    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lng >= self.min_lng && lng <= self.max_lng
    }

    /// Clamp each axis independently into the box.
    ///
    /// NaN passes through unchanged so the caller's containment test rejects it.
    pub fn clamp(&self, lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(
            clamp_axis(lat, self.min_lat, self.max_lat),
            clamp_axis(lng, self.min_lng, self.max_lng),
        )
    }

    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lng + self.max_lng) / 2.0,
        )
    }
}

fn clamp_axis(value: f64, min: f64, max: f64) -> f64 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}
