//! Jurisdiction containment checks.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use super::geometry::point_in_polygon;
use super::{Boundary, BoundarySource, Geometry};
use crate::config::FallbackPolicy;
use crate::models::Coordinate;

/// Why a coordinate was judged inside or outside
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Containment {
    /// Not finite or outside the global lat/lng ranges
    InvalidInput,
    /// Inside the boundary polygon(s)
    Polygon,
    /// Missed the polygon test but inside the boundary's bounding box
    BoundingBox,
    /// Boundary absent, inside the configured fallback box
    FallbackBox,
    /// Nothing to test against
    FailOpen,
    Outside,
}

impl Containment {
    pub fn is_inside(self) -> bool {
        matches!(
            self,
            Containment::Polygon
                | Containment::BoundingBox
                | Containment::FallbackBox
                | Containment::FailOpen
        )
    }
}

/// Decides whether a coordinate lies within the municipal boundary.
///
/// A polygon miss still counts as inside when the point is within the
/// boundary's bounding box. Existing complaint data depends on this.
#[derive(Debug, Clone)]
pub struct BoundaryChecker {
    source: Arc<BoundarySource>,
    fallback: FallbackPolicy,
}

impl BoundaryChecker {
    pub fn new(source: Arc<BoundarySource>, fallback: FallbackPolicy) -> Self {
        Self { source, fallback }
    }

    pub fn source(&self) -> &BoundarySource {
        &self.source
    }

    pub fn fallback(&self) -> &FallbackPolicy {
        &self.fallback
    }

    pub fn is_inside(&self, lat: f64, lng: f64) -> bool {
        self.classify(lat, lng).is_inside()
    }

    pub fn contains(&self, coord: Coordinate) -> bool {
        self.is_inside(coord.latitude, coord.longitude)
    }

    pub fn classify(&self, lat: f64, lng: f64) -> Containment {
        let coord = Coordinate::new(lat, lng);
        if !coord.is_valid() {
            return Containment::InvalidInput;
        }
        let point = coord.to_geo();

        match self.source.load() {
            Boundary::Absent => match self.fallback.bbox {
                Some(bbox) if bbox.contains(lat, lng) => Containment::FallbackBox,
                Some(_) => Containment::Outside,
                None => Containment::FailOpen,
            },
            Boundary::Present(Geometry::Polygon(polygon)) => {
                if point_in_polygon(point, polygon) {
                    Containment::Polygon
                } else {
                    self.bounding_box_fallback(lat, lng, Containment::Outside)
                }
            }
            Boundary::Present(Geometry::MultiPolygon(polygons)) => {
                if polygons.iter().any(|p| point_in_polygon(point, p)) {
                    Containment::Polygon
                } else {
                    self.bounding_box_fallback(lat, lng, Containment::Outside)
                }
            }
            Boundary::Present(Geometry::Unsupported { .. }) => {
                self.bounding_box_fallback(lat, lng, Containment::FailOpen)
            }
        }
    }

    /// Bounding-box-only check, failing open when no box can be derived
    pub fn is_inside_bounds(&self, lat: f64, lng: f64) -> bool {
        if !Coordinate::new(lat, lng).is_valid() {
            return false;
        }
        self.source
            .bounding_box()
            .map_or(true, |bbox| bbox.contains(lat, lng))
    }

    fn bounding_box_fallback(&self, lat: f64, lng: f64, no_bbox: Containment) -> Containment {
        match self.source.bounding_box() {
            Some(bbox) if bbox.contains(lat, lng) => {
                debug!("Polygon check failed but coordinates within bounding box, allowing");
                Containment::BoundingBox
            }
            Some(_) => {
                debug!("Coordinates outside boundary");
                Containment::Outside
            }
            None => no_bbox,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FALLBACK_BBOX, FALLBACK_POINT};

    fn checker_for(geojson: &str) -> BoundaryChecker {
        BoundaryChecker::new(
            Arc::new(BoundarySource::from_geojson_str(geojson)),
            FallbackPolicy::default(),
        )
    }

    fn absent(fallback: FallbackPolicy) -> BoundaryChecker {
        BoundaryChecker::new(
            Arc::new(BoundarySource::from_boundary(Boundary::Absent)),
            fallback,
        )
    }

    const SQUARE: &str = r#"{"type": "Polygon", "coordinates": [[[0, 0], [0, 10], [10, 10], [10, 0]]]}"#;

    // L shape: the square [0,10]x[0,10] minus its upper-right quadrant
    const L_SHAPE: &str = r#"{"type": "Polygon", "coordinates": [[[0, 0], [10, 0], [10, 5], [5, 5], [5, 10], [0, 10]]]}"#;

    const HOLED: &str = r#"{"type": "Polygon", "coordinates": [
        [[0, 0], [0, 10], [10, 10], [10, 0]],
        [[4, 4], [4, 6], [6, 6], [6, 4]]
    ]}"#;

    const TWO_SQUARES: &str = r#"{"type": "Feature", "geometry": {"type": "MultiPolygon", "coordinates": [
        [[[0, 0], [0, 2], [2, 2], [2, 0]]],
        [[[8, 8], [8, 10], [10, 10], [10, 8]]]
    ]}}"#;

    #[test]
    fn test_square_scenario() {
        let checker = checker_for(SQUARE);
        assert!(checker.is_inside(5.0, 5.0));
        assert_eq!(checker.classify(5.0, 5.0), Containment::Polygon);
        assert!(!checker.is_inside(50.0, 50.0));
        // Corner: the ray cast misses, the inclusive box catches it
        assert_eq!(checker.classify(10.0, 10.0), Containment::BoundingBox);
        assert!(checker.is_inside(10.0, 10.0));
    }

    #[test]
    fn test_invalid_input_rejected_regardless_of_boundary() {
        for checker in [
            checker_for(SQUARE),
            absent(FallbackPolicy::default()),
            absent(FallbackPolicy {
                bbox: None,
                point: FALLBACK_POINT,
            }),
        ] {
            assert!(!checker.is_inside(91.0, 5.0));
            assert!(!checker.is_inside(f64::NAN, 5.0));
            assert!(!checker.is_inside(5.0, 181.0));
            assert!(!checker.is_inside(5.0, -200.0));
            assert!(!checker.is_inside(f64::INFINITY, 5.0));
            assert_eq!(checker.classify(91.0, 5.0), Containment::InvalidInput);
        }
    }

    #[test]
    fn test_absent_uses_fallback_box() {
        let checker = absent(FallbackPolicy::default());
        assert_eq!(
            checker.classify(FALLBACK_POINT.latitude, FALLBACK_POINT.longitude),
            Containment::FallbackBox
        );
        assert!(checker.is_inside(FALLBACK_BBOX.min_lat, FALLBACK_BBOX.max_lng));
        assert!(!checker.is_inside(14.5995, 120.9842));
    }

    #[test]
    fn test_absent_without_fallback_fails_open() {
        let checker = absent(FallbackPolicy {
            bbox: None,
            point: FALLBACK_POINT,
        });
        assert_eq!(checker.classify(-45.0, 170.0), Containment::FailOpen);
        assert!(checker.is_inside(0.0, 0.0));
    }

    #[test]
    fn test_hole_is_outside_polygon_but_inside_box() {
        let checker = checker_for(HOLED);
        assert_eq!(checker.classify(5.0, 5.0), Containment::BoundingBox);
        assert!(checker.is_inside(5.0, 5.0));
        assert_eq!(checker.classify(2.0, 2.0), Containment::Polygon);
    }

    #[test]
    fn test_concave_notch_allowed_by_box() {
        let checker = checker_for(L_SHAPE);
        assert_eq!(checker.classify(2.0, 2.0), Containment::Polygon);
        assert_eq!(checker.classify(8.0, 8.0), Containment::BoundingBox);
        assert_eq!(checker.classify(12.0, 8.0), Containment::Outside);
    }

    #[test]
    fn test_multipolygon_scenario() {
        let checker = checker_for(TWO_SQUARES);
        assert_eq!(checker.classify(9.0, 9.0), Containment::Polygon);
        assert_eq!(checker.classify(1.0, 1.0), Containment::Polygon);
        assert_eq!(checker.classify(5.0, 5.0), Containment::BoundingBox);
        assert!(!checker.is_inside(11.0, 5.0));
        assert!(!checker.is_inside(-1.0, -1.0));
    }

    #[test]
    fn test_lat_lng_not_transposed() {
        // Tall rectangle: lng 0..2, lat 0..10
        let checker = checker_for(
            r#"{"type": "Polygon", "coordinates": [[[0, 0], [2, 0], [2, 10], [0, 10]]]}"#,
        );
        assert!(checker.is_inside(8.0, 1.0));
        assert!(!checker.is_inside(1.0, 8.0));
    }

    #[test]
    fn test_unsupported_geometry() {
        let checker = checker_for(r#"{"type": "LineString", "coordinates": [[0, 0], [10, 10]]}"#);
        assert_eq!(checker.classify(5.0, 5.0), Containment::BoundingBox);
        assert_eq!(checker.classify(20.0, 5.0), Containment::Outside);

        let checker = checker_for(r#"{"type": "GeometryCollection", "coordinates": []}"#);
        assert_eq!(checker.classify(20.0, 5.0), Containment::FailOpen);
    }

    #[test]
    fn test_bounds_only_check() {
        let checker = checker_for(L_SHAPE);
        assert!(checker.is_inside_bounds(8.0, 8.0));
        assert!(!checker.is_inside_bounds(11.0, 8.0));
        assert!(!checker.is_inside_bounds(f64::NAN, 8.0));

        let checker = absent(FallbackPolicy::default());
        assert!(checker.is_inside_bounds(0.0, 0.0));
    }

    #[test]
    fn test_bbox_centroid_inside_simple_polygon() {
        for geojson in [SQUARE, TWO_SQUARES, L_SHAPE] {
            let checker = checker_for(geojson);
            let center = checker.source().bounding_box().unwrap().center();
            assert!(checker.contains(center));
        }
    }
}
