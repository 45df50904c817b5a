//! Best-effort repair of out-of-bounds coordinates.

use serde::Serialize;

use super::BoundaryChecker;
use crate::models::Coordinate;

/// Which tier produced a repaired coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairStrategy {
    /// Input clamped into the bounding box, per axis
    Clamped,
    /// Center of the bounding box
    Centroid,
    /// Configured fallback point
    Fallback,
}

impl std::fmt::Display for RepairStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepairStrategy::Clamped => write!(f, "clamped"),
            RepairStrategy::Centroid => write!(f, "centroid"),
            RepairStrategy::Fallback => write!(f, "fallback"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Repair {
    pub coordinate: Coordinate,
    pub strategy: RepairStrategy,
}

/// Moves coordinates into the boundary: clamp, then box center, then the
/// fallback point.
///
/// The result is *a* valid point, not the nearest one.
#[derive(Debug, Clone)]
pub struct CoordinateRepairer {
    checker: BoundaryChecker,
}

impl CoordinateRepairer {
    pub fn new(checker: BoundaryChecker) -> Self {
        Self { checker }
    }

    pub fn checker(&self) -> &BoundaryChecker {
        &self.checker
    }

    pub fn repair(&self, lat: f64, lng: f64) -> Coordinate {
        self.repair_with_strategy(lat, lng).coordinate
    }

    pub fn repair_with_strategy(&self, lat: f64, lng: f64) -> Repair {
        let fallback = Repair {
            coordinate: self.checker.fallback().point,
            strategy: RepairStrategy::Fallback,
        };

        let Some(bbox) = self.checker.source().bounding_box() else {
            return fallback;
        };

        let clamped = bbox.clamp(lat, lng);
        if self.checker.contains(clamped) {
            return Repair {
                coordinate: clamped,
                strategy: RepairStrategy::Clamped,
            };
        }

        let center = bbox.center();
        if self.checker.contains(center) {
            return Repair {
                coordinate: center,
                strategy: RepairStrategy::Centroid,
            };
        }

        fallback
    }
}
