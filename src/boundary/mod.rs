//! Municipal boundary validation.
//!
//! Loads a single GeoJSON boundary once, answers point-in-boundary queries
//! with ray casting plus a bounding-box fallback, and repairs coordinates
//! that fall outside.

mod checker;
mod error;
pub mod geometry;
mod repair;
mod source;

pub use checker::{BoundaryChecker, Containment};
pub use error::BoundaryError;
pub use geometry::Geometry;
pub use repair::{CoordinateRepairer, Repair, RepairStrategy};
pub use source::{Boundary, BoundarySource};
