//! Jurisdiction - municipal boundary validation for complaint intake
//!
//! This library provides the boundary core and the cleanup commands shared by
//! the `serve` and `sweep` binaries.

pub mod boundary;
pub mod cleanup;
pub mod config;
pub mod models;
pub mod telemetry;

pub use boundary::{Boundary, BoundaryChecker, BoundarySource, CoordinateRepairer};
pub use config::Config;
pub use models::{BoundingBox, Coordinate};
