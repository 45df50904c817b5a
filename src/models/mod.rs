//! Value types shared by the boundary core and the cleanup commands.

pub mod complaint;
pub mod coordinate;

pub use complaint::ComplaintRecord;
pub use coordinate::{BoundingBox, Coordinate};
