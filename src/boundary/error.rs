use std::path::PathBuf;

use thiserror::Error;

/// Reasons a boundary file could not be turned into a usable geometry.
///
/// These never reach `is_inside`/`repair` callers: [`super::BoundarySource`]
/// logs them and degrades to [`super::Boundary::Absent`].
#[derive(Debug, Error)]
pub enum BoundaryError {
    #[error("failed to read boundary file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("boundary is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("boundary has no geometry or coordinates")]
    MissingGeometry,

    #[error("invalid {geometry} coordinates: {reason}")]
    InvalidCoordinates {
        geometry: &'static str,
        reason: String,
    },

    #[error("outer ring has {distinct} distinct vertices, need at least 3")]
    DegenerateRing { distinct: usize },
}
