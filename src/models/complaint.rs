//! Complaint export rows consumed by the cleanup commands.

use serde::{Deserialize, Serialize};

use super::Coordinate;

/// One row of a complaint export.
///
/// Coordinates are kept as the raw cell text so rows round-trip unchanged
/// through the cleanup commands unless they are repaired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplaintRecord {
    pub id: String,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub latitude: Option<String>,

    #[serde(default)]
    pub longitude: Option<String>,

    #[serde(default)]
    pub location_text: Option<String>,

    #[serde(default)]
    pub workflow_status: Option<String>,

    #[serde(default)]
    pub submitted_at: Option<String>,
}

impl ComplaintRecord {
    /// Parsed coordinate, `None` if either cell is empty.
    ///
    /// Unparseable cells become NaN so validation rejects them instead of the
    /// row silently disappearing.
    pub fn coordinate(&self) -> Option<Coordinate> {
        let lat = self.latitude.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        let lng = self.longitude.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        Some(Coordinate::new(
            lat.parse().unwrap_or(f64::NAN),
            lng.parse().unwrap_or(f64::NAN),
        ))
    }

    pub fn set_coordinate(&mut self, coord: Coordinate) {
        self.latitude = Some(coord.latitude.to_string());
        self.longitude = Some(coord.longitude.to_string());
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled")
    }

    pub fn display_location(&self) -> &str {
        self.location_text.as_deref().unwrap_or("N/A")
    }
}
