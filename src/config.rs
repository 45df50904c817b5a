//! Configuration and the municipality fallback constants.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::{BoundingBox, Coordinate};

/// Approximate extent of Digos City, used when the boundary file is unavailable.
pub const FALLBACK_BBOX: BoundingBox = BoundingBox::new(
    6.723538983841018,
    6.965492445653091,
    125.26411236448983,
    125.3873999021893,
);

/// Known-good point inside Digos City, the last resort of coordinate repair.
pub const FALLBACK_POINT: Coordinate = Coordinate::new(6.85, 125.35);

pub const DEFAULT_BOUNDARY_PATH: &str = "assets/digos-city-boundary.json";
pub const DEFAULT_LISTEN: &str = "0.0.0.0:3000";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub boundary: BoundaryConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BoundaryConfig {
    pub path: PathBuf,
    pub fallback_bbox: BoundingBox,
    /// Set to false to fail open when the boundary file is missing
    pub fallback_bbox_enabled: bool,
    pub fallback_point: Coordinate,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_BOUNDARY_PATH),
            fallback_bbox: FALLBACK_BBOX,
            fallback_bbox_enabled: true,
            fallback_point: FALLBACK_POINT,
        }
    }
}

impl BoundaryConfig {
    pub fn fallback(&self) -> FallbackPolicy {
        FallbackPolicy {
            bbox: self.fallback_bbox_enabled.then_some(self.fallback_bbox),
            point: self.fallback_point,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: DEFAULT_LISTEN.to_string(),
        }
    }
}

/// What the checker and repairer fall back to without a usable boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallbackPolicy {
    /// `None` means fail open
    pub bbox: Option<BoundingBox>,
    pub point: Coordinate,
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self {
            bbox: Some(FALLBACK_BBOX),
            point: FALLBACK_POINT,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Load `path` if given, otherwise defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from_file(p),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_use_digos_constants() {
        let config = Config::default();
        assert_eq!(config.boundary.path, PathBuf::from(DEFAULT_BOUNDARY_PATH));
        assert_eq!(config.boundary.fallback(), FallbackPolicy::default());
        assert_eq!(config.server.listen, DEFAULT_LISTEN);
    }

    #[test]
    fn test_fallback_point_inside_fallback_bbox() {
        assert!(FALLBACK_BBOX.contains(FALLBACK_POINT.latitude, FALLBACK_POINT.longitude));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[boundary]
path = "/srv/boundary.geojson"
fallback_bbox_enabled = false

[server]
listen = "127.0.0.1:8080"
"#
        )
        .unwrap();

        let config = Config::load_from_file(file.path()).unwrap();
        assert_eq!(config.boundary.path, PathBuf::from("/srv/boundary.geojson"));
        assert_eq!(config.boundary.fallback().bbox, None);
        assert_eq!(config.boundary.fallback().point, FALLBACK_POINT);
        assert_eq!(config.server.listen, "127.0.0.1:8080");
    }

    #[test]
    fn test_custom_fallback_bbox() {
        let config: Config = toml::from_str(
            r#"
[boundary.fallback_bbox]
minLat = 0.0
maxLat = 1.0
minLng = 2.0
maxLng = 3.0
"#,
        )
        .unwrap();
        assert_eq!(
            config.boundary.fallback().bbox,
            Some(BoundingBox::new(0.0, 1.0, 2.0, 3.0))
        );
    }

    #[test]
    fn test_example_config_matches_defaults() {
        let config: Config = toml::from_str(include_str!("../jurisdiction.example.toml")).unwrap();
        assert_eq!(config.boundary.fallback(), FallbackPolicy::default());
        assert_eq!(config.boundary.path, PathBuf::from(DEFAULT_BOUNDARY_PATH));
    }

    #[test]
    fn test_missing_file_errors() {
        assert!(Config::load_from_file("/nonexistent/jurisdiction.toml").is_err());
    }
}
