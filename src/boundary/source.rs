//! Load-once boundary source.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing::{info, warn};

use super::{BoundaryError, Geometry};
use crate::models::BoundingBox;

/// The municipal boundary, or the marker that none could be loaded
#[derive(Debug, Clone, PartialEq)]
pub enum Boundary {
    Present(Geometry),
    Absent,
}

impl Boundary {
    pub fn from_geojson_str(text: &str) -> Result<Self, BoundaryError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        Geometry::from_geojson(&value).map(Boundary::Present)
    }

    pub fn geometry(&self) -> Option<&Geometry> {
        match self {
            Boundary::Present(g) => Some(g),
            Boundary::Absent => None,
        }
    }

    /// Short label for health output
    pub fn kind(&self) -> &'static str {
        match self {
            Boundary::Present(Geometry::Polygon(_)) => "polygon",
            Boundary::Present(Geometry::MultiPolygon(_)) => "multipolygon",
            Boundary::Present(Geometry::Unsupported { .. }) => "unsupported",
            Boundary::Absent => "absent",
        }
    }
}

#[derive(Debug)]
struct Loaded {
    boundary: Boundary,
    bbox: Option<BoundingBox>,
    raw: Option<String>,
}

impl Loaded {
    fn new(boundary: Boundary, raw: Option<String>) -> Self {
        let bbox = boundary.geometry().and_then(Geometry::bounding_box);
        Self {
            boundary,
            bbox,
            raw,
        }
    }
}

/// Reads one boundary file on first use and keeps the result, success or
/// absence, for the lifetime of the source.
///
/// Construct one per process and share it behind an `Arc`. Concurrent first
/// callers block until the single read finishes.
#[derive(Debug)]
pub struct BoundarySource {
    path: Option<PathBuf>,
    loaded: OnceLock<Loaded>,
}

impl BoundarySource {
    /// Lazily read `path` on first access
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            loaded: OnceLock::new(),
        }
    }

    /// Use an already-built boundary, no file access
    pub fn from_boundary(boundary: Boundary) -> Self {
        Self {
            path: None,
            loaded: OnceLock::from(Loaded::new(boundary, None)),
        }
    }

    /// Parse GeoJSON text held in memory; parse failures yield an absent boundary
    pub fn from_geojson_str(text: &str) -> Self {
        let loaded = match Boundary::from_geojson_str(text) {
            Ok(boundary) => Loaded::new(boundary, Some(text.to_string())),
            Err(e) => {
                warn!("Boundary not available, using bounding box fallback: {}", e);
                Loaded::new(Boundary::Absent, None)
            }
        };
        Self {
            path: None,
            loaded: OnceLock::from(loaded),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The boundary, reading the file on the first call
    pub fn load(&self) -> &Boundary {
        &self.get().boundary
    }

    /// Box over every vertex of the boundary, `None` if it is absent or has no positions
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.get().bbox
    }

    /// The file contents the boundary was parsed from
    pub fn raw(&self) -> Option<&str> {
        self.get().raw.as_deref()
    }

    fn get(&self) -> &Loaded {
        self.loaded.get_or_init(|| match &self.path {
            Some(path) => read_boundary(path),
            None => Loaded::new(Boundary::Absent, None),
        })
    }
}

fn read_boundary(path: &Path) -> Loaded {
    let result = fs::read_to_string(path)
        .map_err(|source| BoundaryError::Io {
            path: path.to_path_buf(),
            source,
        })
        .and_then(|text| Boundary::from_geojson_str(&text).map(|b| (b, text)));

    match result {
        Ok((boundary, text)) => {
            if let Boundary::Present(Geometry::Unsupported { kind, .. }) = &boundary {
                warn!("Unsupported boundary geometry type: {}", kind);
            }
            info!(
                "Loaded {} boundary from {}",
                boundary.kind(),
                path.display()
            );
            Loaded::new(boundary, Some(text))
        }
        Err(e) => {
            warn!("Boundary not available, using bounding box fallback: {}", e);
            Loaded::new(Boundary::Absent, None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Arc;

    const SQUARE: &str = r#"{
        "type": "Feature",
        "properties": {},
        "geometry": {
            "type": "Polygon",
            "coordinates": [[[0, 0], [0, 10], [10, 10], [10, 0]]]
        }
    }"#;

    #[test]
    fn test_missing_file_is_absent() {
        let source = BoundarySource::from_path("/nonexistent/boundary.json");
        assert_eq!(source.load(), &Boundary::Absent);
        assert!(source.bounding_box().is_none());
        assert!(source.raw().is_none());
    }

    #[test]
    fn test_corrupt_file_is_absent() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let source = BoundarySource::from_path(file.path());
        assert_eq!(source.load().kind(), "absent");
    }

    #[test]
    fn test_loads_and_caches() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", SQUARE).unwrap();
        let source = BoundarySource::from_path(file.path());

        assert_eq!(source.load().kind(), "polygon");
        assert_eq!(
            source.bounding_box(),
            Some(BoundingBox::new(0.0, 10.0, 0.0, 10.0))
        );

        // Cached: deleting the file changes nothing
        let path = file.path().to_path_buf();
        drop(file);
        assert!(!path.exists());
        assert_eq!(source.load().kind(), "polygon");
        assert_eq!(source.raw(), Some(SQUARE));
    }

    #[test]
    fn test_failed_load_not_retried() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("boundary.json");
        let source = BoundarySource::from_path(&path);
        assert_eq!(source.load(), &Boundary::Absent);

        fs::write(&path, SQUARE).unwrap();
        assert_eq!(source.load(), &Boundary::Absent);
    }

    #[test]
    fn test_concurrent_first_use() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", SQUARE).unwrap();
        let source = Arc::new(BoundarySource::from_path(file.path()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let source = Arc::clone(&source);
                std::thread::spawn(move || source.load().kind())
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), "polygon");
        }
    }

    #[test]
    fn test_injected_boundary() {
        let source = BoundarySource::from_boundary(Boundary::Absent);
        assert!(source.path().is_none());
        assert_eq!(source.load(), &Boundary::Absent);

        let source = BoundarySource::from_geojson_str(SQUARE);
        assert_eq!(source.load().kind(), "polygon");
    }
}
