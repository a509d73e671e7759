//! Geometry error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::Crs;

/// Result type for geometry operations.
pub type GeometryResult<T> = Result<T, GeometryError>;

/// Errors raised while loading or combining geometries.
///
/// All of these surface before any network activity.
#[derive(Debug, Error)]
pub enum GeometryError {
    /// Region and grid are expressed in different reference systems.
    #[error("coordinate system mismatch: region is {region}, grid is {grid}")]
    CrsMismatch { region: Crs, grid: Crs },

    /// The region has no extent (no polygons, or only degenerate ones).
    #[error("region is empty")]
    EmptyRegion,

    /// A geometry of an unsupported kind was supplied.
    #[error("unsupported geometry in {source_name}: expected POLYGON or MULTIPOLYGON, found {kind}")]
    UnsupportedGeometry { source_name: String, kind: String },

    /// Two grid tiles share the same name.
    #[error("grid contains duplicate tile name '{name}'")]
    DuplicateTile { name: String },

    /// Failed to read a geometry file.
    #[error("failed to read {}: {source}", path.display())]
    ReadFailed { path: PathBuf, source: io::Error },

    /// Failed to parse WKT or grid JSON.
    #[error("failed to parse {source_name}: {reason}")]
    ParseFailed { source_name: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crs_mismatch_display() {
        let err = GeometryError::CrsMismatch {
            region: Crs::WGS84,
            grid: Crs::from_epsg(32632),
        };
        assert_eq!(
            err.to_string(),
            "coordinate system mismatch: region is EPSG:4326, grid is EPSG:32632"
        );
    }

    #[test]
    fn test_parse_failed_names_source() {
        let err = GeometryError::ParseFailed {
            source_name: "grid.json".to_string(),
            reason: "expected value".to_string(),
        };
        assert!(err.to_string().contains("grid.json"));
    }
}
