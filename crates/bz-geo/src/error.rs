//! Geometry engine error types.

use std::path::PathBuf;

/// Errors raised while reading, reprojecting, or operating on vector data.
#[derive(Debug, thiserror::Error)]
pub enum GeoError {
    /// File could not be read or written.
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File is not valid GeoJSON.
    #[error("Invalid GeoJSON in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: Box<geojson::Error>,
    },

    /// GeoJSON serialization failed.
    #[error("Failed to serialize GeoJSON: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The legacy `crs` member is present but not understood.
    #[error("Unrecognized CRS definition: {0}")]
    UnrecognizedCrs(String),

    /// Input is not in the shared CRS and no transformation is available.
    #[error("CRS mismatch: found EPSG:{found}, expected EPSG:{expected}")]
    CrsMismatch { found: u32, expected: u32 },

    /// A feature's geometry is not of the family the operation needs.
    #[error("Unexpected {found} geometry (expected {expected})")]
    UnexpectedGeometry {
        found: &'static str,
        expected: &'static str,
    },
}
