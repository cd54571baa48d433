//! # bz-geo
//!
//! Geometry engine for Blue Zones.
//!
//! The pipeline only talks to a [`GeometryEngine`]: read and write vector
//! layers, bring them into the shared CRS, and run the handful of polygon
//! operations the overlay needs. [`GeoEngine`] implements it with GeoJSON
//! files and the `geo` crate.

pub mod crs;
pub mod error;
pub mod io;
pub mod ops;

pub use crs::{Crs, Reprojector, SharedCrsOnly};
pub use error::GeoError;
pub use io::{VectorFeature, VectorLayer};

use geo::{Geometry, MultiPolygon, Point};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// The geometry operations the pipeline depends on.
pub trait GeometryEngine: Send + Sync {
    /// CRS every layer is brought into before overlay.
    fn target_crs(&self) -> Crs;

    /// # Errors
    ///
    /// Returns [`GeoError`] if the file cannot be read or parsed.
    fn read_vector(&self, path: &Path) -> Result<VectorLayer, GeoError>;

    /// # Errors
    ///
    /// Returns [`GeoError`] if serialization or the writer fails.
    fn write_vector(&self, writer: &mut dyn Write, layer: &VectorLayer) -> Result<(), GeoError>;

    /// # Errors
    ///
    /// Returns [`GeoError::CrsMismatch`] if the layer cannot be brought into
    /// [`Self::target_crs`].
    fn reproject(&self, layer: VectorLayer) -> Result<VectorLayer, GeoError>;

    fn intersection(&self, a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> MultiPolygon<f64>;

    fn area(&self, geometry: &MultiPolygon<f64>) -> f64;

    /// # Errors
    ///
    /// Returns [`GeoError::UnexpectedGeometry`] for non-line input.
    fn buffer(&self, geometry: &Geometry<f64>, distance: f64) -> Result<MultiPolygon<f64>, GeoError>;

    fn dissolve(&self, parts: &[MultiPolygon<f64>]) -> MultiPolygon<f64>;

    fn contains_point(&self, polygon: &MultiPolygon<f64>, point: &Point<f64>) -> bool;

    /// Read a layer and bring it into the target CRS.
    ///
    /// # Errors
    ///
    /// Any error of [`Self::read_vector`] or [`Self::reproject`].
    fn load_vector(&self, path: &Path) -> Result<VectorLayer, GeoError> {
        let layer = self.read_vector(path)?;
        self.reproject(layer)
    }
}

/// GeoJSON + `geo` implementation of [`GeometryEngine`].
#[derive(Clone)]
pub struct GeoEngine {
    target: Crs,
    reprojector: Arc<dyn Reprojector>,
}

impl GeoEngine {
    /// Engine targeting the shared CRS, accepting only data already in it.
    #[must_use]
    pub fn new() -> Self {
        Self::with_reprojector(Arc::new(SharedCrsOnly))
    }

    #[must_use]
    pub fn with_reprojector(reprojector: Arc<dyn Reprojector>) -> Self {
        Self {
            target: Crs::shared(),
            reprojector,
        }
    }
}

impl Default for GeoEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GeoEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeoEngine")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

impl GeometryEngine for GeoEngine {
    fn target_crs(&self) -> Crs {
        self.target
    }

    fn read_vector(&self, path: &Path) -> Result<VectorLayer, GeoError> {
        io::read_geojson(path)
    }

    fn write_vector(&self, writer: &mut dyn Write, layer: &VectorLayer) -> Result<(), GeoError> {
        io::write_geojson(writer, layer)
    }

    fn reproject(&self, layer: VectorLayer) -> Result<VectorLayer, GeoError> {
        self.reprojector.reproject(layer, self.target)
    }

    fn intersection(&self, a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> MultiPolygon<f64> {
        ops::intersection(a, b)
    }

    fn area(&self, geometry: &MultiPolygon<f64>) -> f64 {
        ops::area(geometry)
    }

    fn buffer(&self, geometry: &Geometry<f64>, distance: f64) -> Result<MultiPolygon<f64>, GeoError> {
        ops::buffer(geometry, distance)
    }

    fn dissolve(&self, parts: &[MultiPolygon<f64>]) -> MultiPolygon<f64> {
        ops::dissolve(parts)
    }

    fn contains_point(&self, polygon: &MultiPolygon<f64>, point: &Point<f64>) -> bool {
        ops::contains_point(polygon, point)
    }
}
