//! Coordinate reference systems and the reprojection seam.
//!
//! Every layer must be in the shared projected CRS before any overlay. The
//! shipped [`SharedCrsOnly`] reprojector accepts data that is already there
//! and rejects everything else; a transforming implementation can be plugged
//! into [`crate::GeoEngine::with_reprojector`].

use serde_json::Value;
use std::fmt;

use crate::error::GeoError;
use crate::io::VectorLayer;

/// A CRS identified by its EPSG code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Crs(u32);

impl Crs {
    /// WGS 84 geographic, also used for `OGC:CRS84`.
    pub const WGS84: Self = Self(4326);

    #[must_use]
    pub const fn epsg(code: u32) -> Self {
        Self(code)
    }

    /// The shared projected CRS of the analysis.
    #[must_use]
    pub const fn shared() -> Self {
        Self(bz_core::rules::SHARED_EPSG)
    }

    #[must_use]
    pub const fn code(self) -> u32 {
        self.0
    }

    /// OGC URN used when writing the legacy `crs` member.
    #[must_use]
    pub fn urn(self) -> String {
        format!("urn:ogc:def:crs:EPSG::{}", self.0)
    }

    /// Parse a CRS name such as `EPSG:2263`, `urn:ogc:def:crs:EPSG::2263`,
    /// or `urn:ogc:def:crs:OGC:1.3:CRS84`.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::UnrecognizedCrs`] for any other form.
    pub fn parse(name: &str) -> Result<Self, GeoError> {
        let trimmed = name.trim();
        let upper = trimmed.to_ascii_uppercase();
        if upper.ends_with("CRS84") {
            return Ok(Self::WGS84);
        }
        if !upper.contains("EPSG") {
            return Err(GeoError::UnrecognizedCrs(trimmed.to_string()));
        }
        upper
            .rsplit(':')
            .next()
            .and_then(|code| code.parse::<u32>().ok())
            .map(Self)
            .ok_or_else(|| GeoError::UnrecognizedCrs(trimmed.to_string()))
    }

    /// Read the legacy GeoJSON `crs` member (`{"type": "name", "properties": {"name": ...}}`).
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::UnrecognizedCrs`] when the member exists but is not
    /// a named EPSG/OGC CRS.
    pub fn from_member(member: &Value) -> Result<Self, GeoError> {
        member
            .get("properties")
            .and_then(|p| p.get("name"))
            .and_then(Value::as_str)
            .ok_or_else(|| GeoError::UnrecognizedCrs(member.to_string()))
            .and_then(Self::parse)
    }

    /// Build the legacy `crs` member for this CRS.
    #[must_use]
    pub fn to_member(self) -> Value {
        serde_json::json!({
            "type": "name",
            "properties": { "name": self.urn() }
        })
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.0)
    }
}

/// Brings a layer into a target CRS.
pub trait Reprojector: Send + Sync {
    /// # Errors
    ///
    /// Returns [`GeoError::CrsMismatch`] when the layer cannot be brought into `target`.
    fn reproject(&self, layer: VectorLayer, target: Crs) -> Result<VectorLayer, GeoError>;
}

/// Accepts layers already in the target CRS, or with no declared CRS.
#[derive(Debug, Clone, Copy, Default)]
pub struct SharedCrsOnly;

impl Reprojector for SharedCrsOnly {
    fn reproject(&self, mut layer: VectorLayer, target: Crs) -> Result<VectorLayer, GeoError> {
        match layer.crs {
            Some(found) if found != target => Err(GeoError::CrsMismatch {
                found: found.code(),
                expected: target.code(),
            }),
            _ => {
                layer.crs = Some(target);
                Ok(layer)
            }
        }
    }
}
