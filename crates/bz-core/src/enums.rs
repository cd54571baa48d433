//! Epoch, geometry-kind, and measure enums.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// Epoch
// ---------------------------------------------------------------------------

/// One of the three independent temporal analysis contexts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Epoch {
    Past,
    Present,
    Future,
}

impl Epoch {
    /// Every epoch, in run order.
    pub const ALL: [Self; 3] = [Self::Past, Self::Present, Self::Future];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Past => "past",
            Self::Present => "present",
            Self::Future => "future",
        }
    }

    /// Name of the unioned Blue Zone column in the final table.
    #[must_use]
    pub const fn union_column(self) -> &'static str {
        match self {
            Self::Past => "BZ_past",
            Self::Present => "BZ_present",
            Self::Future => "BZ_future",
        }
    }

    /// File name of the final wide table.
    #[must_use]
    pub fn union_file_name(self) -> String {
        format!("{}_union.csv", self.as_str())
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Epoch {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "past" => Ok(Self::Past),
            "present" => Ok(Self::Present),
            "future" => Ok(Self::Future),
            other => Err(CoreError::UnknownEpoch(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// GeometryKind
// ---------------------------------------------------------------------------

/// Geometry family of a reference layer's source features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometryKind {
    Polygon,
    Line,
    Point,
}

impl GeometryKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Polygon => "polygon",
            Self::Line => "line",
            Self::Point => "point",
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// MeasureKind
// ---------------------------------------------------------------------------

/// How a layer's per-zone measure is computed and thresholded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasureKind {
    /// Summed intersection area, compared against a fraction of the zone area.
    Area,
    /// Number of contained points, compared against a fixed count.
    PointCount,
}

impl MeasureKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Area => "area",
            Self::PointCount => "point_count",
        }
    }
}

impl fmt::Display for MeasureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_parses_case_insensitively() {
        assert_eq!("Past".parse::<Epoch>().unwrap(), Epoch::Past);
        assert_eq!(" future ".parse::<Epoch>().unwrap(), Epoch::Future);
        assert!("someday".parse::<Epoch>().is_err());
    }

    #[test]
    fn union_columns_are_distinct() {
        assert_eq!(Epoch::Past.union_column(), "BZ_past");
        assert_eq!(Epoch::Present.union_column(), "BZ_present");
        assert_eq!(Epoch::Future.union_column(), "BZ_future");
        assert_eq!(Epoch::Present.union_file_name(), "present_union.csv");
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&MeasureKind::PointCount).unwrap();
        assert_eq!(json, "\"point_count\"");
        let epoch: Epoch = serde_json::from_str("\"present\"").unwrap();
        assert_eq!(epoch, Epoch::Present);
    }
}
