//! Atomic zones: the fixed analysis units that receive a classification.

use geo::MultiPolygon;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::attr::Attributes;

/// Stable, unique identifier of an atomic zone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneId(String);

impl ZoneId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ZoneId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A zone polygon with its area computed once at load.
#[derive(Debug, Clone)]
pub struct AtomicZone {
    pub id: ZoneId,
    pub geometry: MultiPolygon<f64>,
    /// Area in shared-CRS units; the denominator of every area threshold.
    pub area: f64,
    /// Remaining scalar attributes of the source feature (without `unique_id`).
    pub attributes: Attributes,
}

/// Why a zone record was excluded from the analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// No `unique_id`, or one that cannot serve as a join key.
    MissingId,
    /// `unique_id` already used by an earlier zone.
    DuplicateId,
    /// Feature without geometry.
    MissingGeometry,
    /// Geometry that is not a polygon or multipolygon.
    NotPolygon,
    /// Polygon whose area is zero or not finite.
    NonPositiveArea,
}

impl SkipReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingId => "missing_id",
            Self::DuplicateId => "duplicate_id",
            Self::MissingGeometry => "missing_geometry",
            Self::NotPolygon => "not_polygon",
            Self::NonPositiveArea => "non_positive_area",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The immutable set of zones for one epoch run, in load order.
#[derive(Debug, Clone, Default)]
pub struct ZoneSet {
    zones: Vec<AtomicZone>,
    index: HashMap<ZoneId, usize>,
}

impl ZoneSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a zone, enforcing unique ids and a positive area.
    ///
    /// # Errors
    ///
    /// Returns the [`SkipReason`] when the zone cannot take part in the analysis.
    pub fn try_push(&mut self, zone: AtomicZone) -> Result<(), SkipReason> {
        if !(zone.area.is_finite() && zone.area > 0.0) {
            return Err(SkipReason::NonPositiveArea);
        }
        if self.index.contains_key(&zone.id) {
            return Err(SkipReason::DuplicateId);
        }
        self.index.insert(zone.id.clone(), self.zones.len());
        self.zones.push(zone);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, id: &ZoneId) -> Option<&AtomicZone> {
        self.index.get(id).map(|&i| &self.zones[i])
    }

    #[must_use]
    pub fn contains(&self, id: &ZoneId) -> bool {
        self.index.contains_key(id)
    }

    /// Load-order position of a zone.
    #[must_use]
    pub fn position(&self, id: &ZoneId) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AtomicZone> {
        self.zones.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

impl<'a> IntoIterator for &'a ZoneSet {
    type Item = &'a AtomicZone;
    type IntoIter = std::slice::Iter<'a, AtomicZone>;

    fn into_iter(self) -> Self::IntoIter {
        self.zones.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, MultiPolygon};

    fn zone(id: &str, area: f64) -> AtomicZone {
        let square = polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 1.0)];
        AtomicZone {
            id: ZoneId::new(id),
            geometry: MultiPolygon::new(vec![square]),
            area,
            attributes: Attributes::new(),
        }
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut set = ZoneSet::new();
        set.try_push(zone("a", 1.0)).unwrap();
        assert_eq!(set.try_push(zone("a", 2.0)), Err(SkipReason::DuplicateId));
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(&ZoneId::from("a")).unwrap().area, 1.0);
    }

    #[test]
    fn rejects_degenerate_area() {
        let mut set = ZoneSet::new();
        assert_eq!(set.try_push(zone("z", 0.0)), Err(SkipReason::NonPositiveArea));
        assert_eq!(set.try_push(zone("n", f64::NAN)), Err(SkipReason::NonPositiveArea));
        assert!(set.is_empty());
    }

    #[test]
    fn keeps_load_order() {
        let mut set = ZoneSet::new();
        for id in ["c", "a", "b"] {
            set.try_push(zone(id, 1.0)).unwrap();
        }
        let ids: Vec<_> = set.iter().map(|z| z.id.as_str().to_string()).collect();
        assert_eq!(ids, ["c", "a", "b"]);
        assert_eq!(set.position(&ZoneId::from("b")), Some(2));
    }
}
