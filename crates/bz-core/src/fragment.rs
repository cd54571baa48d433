//! Overlay outputs: raw intersection fragments and their per-zone aggregates.

use geo::MultiPolygon;

use crate::attr::Attributes;
use crate::zone::ZoneId;

/// One piece of a zone intersected with one reference feature.
#[derive(Debug, Clone)]
pub struct IntersectionFragment {
    pub zone_id: ZoneId,
    pub geometry: MultiPolygon<f64>,
    pub area: f64,
    /// Propagated attributes of the source feature; only declared fields, nulls omitted.
    pub attributes: Attributes,
}

/// One row per (zone, layer): the summed measure and first-seen attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneLayerAggregate {
    pub zone_id: ZoneId,
    /// Summed overlap area, or contained point count for point layers.
    pub measure: f64,
    pub attributes: Attributes,
}

impl ZoneLayerAggregate {
    #[must_use]
    pub fn new(zone_id: ZoneId, measure: f64) -> Self {
        Self {
            zone_id,
            measure,
            attributes: Attributes::new(),
        }
    }
}
