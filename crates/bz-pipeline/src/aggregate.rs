//! Fragment aggregation: one row per zone per layer.

use bz_core::{IntersectionFragment, ZoneId, ZoneLayerAggregate};
use std::collections::HashMap;

/// Sum fragment areas per zone and reduce attributes with "first non-null".
///
/// Output is in order of each zone's first fragment. Zones without fragments
/// are absent.
#[must_use]
pub fn aggregate(fragments: &[IntersectionFragment]) -> Vec<ZoneLayerAggregate> {
    let mut index: HashMap<&ZoneId, usize> = HashMap::new();
    let mut rows: Vec<ZoneLayerAggregate> = Vec::new();

    for fragment in fragments {
        let position = *index.entry(&fragment.zone_id).or_insert_with(|| {
            rows.push(ZoneLayerAggregate::new(fragment.zone_id.clone(), 0.0));
            rows.len() - 1
        });
        let row = &mut rows[position];
        row.measure += fragment.area;
        for (key, value) in &fragment.attributes {
            row.attributes
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
    }
    rows
}
