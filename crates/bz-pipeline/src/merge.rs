//! Cross-table merge: zones plus every layer's aggregates in one wide table.
//!
//! The zone set is the anchor. Every zone gets exactly one row, layer data is
//! placed by zone id in a single pass per layer, and absent aggregates are
//! zero-filled before classification.

use bz_core::rules::{AREA_FIELD, UNIQUE_ID_FIELD, ZONE_ATTRIBUTE_PREFIX};
use bz_core::{Attributes, Epoch, LayerSpec, ZoneId, ZoneLayerAggregate, ZoneSet};
use std::collections::BTreeSet;

use crate::threshold;

/// Aggregates of one layer, ready to merge.
#[derive(Debug, Clone)]
pub struct LayerResult {
    pub spec: &'static LayerSpec,
    pub aggregates: Vec<ZoneLayerAggregate>,
}

/// One zone's values for one layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerCell {
    pub measure: f64,
    pub attributes: Attributes,
    pub flag: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EpochRow {
    pub zone_id: ZoneId,
    pub area: f64,
    pub zone_attributes: Attributes,
    /// One cell per layer, in catalog order.
    pub cells: Vec<LayerCell>,
    pub blue_zone: bool,
}

/// Per-layer merge statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayerMergeStats {
    /// Zones with an aggregate row for the layer.
    pub touched: usize,
    pub flagged: usize,
    /// Aggregate rows whose zone is not in the zone set.
    pub orphans: usize,
}

/// The final wide table of one epoch.
#[derive(Debug, Clone)]
pub struct EpochTable {
    pub epoch: Epoch,
    layers: Vec<&'static LayerSpec>,
    zone_columns: Vec<String>,
    pub rows: Vec<EpochRow>,
    pub stats: Vec<LayerMergeStats>,
}

impl EpochTable {
    /// Merge layer results onto the zone set and classify every row.
    #[must_use]
    pub fn merge(epoch: Epoch, zones: &ZoneSet, results: &[LayerResult]) -> Self {
        let zone_columns: BTreeSet<&String> =
            zones.iter().flat_map(|zone| zone.attributes.keys()).collect();
        let zone_columns: Vec<String> = zone_columns.into_iter().cloned().collect();

        let mut rows: Vec<EpochRow> = zones
            .iter()
            .map(|zone| EpochRow {
                zone_id: zone.id.clone(),
                area: zone.area,
                zone_attributes: zone.attributes.clone(),
                cells: Vec::with_capacity(results.len()),
                blue_zone: false,
            })
            .collect();

        let mut stats = Vec::with_capacity(results.len());
        for result in results {
            let mut measures: Vec<Option<&ZoneLayerAggregate>> = vec![None; rows.len()];
            let mut layer_stats = LayerMergeStats::default();
            for aggregate in &result.aggregates {
                match zones.position(&aggregate.zone_id) {
                    Some(position) => {
                        measures[position] = Some(aggregate);
                        layer_stats.touched += 1;
                    }
                    None => layer_stats.orphans += 1,
                }
            }
            if layer_stats.orphans > 0 {
                tracing::warn!(
                    layer = result.spec.id,
                    orphans = layer_stats.orphans,
                    "dropping aggregates for unknown zones"
                );
            }

            for (row, aggregate) in rows.iter_mut().zip(measures) {
                let measure = aggregate.map(|a| a.measure);
                let flag = threshold::classify(result.spec.measure(), measure, row.area);
                layer_stats.flagged += usize::from(flag);
                row.cells.push(LayerCell {
                    measure: measure.unwrap_or(0.0),
                    attributes: aggregate.map(|a| a.attributes.clone()).unwrap_or_default(),
                    flag,
                });
            }
            stats.push(layer_stats);
        }

        for row in &mut rows {
            row.blue_zone = threshold::union(row.cells.iter().map(|cell| cell.flag));
        }

        Self {
            epoch,
            layers: results.iter().map(|r| r.spec).collect(),
            zone_columns,
            rows,
            stats,
        }
    }

    /// Column names in output order.
    #[must_use]
    pub fn header(&self) -> Vec<String> {
        let mut header = vec![UNIQUE_ID_FIELD.to_string(), AREA_FIELD.to_string()];
        header.extend(
            self.zone_columns
                .iter()
                .map(|name| format!("{ZONE_ATTRIBUTE_PREFIX}{name}")),
        );
        for layer in &self.layers {
            header.push(layer.measure_column.to_string());
            header.extend(layer.propagate.iter().map(|a| layer.attribute_column(a)));
            header.push(layer.flag_column.to_string());
        }
        header.push(self.epoch.union_column().to_string());
        header
    }

    /// Row values as text, aligned with [`Self::header`].
    #[must_use]
    pub fn record(&self, row: &EpochRow) -> Vec<String> {
        let mut record = vec![row.zone_id.to_string(), format_number(row.area)];
        record.extend(
            self.zone_columns
                .iter()
                .map(|name| attribute_text(&row.zone_attributes, name)),
        );
        for (layer, cell) in self.layers.iter().zip(&row.cells) {
            record.push(format_number(cell.measure));
            record.extend(
                layer
                    .propagate
                    .iter()
                    .map(|a| attribute_text(&cell.attributes, a)),
            );
            record.push(format_flag(cell.flag).to_string());
        }
        record.push(format_flag(row.blue_zone).to_string());
        record
    }

    #[must_use]
    pub fn blue_zone_count(&self) -> usize {
        self.rows.iter().filter(|row| row.blue_zone).count()
    }

    #[must_use]
    pub fn orphan_count(&self) -> usize {
        self.stats.iter().map(|s| s.orphans).sum()
    }
}

/// Shortest round-trip decimal form; identical input gives identical text.
#[must_use]
pub fn format_number(value: f64) -> String {
    format!("{value}")
}

#[must_use]
pub const fn format_flag(flag: bool) -> &'static str {
    if flag { "1" } else { "0" }
}

/// Attribute value as table text; absent values are empty.
#[must_use]
pub fn attribute_text(attributes: &Attributes, name: &str) -> String {
    attributes
        .get(name)
        .map(ToString::to_string)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{aggregate_row, layer_spec, zone_set};
    use bz_core::{AttrValue, GeometryKind};
    use pretty_assertions::assert_eq;

    fn leak(spec: LayerSpec) -> &'static LayerSpec {
        Box::leak(Box::new(spec))
    }

    #[test]
    fn every_zone_appears_exactly_once() {
        let zones = zone_set(&[("Z1", 0.0, 0.0, 10.0), ("Z2", 10.0, 0.0, 10.0), ("Z3", 20.0, 0.0, 10.0)]);
        let a = leak(layer_spec("a", GeometryKind::Polygon, &[]));
        let b = leak(layer_spec("b", GeometryKind::Polygon, &[]));
        let results = vec![
            LayerResult {
                spec: a,
                aggregates: vec![aggregate_row("Z3", 50.0), aggregate_row("ghost", 10.0)],
            },
            LayerResult {
                spec: b,
                aggregates: vec![aggregate_row("Z1", 5.0)],
            },
        ];
        let table = EpochTable::merge(Epoch::Future, &zones, &results);

        let ids: Vec<_> = table.rows.iter().map(|r| r.zone_id.as_str()).collect();
        assert_eq!(ids, vec!["Z1", "Z2", "Z3"]);
        assert_eq!(table.orphan_count(), 1);
        assert_eq!(
            table.stats,
            vec![
                LayerMergeStats { touched: 1, flagged: 1, orphans: 1 },
                LayerMergeStats { touched: 1, flagged: 0, orphans: 0 },
            ]
        );

        // Z1 has layer b data but not layer a: both cells exist.
        assert_eq!(table.rows[0].cells[0].measure, 0.0);
        assert_eq!(table.rows[0].cells[1].measure, 5.0);
        assert_eq!(table.blue_zone_count(), 1);
    }

    #[test]
    fn header_namespaces_attributes() {
        let zones = zone_set(&[("Z1", 0.0, 0.0, 10.0)]);
        let spec = leak(layer_spec("mod_cur", GeometryKind::Polygon, &["mo_cu_fldC"]));
        let table = EpochTable::merge(
            Epoch::Present,
            &zones,
            &[LayerResult {
                spec,
                aggregates: Vec::new(),
            }],
        );
        assert_eq!(
            table.header(),
            vec![
                "unique_id",
                "area",
                "mod_curA",
                "mod_cur.mo_cu_fldC",
                "mod_curAfg",
                "BZ_present"
            ]
        );
        assert_eq!(
            table.record(&table.rows[0]),
            vec!["Z1", "100", "0", "", "0", "0"]
        );
    }

    #[test]
    fn propagated_values_and_zone_attributes_are_written() {
        let mut zones = bz_core::ZoneSet::new();
        for zone in zone_set(&[("Z1", 0.0, 0.0, 10.0)]).iter() {
            let mut zone = zone.clone();
            zone.attributes.insert("borough".into(), AttrValue::Text("Kings".into()));
            zones.try_push(zone).unwrap();
        }
        let spec = leak(layer_spec("mod_cur", GeometryKind::Polygon, &["mo_cu_fldC"]));
        let mut row = aggregate_row("Z1", 12.5);
        row.attributes.insert("mo_cu_fldC".into(), AttrValue::Integer(2));
        let table = EpochTable::merge(
            Epoch::Present,
            &zones,
            &[LayerResult {
                spec,
                aggregates: vec![row],
            }],
        );
        assert_eq!(table.header()[2], "zone.borough");
        assert_eq!(
            table.record(&table.rows[0]),
            vec!["Z1", "100", "Kings", "12.5", "2", "1", "1"]
        );
    }

    #[test]
    fn numbers_format_deterministically() {
        assert_eq!(format_number(110.0), "110");
        assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(format_flag(true), "1");
    }
}
