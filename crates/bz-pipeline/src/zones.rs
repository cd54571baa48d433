//! Atomic zone loading.

use bz_core::rules::UNIQUE_ID_FIELD;
use bz_core::{AtomicZone, SkipReason, ZoneId, ZoneSet};
use bz_geo::{GeometryEngine, VectorFeature, VectorLayer, ops};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::PipelineError;

/// Zone records excluded at load, by reason.
pub type SkipCounts = BTreeMap<SkipReason, usize>;

/// Read the zone file, bring it into the shared CRS, and build the zone set.
///
/// # Errors
///
/// Returns [`PipelineError::Zones`] if the file cannot be read or is in a
/// foreign CRS. Individual bad records are skipped, not errors.
pub fn load_zones(
    engine: &dyn GeometryEngine,
    path: &Path,
) -> Result<(ZoneSet, SkipCounts), PipelineError> {
    let layer = engine
        .load_vector(path)
        .map_err(|source| PipelineError::Zones {
            path: path.to_path_buf(),
            source,
        })?;
    let (zones, skipped) = build_zone_set(engine, layer);
    tracing::info!(
        path = %path.display(),
        zones = zones.len(),
        skipped = skipped.values().sum::<usize>(),
        "loaded atomic zones"
    );
    Ok((zones, skipped))
}

/// Build a zone set from a layer already in the shared CRS.
#[must_use]
pub fn build_zone_set(engine: &dyn GeometryEngine, layer: VectorLayer) -> (ZoneSet, SkipCounts) {
    let mut zones = ZoneSet::new();
    let mut skipped = SkipCounts::new();

    for (index, feature) in layer.features.into_iter().enumerate() {
        let outcome = to_zone(engine, feature).and_then(|zone| {
            let id = zone.id.clone();
            zones.try_push(zone).map_err(|reason| (reason, Some(id)))
        });
        if let Err((reason, id)) = outcome {
            tracing::warn!(
                feature = index,
                unique_id = id.as_ref().map(ZoneId::as_str),
                reason = reason.as_str(),
                "skipping zone record"
            );
            *skipped.entry(reason).or_default() += 1;
        }
    }
    (zones, skipped)
}

fn to_zone(
    engine: &dyn GeometryEngine,
    feature: VectorFeature,
) -> Result<AtomicZone, (SkipReason, Option<ZoneId>)> {
    let VectorFeature {
        geometry,
        mut attributes,
    } = feature;

    let id = attributes
        .remove(UNIQUE_ID_FIELD)
        .and_then(|value| value.as_key())
        .map(ZoneId::new)
        .ok_or((SkipReason::MissingId, None))?;
    let geometry = geometry.ok_or_else(|| (SkipReason::MissingGeometry, Some(id.clone())))?;
    let geometry =
        ops::as_multipolygon(&geometry).map_err(|_| (SkipReason::NotPolygon, Some(id.clone())))?;
    let area = engine.area(&geometry);

    Ok(AtomicZone {
        id,
        geometry,
        area,
        attributes,
    })
}
