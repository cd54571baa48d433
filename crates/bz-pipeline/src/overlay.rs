//! Overlay executor and point counting.
//!
//! Both walk zones in load order and layer features in file order, so their
//! output order is deterministic.

use bz_core::{IntersectionFragment, LayerSpec, ZoneLayerAggregate, ZoneSet};
use bz_geo::{GeometryEngine, VectorLayer, ops};
use geo::Point;

use crate::error::PipelineError;
use crate::index::EnvelopeIndex;

/// Fail when a declared propagated attribute appears on no feature of a
/// non-empty layer.
///
/// # Errors
///
/// Returns [`PipelineError::MissingAttribute`].
pub fn check_attributes(spec: &LayerSpec, layer: &VectorLayer) -> Result<(), PipelineError> {
    if layer.is_empty() {
        return Ok(());
    }
    match spec.propagate.iter().find(|attr| !layer.has_field(attr)) {
        Some(attribute) => Err(PipelineError::MissingAttribute {
            layer: spec.id.to_string(),
            attribute: (*attribute).to_string(),
        }),
        None => Ok(()),
    }
}

/// Intersect every zone with every feature of an areal layer.
///
/// Empty layers yield no fragments. Features without geometry are ignored,
/// and zero-area contacts do not produce fragments.
///
/// # Errors
///
/// Returns [`PipelineError::UnbufferedLineLayer`] if any feature is a line,
/// [`PipelineError::Layer`] for other non-areal geometry, and
/// [`PipelineError::MissingAttribute`] per [`check_attributes`].
pub fn overlay_layer(
    engine: &dyn GeometryEngine,
    zones: &ZoneSet,
    spec: &LayerSpec,
    layer: &VectorLayer,
) -> Result<Vec<IntersectionFragment>, PipelineError> {
    check_attributes(spec, layer)?;

    let mut features = Vec::with_capacity(layer.len());
    for feature in &layer.features {
        let Some(geometry) = &feature.geometry else {
            continue;
        };
        if ops::is_lineal(geometry) {
            return Err(PipelineError::UnbufferedLineLayer {
                layer: spec.id.to_string(),
            });
        }
        let polygon =
            ops::as_multipolygon(geometry).map_err(|e| PipelineError::layer(spec.id, e))?;
        let envelope = ops::envelope(&polygon);
        features.push((polygon, envelope, spec.select_propagated(&feature.attributes)));
    }

    let index = EnvelopeIndex::new(features.iter().map(|(_, envelope, _)| envelope.as_ref()));
    let mut fragments = Vec::new();
    for zone in zones {
        for position in index.candidates(ops::envelope(&zone.geometry).as_ref()) {
            let (polygon, _, attributes) = &features[position];
            let geometry = engine.intersection(&zone.geometry, polygon);
            let area = engine.area(&geometry);
            if area <= 0.0 {
                continue;
            }
            fragments.push(IntersectionFragment {
                zone_id: zone.id.clone(),
                geometry,
                area,
                attributes: attributes.clone(),
            });
        }
    }

    tracing::debug!(layer = spec.id, fragments = fragments.len(), "overlay complete");
    Ok(fragments)
}

/// Count the layer's points strictly inside each zone.
///
/// Only zones containing at least one point get an aggregate; propagated
/// attributes take the first non-null value in file order.
///
/// # Errors
///
/// Returns [`PipelineError::Layer`] for non-point geometry and
/// [`PipelineError::MissingAttribute`] per [`check_attributes`].
pub fn count_points(
    engine: &dyn GeometryEngine,
    zones: &ZoneSet,
    spec: &LayerSpec,
    layer: &VectorLayer,
) -> Result<Vec<ZoneLayerAggregate>, PipelineError> {
    check_attributes(spec, layer)?;

    let mut points: Vec<(Point<f64>, &bz_core::Attributes)> = Vec::with_capacity(layer.len());
    for feature in &layer.features {
        let Some(geometry) = &feature.geometry else {
            continue;
        };
        let parts = ops::as_points(geometry).map_err(|e| PipelineError::layer(spec.id, e))?;
        points.extend(parts.into_iter().map(|p| (p, &feature.attributes)));
    }

    let index = EnvelopeIndex::from_points(points.iter().map(|(point, _)| point));
    let mut aggregates = Vec::new();
    for zone in zones {
        let mut aggregate = ZoneLayerAggregate::new(zone.id.clone(), 0.0);
        let mut count: u64 = 0;
        for position in index.candidates(ops::envelope(&zone.geometry).as_ref()) {
            let (point, attributes) = &points[position];
            if !engine.contains_point(&zone.geometry, point) {
                continue;
            }
            count += 1;
            for (key, value) in spec.select_propagated(attributes) {
                aggregate.attributes.entry(key).or_insert(value);
            }
        }
        if count > 0 {
            #[allow(clippy::cast_precision_loss)]
            {
                aggregate.measure = count as f64;
            }
            aggregates.push(aggregate);
        }
    }

    tracing::debug!(layer = spec.id, zones = aggregates.len(), "point count complete");
    Ok(aggregates)
}
